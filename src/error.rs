//! Error types for HEPEVT topology reconstruction.
//!
//! Clean error handling using `thiserror` for ergonomic error definitions.
//! Every variant except [`HepevtError::Generic`] is a precondition violation:
//! malformed input is rejected before any graph node is created.

use thiserror::Error;

/// Result type alias for reconstruction operations.
pub type Result<T> = std::result::Result<T, HepevtError>;

/// Main error type for HEPEVT ingestion and event graph operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HepevtError {
    /// An input array does not have one row per particle
    #[error("Length mismatch in `{field}`: expected {expected} rows, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A flat input buffer is not a whole number of rows
    #[error("Shape mismatch in `{field}`: {len} values is not a multiple of row width {width}")]
    ShapeMismatch {
        field: &'static str,
        len: usize,
        width: usize,
    },

    /// A parent range references rows past the end of the record
    #[error(
        "Parent range of row {row} is out of bounds: [{first}, {last}] with {particle_count} particles"
    )]
    ParentOutOfRange {
        row: usize,
        first: i64,
        last: i64,
        particle_count: usize,
    },

    /// A parent range normalizes to a negative row index
    #[error("Parent range of row {row} normalizes to negative index: [{first}, {last}]")]
    NegativeParentIndex { row: usize, first: i64, last: i64 },

    /// Particle handle does not exist in the event
    #[error("Unknown particle: {0}")]
    UnknownParticle(usize),

    /// Vertex handle does not exist in the event
    #[error("Unknown vertex: {0}")]
    UnknownVertex(usize),

    /// A particle can only have one production vertex
    #[error("Particle {particle} already has production vertex {existing}, cannot attach to {requested}")]
    DuplicateProductionVertex {
        particle: usize,
        existing: usize,
        requested: usize,
    },

    /// In-place fill requires an empty target event
    #[error("Target event is not empty: {particles} particles, {vertices} vertices")]
    EventNotEmpty { particles: usize, vertices: usize },

    /// Generic error with context
    #[error("Error: {0}")]
    Generic(String),
}

impl HepevtError {
    /// Create a generic error from any string-like type.
    pub fn generic(msg: impl Into<String>) -> Self {
        HepevtError::Generic(msg.into())
    }

    /// Whether this error is a rejected input precondition (a caller bug).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            HepevtError::LengthMismatch { .. }
                | HepevtError::ShapeMismatch { .. }
                | HepevtError::ParentOutOfRange { .. }
                | HepevtError::NegativeParentIndex { .. }
                | HepevtError::EventNotEmpty { .. }
        )
    }
}

impl From<std::io::Error> for HepevtError {
    fn from(err: std::io::Error) -> Self {
        HepevtError::Generic(format!("IO error: {err}"))
    }
}

impl From<serde_json::Error> for HepevtError {
    fn from(err: serde_json::Error) -> Self {
        HepevtError::Generic(format!("JSON error: {err}"))
    }
}

impl From<String> for HepevtError {
    fn from(err: String) -> Self {
        HepevtError::Generic(err)
    }
}

impl From<&str> for HepevtError {
    fn from(err: &str) -> Self {
        HepevtError::Generic(err.to_string())
    }
}
