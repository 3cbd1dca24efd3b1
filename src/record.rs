//! Borrowed view of a flat HEPEVT-style particle record.
//!
//! The record is the input contract of the reconstructor: parallel,
//! row-aligned arrays with one row per particle. Nothing is copied; the
//! arrays are only read while an event is being built.
//!
//! # Example
//!
//! ```
//! use hepevt_topology::HepevtRecord;
//!
//! let momentum = [[0.0, 0.0, 7.0, 7.0], [0.0, 0.0, -7.0, 7.0]];
//! let mass = [0.0, 0.0];
//! let position = [[0.0; 4]; 2];
//! let status = [4, 4];
//! let pid = [2212, 2212];
//! let parents = [[1, 1], [1, 1]];
//! let children = [[0, 0], [0, 0]];
//!
//! let record = HepevtRecord::new(
//!     &momentum, &mass, &position, &status, &pid, &parents, &children,
//! );
//! assert_eq!(record.len(), 2);
//! ```

use crate::error::{HepevtError, Result};
use crate::types::{FourVector, VertexKey};

/// Scalar type accepted for real-valued columns (`f32` or `f64`).
pub trait RealValue: Copy + Into<f64> {}

impl RealValue for f32 {}
impl RealValue for f64 {}

/// One input row, widened to `f64` and not yet scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HepevtRow {
    pub momentum: FourVector,
    pub mass: f64,
    pub position: FourVector,
    pub status: i32,
    pub pid: i32,
    /// Legacy 1-based parent bounds
    pub parents: [i32; 2],
}

/// Row-aligned views of the HEPEVT arrays.
///
/// Real-valued columns are stored as flat row-major slices; the particle
/// count is the number of momentum rows.
#[derive(Debug, Clone, Copy)]
pub struct HepevtRecord<'a, R: RealValue = f64> {
    momentum: &'a [R],
    mass: &'a [R],
    vertex_position: &'a [R],
    status: &'a [i32],
    pid: &'a [i32],
    parents: &'a [i32],
    children: &'a [i32],
}

impl<'a, R: RealValue> HepevtRecord<'a, R> {
    /// Assemble a record from row arrays.
    ///
    /// The children range is accepted for interface compatibility only.
    pub fn new(
        momentum: &'a [[R; 4]],
        mass: &'a [R],
        vertex_position: &'a [[R; 4]],
        status: &'a [i32],
        pid: &'a [i32],
        parents: &'a [[i32; 2]],
        children: &'a [[i32; 2]],
    ) -> Self {
        Self {
            momentum: momentum.as_flattened(),
            mass,
            vertex_position: vertex_position.as_flattened(),
            status,
            pid,
            parents: parents.as_flattened(),
            children: children.as_flattened(),
        }
    }

    /// Assemble a record from flat row-major buffers, as handed over by
    /// numeric array libraries.
    ///
    /// # Errors
    /// `ShapeMismatch` when a 2-D buffer is not a whole number of rows.
    pub fn from_flat(
        momentum: &'a [R],
        mass: &'a [R],
        vertex_position: &'a [R],
        status: &'a [i32],
        pid: &'a [i32],
        parents: &'a [i32],
        children: &'a [i32],
    ) -> Result<Self> {
        check_rectangular("momentum", momentum.len(), 4)?;
        check_rectangular("vertex_position", vertex_position.len(), 4)?;
        check_rectangular("parents", parents.len(), 2)?;
        check_rectangular("children", children.len(), 2)?;

        Ok(Self {
            momentum,
            mass,
            vertex_position,
            status,
            pid,
            parents,
            children,
        })
    }

    /// Number of particles (momentum rows).
    #[inline]
    pub fn len(&self) -> usize {
        self.momentum.len() / 4
    }

    /// Whether the record holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check every precondition of the reconstruction.
    ///
    /// Verifies that all columns have one row per particle and that every
    /// parent range which is not skipped names rows inside the record.
    /// Children are only length-checked.
    pub fn validate(&self) -> Result<()> {
        let n = self.len();

        check_rows("mass", self.mass.len(), 1, n)?;
        check_rows("vertex_position", self.vertex_position.len(), 4, n)?;
        check_rows("status", self.status.len(), 1, n)?;
        check_rows("pid", self.pid.len(), 1, n)?;
        check_rows("parents", self.parents.len(), 2, n)?;
        check_rows("children", self.children.len(), 2, n)?;

        for row in 0..n {
            VertexKey::from_legacy(row, self.parent_range(row), n)?;
        }

        Ok(())
    }

    /// Legacy 1-based parent bounds of `row`.
    ///
    /// # Panics
    /// If `row` is outside the record.
    #[inline]
    pub fn parent_range(&self, row: usize) -> [i32; 2] {
        [self.parents[2 * row], self.parents[2 * row + 1]]
    }

    /// Legacy 1-based children bounds of `row` (never interpreted).
    ///
    /// # Panics
    /// If `row` is outside the record.
    #[inline]
    pub fn child_range(&self, row: usize) -> [i32; 2] {
        [self.children[2 * row], self.children[2 * row + 1]]
    }

    /// Read one row.
    ///
    /// # Panics
    /// If `row` is outside the record or the record has not been validated.
    #[inline]
    pub fn row(&self, row: usize) -> HepevtRow {
        HepevtRow {
            momentum: four_vector(&self.momentum[4 * row..4 * row + 4]),
            mass: self.mass[row].into(),
            position: four_vector(&self.vertex_position[4 * row..4 * row + 4]),
            status: self.status[row],
            pid: self.pid[row],
            parents: self.parent_range(row),
        }
    }

    /// Iterate all rows in input order.
    pub fn rows(&self) -> impl Iterator<Item = HepevtRow> + '_ {
        (0..self.len()).map(move |row| self.row(row))
    }
}

#[inline]
fn four_vector<R: RealValue>(values: &[R]) -> FourVector {
    FourVector::new(
        values[0].into(),
        values[1].into(),
        values[2].into(),
        values[3].into(),
    )
}

fn check_rectangular(field: &'static str, len: usize, width: usize) -> Result<()> {
    if len % width != 0 {
        return Err(HepevtError::ShapeMismatch { field, len, width });
    }
    Ok(())
}

fn check_rows(field: &'static str, len: usize, width: usize, expected: usize) -> Result<()> {
    if len != expected * width {
        return Err(HepevtError::LengthMismatch {
            field,
            expected,
            actual: len / width,
        });
    }
    Ok(())
}
