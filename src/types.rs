//! Core value types: four-vectors, arena handles and the vertex grouping key.
//!
//! These types are designed to be:
//! - `Copy` and small (they are passed around by value on the hot path)
//! - Serializable, so built event graphs can be persisted
//! - Free of any physics validation (values are stored as given)

use serde::{Deserialize, Serialize};

use crate::error::{HepevtError, Result};

/// Four-component vector used for both momentum `(px, py, pz, E)` and
/// position `(x, y, z, t)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: f64,
}

impl FourVector {
    /// Create a new four-vector.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64, t: f64) -> Self {
        Self { x, y, z, t }
    }

    /// The zero vector.
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Build from an `[x, y, z, t]` array.
    #[inline]
    pub fn from_array(values: [f64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }

    /// Convert to an `[x, y, z, t]` array.
    #[inline]
    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.t]
    }

    /// Multiply all four components by `factor`.
    #[inline]
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.z * factor,
            self.t * factor,
        )
    }

    #[inline(always)]
    pub fn px(&self) -> f64 {
        self.x
    }

    #[inline(always)]
    pub fn py(&self) -> f64 {
        self.y
    }

    #[inline(always)]
    pub fn pz(&self) -> f64 {
        self.z
    }

    #[inline(always)]
    pub fn e(&self) -> f64 {
        self.t
    }

    /// Transverse component `sqrt(x² + y²)`.
    #[inline]
    pub fn pt(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Invariant mass squared `E² - |p|²`.
    #[inline]
    pub fn m2(&self) -> f64 {
        self.t * self.t - (self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Invariant mass. Negative `m2` (spacelike) yields `-sqrt(-m2)`.
    #[inline]
    pub fn m(&self) -> f64 {
        let m2 = self.m2();
        if m2 >= 0.0 {
            m2.sqrt()
        } else {
            -(-m2).sqrt()
        }
    }
}

/// Handle of a particle inside a [`GenEvent`](crate::GenEvent).
///
/// For reconstructed events this equals the particle's 0-based input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticleId(pub usize);

impl ParticleId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of a vertex inside a [`GenEvent`](crate::GenEvent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub usize);

impl VertexId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Normalized 0-based parent range `[first, last]`.
///
/// Rows sharing a key are siblings produced at the same vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexKey {
    pub first: usize,
    pub last: usize,
}

impl VertexKey {
    /// Normalize a legacy 1-based parent pair for `row`.
    ///
    /// Returns `Ok(None)` when the row has no production vertex: after
    /// subtracting one, either bound equals zero or the range is inverted.
    /// Legacy index 1 therefore means "no parent", never "row 0".
    ///
    /// # Errors
    /// `NegativeParentIndex` for a non-skipped range below zero and
    /// `ParentOutOfRange` when `last` is not a row of the record.
    pub fn from_legacy(row: usize, raw: [i32; 2], particle_count: usize) -> Result<Option<Self>> {
        let first = i64::from(raw[0]) - 1;
        let last = i64::from(raw[1]) - 1;

        if first == 0 || last == 0 || first > last {
            return Ok(None);
        }
        if first < 0 {
            return Err(HepevtError::NegativeParentIndex { row, first, last });
        }
        if last >= particle_count as i64 {
            return Err(HepevtError::ParentOutOfRange {
                row,
                first,
                last,
                particle_count,
            });
        }

        Ok(Some(Self {
            first: first as usize,
            last: last as usize,
        }))
    }

    /// Number of incoming rows covered by the range (never zero).
    #[allow(clippy::len_without_is_empty)]
    #[inline]
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// Iterate the incoming particle handles.
    #[inline]
    pub fn particles(&self) -> impl Iterator<Item = ParticleId> + Clone {
        (self.first..=self.last).map(ParticleId)
    }
}
