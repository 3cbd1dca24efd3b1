//! Two-pass topology reconstructor.
//!
//! Pass 1 turns every input row into a particle. Pass 2 groups rows by
//! their normalized parent range: the first row seen with a given range
//! creates the production vertex and attaches the whole range as incoming
//! particles, every row with that range is attached as outgoing.
//!
//! Implementation notes:
//! - ahash HashMap for the range -> vertex lookup
//! - The record is fully validated before the event is allocated, so a
//!   rejected record never produces a partial graph

use ahash::AHashMap;

use crate::error::{HepevtError, Result};
use crate::event::{GenEvent, Particle, Vertex};
use crate::record::{HepevtRecord, RealValue};
use crate::types::{ParticleId, VertexId, VertexKey};

/// Configuration for reconstruction behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyConfig {
    /// Multiplies all momentum components and the generated mass
    pub momentum_scaling: f64,

    /// Multiplies all vertex position components
    pub length_scaling: f64,

    /// Whether to trace-log every row skipped for lack of parents
    pub log_skipped_rows: bool,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            momentum_scaling: 1.0,
            length_scaling: 1.0,
            log_skipped_rows: false,
        }
    }
}

impl TopologyConfig {
    /// Create a config with unit scaling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the momentum (and mass) scaling factor.
    pub fn with_momentum_scaling(mut self, factor: f64) -> Self {
        self.momentum_scaling = factor;
        self
    }

    /// Set the vertex position scaling factor.
    pub fn with_length_scaling(mut self, factor: f64) -> Self {
        self.length_scaling = factor;
        self
    }

    /// Enable/disable per-row logging of skipped rows.
    pub fn with_skip_logging(mut self, log: bool) -> Self {
        self.log_skipped_rows = log;
        self
    }
}

/// Counters accumulated over all events built by one reconstructor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconstructionStats {
    /// Events successfully reconstructed
    pub events: u64,

    /// Particles created
    pub particles: u64,

    /// Vertices created
    pub vertices: u64,

    /// Rows without a production vertex
    pub skipped_rows: u64,

    /// Incoming edges created
    pub incoming_attachments: u64,

    /// Outgoing edges created
    pub outgoing_attachments: u64,

    /// Rows that reused a vertex created by an earlier sibling
    pub shared_vertex_rows: u64,

    /// Records rejected by validation
    pub rejected_records: u64,
}

impl ReconstructionStats {
    /// Add another set of counters into this one.
    pub fn merge(&mut self, other: &ReconstructionStats) {
        self.events += other.events;
        self.particles += other.particles;
        self.vertices += other.vertices;
        self.skipped_rows += other.skipped_rows;
        self.incoming_attachments += other.incoming_attachments;
        self.outgoing_attachments += other.outgoing_attachments;
        self.shared_vertex_rows += other.shared_vertex_rows;
        self.rejected_records += other.rejected_records;
    }
}

/// Builds [`GenEvent`] graphs from HEPEVT records.
///
/// The reconstructor holds only configuration and statistics; every call
/// builds an independent event.
///
/// # Example
/// ```
/// use hepevt_topology::{HepevtRecord, ParticleId, TopologyReconstructor};
///
/// // Two beams (no parents) and one daughter of row 1 (legacy index 2)
/// let momentum = [[0.0, 0.0, 1.0, 1.0]; 3];
/// let mass = [0.0; 3];
/// let position = [[0.0; 4]; 3];
/// let status = [4, 4, 1];
/// let pid = [11, -11, 22];
/// let parents = [[1, 1], [1, 1], [2, 2]];
/// let children = [[0, 0]; 3];
/// let record = HepevtRecord::new(
///     &momentum, &mass, &position, &status, &pid, &parents, &children,
/// );
///
/// let mut reconstructor = TopologyReconstructor::new();
/// let event = reconstructor.reconstruct(&record).unwrap();
///
/// assert_eq!(event.particle_count(), 3);
/// assert_eq!(event.vertex_count(), 1);
/// assert_eq!(event.parents(ParticleId(2)), &[ParticleId(1)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TopologyReconstructor {
    config: TopologyConfig,
    stats: ReconstructionStats,
}

impl TopologyReconstructor {
    /// Create a reconstructor with unit scaling.
    pub fn new() -> Self {
        Self::with_config(TopologyConfig::default())
    }

    /// Create a reconstructor with custom configuration.
    pub fn with_config(config: TopologyConfig) -> Self {
        Self {
            config,
            stats: ReconstructionStats::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &TopologyConfig {
        &self.config
    }

    #[inline]
    pub fn stats(&self) -> &ReconstructionStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = ReconstructionStats::default();
    }

    /// Build the event graph of one record.
    ///
    /// # Errors
    /// Any precondition violation reported by [`HepevtRecord::validate`].
    /// Nothing is built in that case.
    pub fn reconstruct<R: RealValue>(&mut self, record: &HepevtRecord<'_, R>) -> Result<GenEvent> {
        if let Err(err) = record.validate() {
            self.stats.rejected_records += 1;
            log::warn!("Rejected HEPEVT record with {} rows: {err}", record.len());
            return Err(err);
        }

        let mut event = GenEvent::with_capacity(record.len());
        self.add_particles(&mut event, record);
        self.connect_topology(&mut event, record)?;

        self.stats.events += 1;
        log::debug!(
            "Reconstructed event {}: {} particles, {} vertices",
            event.event_number(),
            event.particle_count(),
            event.vertex_count()
        );

        Ok(event)
    }

    /// Fill an empty `event` in place, returning `Ok(true)` on success.
    ///
    /// The target is left untouched when an error is returned.
    ///
    /// # Errors
    /// `EventNotEmpty` if `event` already holds nodes, otherwise as
    /// [`reconstruct`](Self::reconstruct).
    pub fn fill<R: RealValue>(
        &mut self,
        event: &mut GenEvent,
        record: &HepevtRecord<'_, R>,
    ) -> Result<bool> {
        if !event.is_empty() {
            self.stats.rejected_records += 1;
            return Err(HepevtError::EventNotEmpty {
                particles: event.particle_count(),
                vertices: event.vertex_count(),
            });
        }
        *event = self.reconstruct(record)?;
        Ok(true)
    }

    /// Pass 1: one particle per row, in row order.
    fn add_particles<R: RealValue>(&mut self, event: &mut GenEvent, record: &HepevtRecord<'_, R>) {
        let scale = self.config.momentum_scaling;

        event.set_event_number(record.len() as u64);
        for row in record.rows() {
            event.add_particle(Particle::new(
                row.momentum.scaled(scale),
                row.mass * scale,
                row.status,
                row.pid,
            ));
        }
        self.stats.particles += record.len() as u64;
    }

    /// Pass 2: deduplicate production vertices by parent range and wire
    /// the edges.
    fn connect_topology<R: RealValue>(
        &mut self,
        event: &mut GenEvent,
        record: &HepevtRecord<'_, R>,
    ) -> Result<()> {
        let n = record.len();
        let mut vertex_map: AHashMap<VertexKey, VertexId> = AHashMap::new();

        for i in 0..n {
            let Some(key) = VertexKey::from_legacy(i, record.parent_range(i), n)? else {
                self.stats.skipped_rows += 1;
                if self.config.log_skipped_rows {
                    log::trace!("Row {i} has no parents: {:?}", record.parent_range(i));
                }
                continue;
            };

            let vertex = match vertex_map.get(&key) {
                Some(&vertex) => {
                    self.stats.shared_vertex_rows += 1;
                    vertex
                }
                None => {
                    let position = record.row(i).position.scaled(self.config.length_scaling);
                    let vertex = event.add_vertex(Vertex::new(position));
                    event.attach_incoming(vertex, key.particles())?;
                    self.stats.vertices += 1;
                    self.stats.incoming_attachments += key.len() as u64;
                    vertex_map.insert(key, vertex);
                    vertex
                }
            };

            event.add_particle_out(vertex, ParticleId(i))?;
            self.stats.outgoing_attachments += 1;
        }

        Ok(())
    }
}

/// Build one event with explicit scaling factors.
///
/// Pass `1.0` for both factors to keep input units.
pub fn reconstruct_event<R: RealValue>(
    record: &HepevtRecord<'_, R>,
    momentum_scaling: f64,
    length_scaling: f64,
) -> Result<GenEvent> {
    let config = TopologyConfig::new()
        .with_momentum_scaling(momentum_scaling)
        .with_length_scaling(length_scaling);
    TopologyReconstructor::with_config(config).reconstruct(record)
}
