//! # HEPEVT Topology
//!
//! Reconstruct linked event graphs from flat HEPEVT-style particle records.
//!
//! A HEPEVT record stores one row per particle: four-momentum, mass,
//! production-vertex coordinates, status, particle-type code and a legacy
//! 1-based parent range. Vertices are only implicit ("this particle's
//! parents span rows `[a, b]`"). This crate rebuilds the explicit graph:
//! particle nodes connected through shared production-vertex nodes.
//!
//! ## Features
//!
//! - **Two-pass reconstruction**: particles first, then vertices
//!   deduplicated by parent range in one linear pass
//! - **Arena-owned graph**: nodes live in the [`GenEvent`], edges are plain
//!   [`ParticleId`]/[`VertexId`] handles
//! - **Fail-fast preconditions**: malformed records are rejected before
//!   any node is created, never read out of bounds
//! - **Batch processing**: independent events, optionally on rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use hepevt_topology::{HepevtRecord, ParticleId, TopologyConfig, TopologyReconstructor};
//!
//! // Row 0 is the system entry, rows 1 and 2 are the beams, rows 3 and 4
//! // are produced at one vertex whose parents are rows 1..=2 (legacy [2, 3]).
//! // Legacy parent index 1 means "no parent".
//! let momentum = [
//!     [0.0, 0.0, 0.0, 13.0],
//!     [0.0, 0.0, 6.5, 6.5],
//!     [0.0, 0.0, -6.5, 6.5],
//!     [3.0, 0.0, 0.0, 6.5],
//!     [-3.0, 0.0, 0.0, 6.5],
//! ];
//! let mass = [13.0, 0.0, 0.0, 0.0, 0.0];
//! let position = [[0.0; 4]; 5];
//! let status = [11, 4, 4, 1, 1];
//! let pid = [90, 11, -11, 22, 22];
//! let parents = [[1, 1], [1, 1], [1, 1], [2, 3], [2, 3]];
//! let children = [[0, 0]; 5];
//!
//! let record = HepevtRecord::new(
//!     &momentum, &mass, &position, &status, &pid, &parents, &children,
//! );
//!
//! // GeV -> MeV
//! let config = TopologyConfig::new().with_momentum_scaling(1e3);
//! let mut reconstructor = TopologyReconstructor::with_config(config);
//! let event = reconstructor.reconstruct(&record).unwrap();
//!
//! assert_eq!(event.vertex_count(), 1);
//! assert_eq!(event.production_vertex(ParticleId(3)), event.production_vertex(ParticleId(4)));
//! assert_eq!(event.parents(ParticleId(3)), &[ParticleId(1), ParticleId(2)]);
//! assert_eq!(event.particles()[1].momentum.pz(), 6500.0);
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Value types: `FourVector`, `ParticleId`, `VertexId`, `VertexKey` |
//! | [`record`] | Input contract: `HepevtRecord` and its validation |
//! | [`event`] | Event graph: `GenEvent`, `Particle`, `Vertex` |
//! | [`topology`] | Reconstruction: `TopologyReconstructor`, `TopologyConfig`, batches |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `parallel` | ❌ | Enable `reconstruct_batch_parallel` (rayon) |

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod event;
pub mod record;
pub mod topology;
pub mod types;

// Re-exports - Core types
pub use error::{HepevtError, Result};
pub use types::{FourVector, ParticleId, VertexId, VertexKey};

// Re-exports - Input contract
pub use record::{HepevtRecord, HepevtRow, RealValue};

// Re-exports - Event graph
pub use event::{GenEvent, Particle, Vertex};

// Re-exports - Reconstruction
pub use topology::{
    reconstruct_batch, reconstruct_event, BatchOutput, ReconstructionStats, TopologyConfig,
    TopologyReconstructor,
};

#[cfg(feature = "parallel")]
pub use topology::reconstruct_batch_parallel;
