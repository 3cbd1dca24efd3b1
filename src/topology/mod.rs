//! Event topology reconstruction.
//!
//! This module turns flat HEPEVT records into linked [`GenEvent`](crate::GenEvent)
//! graphs, one event at a time or in batches.

pub mod batch;
pub mod reconstructor;

pub use batch::{reconstruct_batch, BatchOutput};
pub use reconstructor::{
    reconstruct_event, ReconstructionStats, TopologyConfig, TopologyReconstructor,
};

#[cfg(feature = "parallel")]
pub use batch::reconstruct_batch_parallel;
