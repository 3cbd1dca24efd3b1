//! Batch reconstruction of independent events.
//!
//! Every event owns its whole graph, so records can be processed in any
//! order and on any thread. A rejected record only fails its own slot.
//!
//! # Example
//!
//! ```
//! use hepevt_topology::{reconstruct_batch, HepevtRecord, TopologyConfig};
//!
//! let momentum = [[0.0, 0.0, 1.0, 1.0]; 2];
//! let mass = [0.0; 2];
//! let position = [[0.0; 4]; 2];
//! let status = [1; 2];
//! let pid = [22; 2];
//! let parents = [[1, 1], [2, 2]];
//! let children = [[0, 0]; 2];
//! let record = HepevtRecord::new(
//!     &momentum, &mass, &position, &status, &pid, &parents, &children,
//! );
//!
//! let output = reconstruct_batch(&[record, record], &TopologyConfig::default());
//! assert_eq!(output.events.len(), 2);
//! assert_eq!(output.stats.events, 2);
//! ```

use crate::error::Result;
use crate::event::GenEvent;
use crate::record::{HepevtRecord, RealValue};

use super::reconstructor::{ReconstructionStats, TopologyConfig, TopologyReconstructor};

/// Result of a batch run: one slot per input record, in input order.
#[derive(Debug)]
pub struct BatchOutput {
    pub events: Vec<Result<GenEvent>>,
    pub stats: ReconstructionStats,
}

impl BatchOutput {
    /// Number of records that failed validation.
    pub fn failures(&self) -> usize {
        self.events.iter().filter(|e| e.is_err()).count()
    }

    /// Successfully built events, dropping failed slots.
    pub fn into_events(self) -> impl Iterator<Item = GenEvent> {
        self.events.into_iter().filter_map(|event| event.ok())
    }
}

/// Reconstruct every record sequentially with one shared configuration.
pub fn reconstruct_batch<R: RealValue>(
    records: &[HepevtRecord<'_, R>],
    config: &TopologyConfig,
) -> BatchOutput {
    let mut reconstructor = TopologyReconstructor::with_config(config.clone());
    let events = records
        .iter()
        .map(|record| reconstructor.reconstruct(record))
        .collect();

    log::debug!(
        "Batch of {} records done: {:?}",
        records.len(),
        reconstructor.stats()
    );

    BatchOutput {
        events,
        stats: reconstructor.stats().clone(),
    }
}

/// Reconstruct every record on the rayon thread pool.
///
/// Output order and statistics match [`reconstruct_batch`].
#[cfg(feature = "parallel")]
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
pub fn reconstruct_batch_parallel<R: RealValue + Sync>(
    records: &[HepevtRecord<'_, R>],
    config: &TopologyConfig,
) -> BatchOutput {
    use rayon::prelude::*;

    let (events, per_event): (Vec<_>, Vec<_>) = records
        .par_iter()
        .map(|record| {
            let mut reconstructor = TopologyReconstructor::with_config(config.clone());
            let event = reconstructor.reconstruct(record);
            (event, reconstructor.stats().clone())
        })
        .unzip();

    let mut stats = ReconstructionStats::default();
    for s in &per_event {
        stats.merge(s);
    }

    BatchOutput { events, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HepevtError;

    static MOMENTUM: [[f64; 4]; 4] = [
        [0.0, 0.0, 6.5, 6.5],
        [0.0, 0.0, -6.5, 6.5],
        [1.0, 0.0, 0.0, 6.5],
        [-1.0, 0.0, 0.0, 6.5],
    ];
    static POSITION: [[f64; 4]; 4] = [[0.0; 4]; 4];
    static MASS: [f64; 4] = [0.938; 4];
    static STATUS: [i32; 4] = [4, 4, 1, 1];
    static PID: [i32; 4] = [2212, 2212, 13, -13];
    static PARENTS: [[i32; 2]; 4] = [[1, 1], [1, 1], [2, 2], [2, 2]];
    static BAD_PARENTS: [[i32; 2]; 4] = [[1, 1], [1, 1], [2, 9], [2, 9]];
    static CHILDREN: [[i32; 2]; 4] = [[0, 0]; 4];

    fn record(parents: &[[i32; 2]; 4]) -> HepevtRecord<'_> {
        HepevtRecord::new(&MOMENTUM, &MASS, &POSITION, &STATUS, &PID, parents, &CHILDREN)
    }

    #[test]
    fn test_batch_keeps_order_and_isolates_failures() {
        let records = [record(&PARENTS), record(&BAD_PARENTS), record(&PARENTS)];
        let output = reconstruct_batch(&records, &TopologyConfig::default());

        assert_eq!(output.events.len(), 3);
        assert!(output.events[0].is_ok());
        assert!(matches!(
            output.events[1],
            Err(HepevtError::ParentOutOfRange { row: 2, .. })
        ));
        assert!(output.events[2].is_ok());
        assert_eq!(output.failures(), 1);
        assert_eq!(output.stats.events, 2);
        assert_eq!(output.stats.rejected_records, 1);
        assert_eq!(output.stats.vertices, 2);

        let events: Vec<_> = output.into_events().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], events[1]);
    }

    #[test]
    fn test_empty_batch() {
        let records: [HepevtRecord<'_>; 0] = [];
        let output = reconstruct_batch(&records, &TopologyConfig::default());
        assert!(output.events.is_empty());
        assert_eq!(output.stats, ReconstructionStats::default());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let records: Vec<_> = (0..16)
            .map(|i| if i % 5 == 0 { record(&BAD_PARENTS) } else { record(&PARENTS) })
            .collect();
        let config = TopologyConfig::new().with_momentum_scaling(1e3);

        let sequential = reconstruct_batch(&records, &config);
        let parallel = reconstruct_batch_parallel(&records, &config);

        assert_eq!(sequential.stats, parallel.stats);
        assert_eq!(sequential.events, parallel.events);
    }
}
