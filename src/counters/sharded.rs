//! Per-worker private counters, summed after the parallel phase.
//!
//! [`Sharded`] avoids sharing altogether while counting. Each worker gets
//! exclusive access to its own slot and counts its share there; once every
//! worker has finished, a single reader sums the slots.
//!
//! Each slot is wrapped in [`crossbeam_utils::CachePadded`] so that
//! neighbouring workers' slots never sit on the same cache line. Without the
//! padding, writes to adjacent `u64`s would still bounce the line between
//! cores (false sharing) even though no value is logically shared.
//!
//! ```text
//!   worker 0 ──► [slot 0] ████ (CachePadded) ─┐
//!   worker 1 ──► [slot 1] ████ (CachePadded) ─┼──► sum after join
//!   worker 2 ──► [slot 2] ████ (CachePadded) ─┘
//! ```

use std::hint::black_box;
use std::thread;

use crossbeam_utils::CachePadded;

use crate::counters::{CounterKind, CountingStrategy, Tally, Workload};

/// Workers count in private cache-padded slots that are aggregated on read.
///
/// # Examples
///
/// ```rust
/// use contesa::counters::sharded::Sharded;
/// use contesa::counters::{CountingStrategy, Workload};
///
/// let tally = Sharded.count(Workload::new(50, 5).unwrap());
/// assert_eq!(tally.shards, vec![10; 5]);
/// assert_eq!(tally.result, 50);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Sharded;

impl CountingStrategy for Sharded {
    fn kind(&self) -> CounterKind {
        CounterKind::Sharded
    }

    fn count(&self, workload: Workload) -> Tally {
        let mut slots: Vec<CachePadded<u64>> = (0..workload.workers())
            .map(|_| CachePadded::new(0))
            .collect();

        thread::scope(|s| {
            for (worker, (slot, share)) in slots.iter_mut().zip(workload.shares()).enumerate() {
                s.spawn(move || {
                    for _ in 0..share {
                        **slot = black_box(**slot) + 1;
                    }
                    log::trace!("sharded: worker {worker} finished at {}", **slot);
                });
            }
        });

        let shards: Vec<u64> = slots.iter().map(|slot| **slot).collect();
        Tally {
            result: shards.iter().sum(),
            shards,
        }
    }
}
