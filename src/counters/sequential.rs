//! Single-threaded baseline.
//!
//! [`Sequential`] walks every worker's share one after the other on the
//! calling thread. Nothing is shared, so the result is always exact; it is
//! the reference the concurrent strategies are timed against.

use std::hint::black_box;

use crate::counters::{CounterKind, CountingStrategy, Tally, Workload};

/// Performs every increment on the calling thread.
///
/// # Examples
///
/// ```rust
/// use contesa::counters::sequential::Sequential;
/// use contesa::counters::{CountingStrategy, Workload};
///
/// let outcome = Sequential.run(Workload::new(1_000, 5).unwrap());
/// assert_eq!(outcome.result, 1_000);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl CountingStrategy for Sequential {
    fn kind(&self) -> CounterKind {
        CounterKind::Sequential
    }

    fn count(&self, workload: Workload) -> Tally {
        let mut counter = 0u64;
        for share in workload.shares() {
            for _ in 0..share {
                // keep the loop from being folded into a single add
                counter = black_box(counter) + 1;
            }
        }
        Tally::total(counter)
    }
}
