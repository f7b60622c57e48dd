//! Shared accumulator with no synchronization.
//!
//! [`Racy`] is the deliberate counter-example. Every worker reads the shared
//! counter, adds one and writes it back as two separate operations, so two
//! workers that read the same value both write `value + 1` and one increment
//! disappears.
//!
//! The read and the write are individually atomic (`Ordering::Relaxed`), which
//! keeps the program free of undefined behavior while leaving the
//! read-modify-write sequence itself unprotected. Updates are lost; memory is
//! never torn.
//!
//! # Bounds
//!
//! Every write stores one more than a value some earlier write produced, so
//! the final value can never exceed the number of increments performed. The
//! result is always `<= total` and, with more than one worker on a multi-core
//! machine, usually `<`. How many updates are lost varies run to run.

use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crate::counters::{CounterKind, CountingStrategy, Tally, Workload};

/// Workers share one counter and update it with an unguarded load/store pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct Racy;

impl CountingStrategy for Racy {
    fn kind(&self) -> CounterKind {
        CounterKind::Racy
    }

    fn count(&self, workload: Workload) -> Tally {
        let counter = AtomicU64::new(0);

        thread::scope(|s| {
            for share in workload.shares() {
                let counter = &counter;
                s.spawn(move || {
                    for _ in 0..share {
                        let seen = counter.load(Ordering::Relaxed);
                        counter.store(black_box(seen) + 1, Ordering::Relaxed);
                    }
                });
            }
        });

        Tally::total(counter.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_worker_is_exact() {
        let tally = Racy.count(Workload::new(100_000, 1).unwrap());
        assert_eq!(tally.result, 100_000);
    }

    #[test]
    fn test_never_exceeds_total() {
        for _ in 0..5 {
            let outcome = Racy.run(Workload::new(200_000, 4).unwrap());
            assert!(outcome.result <= 200_000);
            assert_eq!(outcome.lost(), 200_000 - outcome.result);
        }
    }
}
