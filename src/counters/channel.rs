//! Accumulator owned by one task, fed over a rendezvous channel.
//!
//! [`Channel`] replaces the lock with message passing. A single accumulator
//! thread owns the counter; workers never touch it, they only send one
//! signal per increment. The channel has zero capacity, so each send blocks
//! until the accumulator takes it: logical increments are serialized while
//! the workers themselves run in parallel.
//!
//! Completion is signalled by closing the channel. Every worker holds a clone
//! of the sender and drops it when its share is sent; once the last sender is
//! gone the accumulator's receive loop ends and it returns the final count.
//!
//! ```text
//!   worker 0 ──send()──┐
//!   worker 1 ──send()──┼──► bounded(0) ──► accumulator (sole writer)
//!   worker 2 ──send()──┘                        │
//!                                               ▼ all senders dropped
//!                                          final count
//! ```

use std::panic;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::counters::{CounterKind, CountingStrategy, Tally, Workload};

/// One increment request.
#[derive(Debug, Clone, Copy)]
struct Increment;

/// Workers send increment signals to a single accumulator thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Channel;

impl Channel {
    fn accumulate(signals: Receiver<Increment>) -> u64 {
        let mut counter = 0u64;
        for Increment in signals.iter() {
            counter += 1;
        }
        counter
    }

    fn produce(signals: Sender<Increment>, share: u64) {
        for _ in 0..share {
            // the accumulator only goes away if it panicked
            if signals.send(Increment).is_err() {
                break;
            }
        }
    }
}

impl CountingStrategy for Channel {
    fn kind(&self) -> CounterKind {
        CounterKind::Channel
    }

    fn count(&self, workload: Workload) -> Tally {
        let (tx, rx) = bounded::<Increment>(0);

        let counter = thread::scope(|s| {
            let accumulator = s.spawn(move || Self::accumulate(rx));

            for share in workload.shares() {
                let tx = tx.clone();
                s.spawn(move || Self::produce(tx, share));
            }
            drop(tx);

            accumulator
                .join()
                .unwrap_or_else(|payload| panic::resume_unwind(payload))
        });

        Tally::total(counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact() {
        let outcome = Channel.run(Workload::new(200_000, 5).unwrap());
        assert_eq!(outcome.result, 200_000);
        assert!(outcome.is_exact());
    }

    #[test]
    fn test_zero_variance() {
        let workload = Workload::new(50_000, 5).unwrap();
        let results: Vec<u64> = (0..5).map(|_| Channel.count(workload).result).collect();
        assert!(results.iter().all(|&r| r == 50_000));
    }

    #[test]
    fn test_uneven_split() {
        let tally = Channel.count(Workload::new(10_001, 3).unwrap());
        assert_eq!(tally.result, 10_001);
    }
}
