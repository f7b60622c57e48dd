//! Four ways to count the same amount of work across threads.
//!
//! Every strategy receives a [`Workload`] of `total` increments split over
//! `workers` threads and reports how far it actually counted:
//!
//! | Kind | Module | Exact? | Shared state |
//! |------|--------|--------|--------------|
//! | [`CounterKind::Sequential`] | [`sequential`] | always | none, one thread |
//! | [`CounterKind::Racy`] | [`racy`] | no, loses updates | one unguarded accumulator |
//! | [`CounterKind::Channel`] | [`channel`] | always | accumulator owned by one task |
//! | [`CounterKind::Sharded`] | [`sharded`] | always | none until aggregation |
//!
//! The racy strategy is the deliberate counter-example: its shortfall is
//! the thing being demonstrated, so it is reported through
//! [`CountOutcome::lost`] rather than treated as a failure.
//!
//! ```text
//!   sequential   main ─► +1 +1 +1 ... (W times)
//!
//!   racy         w0 ─► load/store ─┐
//!                w1 ─► load/store ─┼─► counter      (updates collide)
//!                w2 ─► load/store ─┘
//!
//!   channel      w0 ─► send ─┐
//!                w1 ─► send ─┼─► rendezvous ─► accumulator ─► counter
//!                w2 ─► send ─┘
//!
//!   sharded      w0 ─► [slot 0] ─┐
//!                w1 ─► [slot 1] ─┼─► sum on read
//!                w2 ─► [slot 2] ─┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use contesa::counters::{CounterKind, Workload};
//!
//! let workload = Workload::new(10_000, 4).unwrap();
//! let outcome = CounterKind::Sharded.run(workload);
//! assert_eq!(outcome.result, 10_000);
//! assert!(outcome.is_exact());
//! ```

pub mod channel;
pub mod racy;
pub mod sequential;
pub mod sharded;

use std::fmt::{self, Debug, Display};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Total number of increments used by the demo.
pub const DEFAULT_TOTAL: u64 = 50_000_000;

/// Number of workers used by the demo.
pub const DEFAULT_WORKERS: usize = 5;

/// Error returned when a [`Workload`] cannot be built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkloadError {
    /// A workload must be split across at least one worker.
    #[error("workload needs at least one worker")]
    NoWorkers,
}

/// A fixed number of increments split across a number of workers.
///
/// When `total` is not a multiple of `workers`, the remainder is spread one
/// increment each over the first workers, so the shares always add up to
/// `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workload {
    total: u64,
    workers: usize,
}

impl Workload {
    /// Creates a workload of `total` increments over `workers` threads.
    ///
    /// # Errors
    ///
    /// Returns [`WorkloadError::NoWorkers`] if `workers` is zero.
    pub fn new(total: u64, workers: usize) -> Result<Self, WorkloadError> {
        if workers == 0 {
            return Err(WorkloadError::NoWorkers);
        }
        Ok(Workload { total, workers })
    }

    /// The number of increments a correct strategy must reach.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The number of concurrent workers.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The number of increments assigned to `worker`.
    pub fn share(&self, worker: usize) -> u64 {
        let workers = self.workers as u64;
        let base = self.total / workers;
        let extra = u64::from((worker as u64) < self.total % workers);
        base + extra
    }

    /// Iterates over every worker's share, in worker order.
    pub fn shares(self) -> impl Iterator<Item = u64> {
        (0..self.workers).map(move |worker| self.share(worker))
    }
}

impl Default for Workload {
    /// `50,000,000` increments over `5` workers.
    fn default() -> Self {
        Workload {
            total: DEFAULT_TOTAL,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// What a strategy counted, before timing is attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    /// The final value of the accumulator.
    pub result: u64,
    /// Per-worker local values, for strategies that keep them.
    pub shards: Vec<u64>,
}

impl Tally {
    /// A tally with a single accumulated value and no per-worker detail.
    pub fn total(result: u64) -> Self {
        Tally {
            result,
            shards: Vec::new(),
        }
    }
}

/// A counting strategy.
///
/// Implementors only provide [`count`](Self::count); [`run`](Self::run)
/// wraps it with timing and logging.
pub trait CountingStrategy: Debug + Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> CounterKind;

    /// Performs every increment of `workload` and returns what was counted.
    fn count(&self, workload: Workload) -> Tally;

    /// Counts `workload` and reports the result with its elapsed time.
    fn run(&self, workload: Workload) -> CountOutcome {
        let kind = self.kind();
        log::debug!(
            "{kind}: counting {} over {} workers",
            workload.total(),
            workload.workers()
        );

        let start = Instant::now();
        let tally = self.count(workload);
        let elapsed = start.elapsed();

        let outcome = CountOutcome {
            kind,
            expected: workload.total(),
            result: tally.result,
            elapsed,
            shards: tally.shards,
        };

        if outcome.is_exact() {
            log::info!("{kind}: {} in {:?}", outcome.result, elapsed);
        } else {
            log::warn!(
                "{kind}: {} in {:?}, {} increments lost",
                outcome.result,
                elapsed,
                outcome.lost()
            );
        }
        outcome
    }
}

/// Identifies one of the four counting strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CounterKind {
    /// One thread performs every increment.
    Sequential,
    /// Workers share one accumulator with no synchronization.
    Racy,
    /// Workers signal a single accumulator task over a rendezvous channel.
    Channel,
    /// Workers count privately; the totals are summed afterwards.
    Sharded,
}

impl CounterKind {
    /// Every strategy, in the order the demo presents them.
    pub const ALL: [CounterKind; 4] = [
        CounterKind::Sequential,
        CounterKind::Racy,
        CounterKind::Channel,
        CounterKind::Sharded,
    ];

    /// Returns a short, stable name for this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            CounterKind::Sequential => "sequential",
            CounterKind::Racy => "racy",
            CounterKind::Channel => "channel",
            CounterKind::Sharded => "sharded",
        }
    }

    /// Returns `true` if the strategy always reaches the workload total.
    pub fn is_exact(&self) -> bool {
        !matches!(self, CounterKind::Racy)
    }

    /// Returns the implementation of this strategy.
    pub fn strategy(&self) -> &'static dyn CountingStrategy {
        match self {
            CounterKind::Sequential => &sequential::Sequential,
            CounterKind::Racy => &racy::Racy,
            CounterKind::Channel => &channel::Channel,
            CounterKind::Sharded => &sharded::Sharded,
        }
    }

    /// Shorthand for `self.strategy().run(workload)`.
    pub fn run(&self, workload: Workload) -> CountOutcome {
        self.strategy().run(workload)
    }
}

impl Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The result of one counting run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountOutcome {
    /// Which strategy produced this outcome.
    pub kind: CounterKind,
    /// The workload total.
    pub expected: u64,
    /// What the strategy actually counted.
    pub result: u64,
    /// Wall-clock time spent counting.
    pub elapsed: Duration,
    /// Per-worker local values (only [`CounterKind::Sharded`] fills this in).
    pub shards: Vec<u64>,
}

impl CountOutcome {
    /// Increments that did not make it into the result.
    pub fn lost(&self) -> u64 {
        self.expected.saturating_sub(self.result)
    }

    /// Returns `true` if the result equals the workload total.
    pub fn is_exact(&self) -> bool {
        self.result == self.expected
    }
}

impl Display for CountOutcome {
    /// Formats the outcome as `kind:result/expected (elapsed)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}/{} ({:?})",
            self.kind, self.result, self.expected, self.elapsed
        )
    }
}
