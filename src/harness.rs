//! Entry points that exercise the registry and the counters and return
//! structured results instead of printing.
//!
//! The demo binary is a thin layer over these functions; tests call them
//! directly to assert on the outcome.
//!
//! # Examples
//!
//! ```rust
//! use contesa::harness::{probe_contention, probe_identity};
//! use contesa::registry::{SingletonRegistry, Strategy};
//!
//! let registry = SingletonRegistry::new();
//! let report = probe_contention(&registry, Strategy::OnceGuarded, 32);
//! assert!(report.holds_single_instance());
//!
//! let probe = probe_identity(&registry);
//! assert!(probe.is_unique());
//! ```

use std::collections::HashSet;
use std::panic;
use std::sync::Barrier;
use std::thread;

use crate::counters::{CountOutcome, CounterKind, Workload};
use crate::registry::{SingletonRegistry, Strategy};

/// The store id each strategy resolved to, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProbe {
    /// `(strategy, store id)` pairs.
    pub ids: Vec<(Strategy, u64)>,
}

impl IdentityProbe {
    /// Returns `true` if every strategy resolved the same store.
    pub fn is_unique(&self) -> bool {
        self.ids
            .iter()
            .map(|(_, id)| id)
            .collect::<HashSet<_>>()
            .len()
            <= 1
    }
}

/// Resolves the store once through each strategy from the calling thread.
pub fn probe_identity(registry: &SingletonRegistry) -> IdentityProbe {
    let ids = Strategy::ALL
        .into_iter()
        .map(|strategy| (strategy, registry.get(strategy).id()))
        .collect();
    IdentityProbe { ids }
}

/// What a burst of concurrent callers observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentionReport {
    /// The strategy every caller used.
    pub strategy: Strategy,
    /// Number of concurrent callers.
    pub callers: usize,
    /// Number of distinct stores the callers were handed.
    pub distinct_instances: usize,
    /// Stores the registry has constructed so far.
    pub constructions: usize,
    /// Size of the registry's current store after the burst.
    pub final_size: usize,
    /// Callers that could not read back the value they had just written.
    pub failed_reads: usize,
}

impl ContentionReport {
    /// Returns `true` if the burst observed exactly one store and the
    /// registry never built another.
    pub fn holds_single_instance(&self) -> bool {
        self.distinct_instances <= 1 && self.constructions <= 1
    }
}

/// Releases `callers` threads together against `registry`.
///
/// Every caller resolves the store through `strategy`, writes
/// `caller_<i> = value_<i>`, reads it back and reads the store size.
/// The threads are held on a barrier until all of them exist, so first
/// access is as concurrent as the machine allows.
pub fn probe_contention(
    registry: &SingletonRegistry,
    strategy: Strategy,
    callers: usize,
) -> ContentionReport {
    let barrier = Barrier::new(callers);

    let observed: Vec<(u64, bool)> = thread::scope(|s| {
        let handles: Vec<_> = (0..callers)
            .map(|caller| {
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    let store = registry.get(strategy);
                    let (key, value) = (format!("caller_{caller}"), format!("value_{caller}"));
                    store.set(key.as_str(), value.as_str());
                    let read_back = store.get(&key).is_some_and(|v| v == value);
                    let _ = store.size();
                    (store.id(), read_back)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect()
    });

    let distinct_instances = observed.iter().map(|(id, _)| id).collect::<HashSet<_>>().len();
    let failed_reads = observed.iter().filter(|(_, ok)| !ok).count();

    let report = ContentionReport {
        strategy,
        callers,
        distinct_instances,
        constructions: registry.constructions(),
        final_size: registry.peek().map_or(0, |store| store.size()),
        failed_reads,
    };
    log::debug!("{strategy}: {report:?}");
    report
}

/// Runs one counter strategy over `workload`.
pub fn run_counter(kind: CounterKind, workload: Workload) -> CountOutcome {
    kind.run(workload)
}

/// Runs the given counter strategies one after another.
pub fn run_counters(kinds: &[CounterKind], workload: Workload) -> Vec<CountOutcome> {
    kinds.iter().map(|kind| run_counter(*kind, workload)).collect()
}

/// Runs all four counter strategies one after another.
pub fn run_all(workload: Workload) -> Vec<CountOutcome> {
    run_counters(&CounterKind::ALL, workload)
}
