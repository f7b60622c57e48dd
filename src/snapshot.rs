//! Snapshot types for serializing demo results.
//!
//! The harness returns plain structs holding [`Duration`]s and enums; this
//! module flattens them into serde-friendly snapshots (milliseconds as
//! `f64`, derived fields such as `lost` materialized).
//!
//! # Feature Flag
//!
//! This module requires the `serde` feature:
//!
//! ```toml
//! [dependencies]
//! contesa = { version = "0.1", features = ["serde"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use contesa::counters::{CounterKind, Workload};
//! use contesa::snapshot::OutcomeSnapshot;
//!
//! let outcome = CounterKind::Sharded.run(Workload::new(100, 2).unwrap());
//! let snapshot = OutcomeSnapshot::from(&outcome);
//!
//! let json = serde_json::to_string(&snapshot).unwrap();
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::counters::{CountOutcome, CounterKind};
use crate::harness::{ContentionReport, IdentityProbe};
use crate::registry::Strategy;

fn millis(elapsed: Duration) -> f64 {
    elapsed.as_nanos() as f64 / 1_000_000.0
}

/// A snapshot of one counting run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutcomeSnapshot {
    /// The strategy that ran.
    pub strategy: CounterKind,
    /// What it counted.
    pub result: u64,
    /// What it should have counted.
    pub expected: u64,
    /// `expected - result`.
    pub lost: u64,
    /// Elapsed wall-clock time in milliseconds.
    pub elapsed_ms: f64,
    /// Per-worker local values, when the strategy keeps them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shards: Vec<u64>,
}

impl From<&CountOutcome> for OutcomeSnapshot {
    fn from(outcome: &CountOutcome) -> Self {
        OutcomeSnapshot {
            strategy: outcome.kind,
            result: outcome.result,
            expected: outcome.expected,
            lost: outcome.lost(),
            elapsed_ms: millis(outcome.elapsed),
            shards: outcome.shards.clone(),
        }
    }
}

/// A snapshot of one contention probe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentionSnapshot {
    /// The strategy every caller used.
    pub strategy: Strategy,
    /// Number of concurrent callers.
    pub callers: usize,
    /// Distinct stores handed out.
    pub distinct_instances: usize,
    /// Stores constructed by the registry.
    pub constructions: usize,
    /// Size of the current store after the burst.
    pub final_size: usize,
    /// Callers whose read-back failed.
    pub failed_reads: usize,
}

impl From<&ContentionReport> for ContentionSnapshot {
    fn from(report: &ContentionReport) -> Self {
        ContentionSnapshot {
            strategy: report.strategy,
            callers: report.callers,
            distinct_instances: report.distinct_instances,
            constructions: report.constructions,
            final_size: report.final_size,
            failed_reads: report.failed_reads,
        }
    }
}

/// The store a strategy resolved to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentitySnapshot {
    /// The strategy used.
    pub strategy: Strategy,
    /// The store's id.
    pub instance: u64,
}

/// Everything one demo run produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunSnapshot {
    /// Optional timestamp in milliseconds since Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    /// Identity probe results.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identity: Vec<IdentitySnapshot>,
    /// Contention probe results.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contention: Vec<ContentionSnapshot>,
    /// Counter outcomes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub counters: Vec<OutcomeSnapshot>,
}

impl RunSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps the snapshot with the current time.
    pub fn with_timestamp(mut self) -> Self {
        self.timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_millis() as u64);
        self
    }

    /// Adds identity probe results.
    pub fn with_identity(mut self, probe: &IdentityProbe) -> Self {
        self.identity = probe
            .ids
            .iter()
            .map(|&(strategy, instance)| IdentitySnapshot { strategy, instance })
            .collect();
        self
    }

    /// Adds contention probe results.
    pub fn with_contention<'a>(mut self, reports: impl IntoIterator<Item = &'a ContentionReport>) -> Self {
        self.contention = reports.into_iter().map(ContentionSnapshot::from).collect();
        self
    }

    /// Adds counter outcomes.
    pub fn with_counters<'a>(mut self, outcomes: impl IntoIterator<Item = &'a CountOutcome>) -> Self {
        self.counters = outcomes.into_iter().map(OutcomeSnapshot::from).collect();
        self
    }

    /// Finds a counter outcome by strategy.
    pub fn counter(&self, kind: CounterKind) -> Option<&OutcomeSnapshot> {
        self.counters.iter().find(|c| c.strategy == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(kind: CounterKind, result: u64) -> CountOutcome {
        CountOutcome {
            kind,
            expected: 100,
            result,
            elapsed: Duration::from_millis(250),
            shards: Vec::new(),
        }
    }

    #[test]
    fn test_outcome_snapshot() {
        let snapshot = OutcomeSnapshot::from(&outcome(CounterKind::Racy, 60));
        assert_eq!(snapshot.strategy, CounterKind::Racy);
        assert_eq!(snapshot.lost, 40);
        assert!((snapshot.elapsed_ms - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_snapshot_builder() {
        let outcomes = [
            outcome(CounterKind::Sequential, 100),
            outcome(CounterKind::Racy, 80),
        ];
        let snapshot = RunSnapshot::new().with_counters(&outcomes);
        assert_eq!(snapshot.counters.len(), 2);
        assert_eq!(snapshot.counter(CounterKind::Racy).map(|c| c.result), Some(80));
        assert!(snapshot.counter(CounterKind::Channel).is_none());
        assert!(snapshot.timestamp_ms.is_none());
    }

    #[test]
    fn test_with_timestamp() {
        let snapshot = RunSnapshot::new().with_timestamp();
        assert!(snapshot.timestamp_ms.is_some());
    }

    #[test]
    fn test_with_identity() {
        let probe = IdentityProbe {
            ids: vec![(Strategy::OnceGuarded, 7), (Strategy::DoubleChecked, 7)],
        };
        let snapshot = RunSnapshot::new().with_identity(&probe);
        assert_eq!(snapshot.identity[1].strategy, Strategy::DoubleChecked);
        assert_eq!(snapshot.identity[1].instance, 7);
    }
}
