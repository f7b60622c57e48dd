//! JSON observer for serializing harness results.
//!
//! This module provides [`JsonObserver`], which serializes a
//! [`RunSnapshot`] (or any part of one) to JSON using serde.
//!
//! # Feature Flag
//!
//! This module requires the `json` feature:
//!
//! ```toml
//! [dependencies]
//! contesa = { version = "0.1", features = ["json"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use contesa::counters::Workload;
//! use contesa::harness::run_all;
//! use contesa::observers::json::JsonObserver;
//! use contesa::snapshot::RunSnapshot;
//!
//! let outcomes = run_all(Workload::new(1_000, 5).unwrap());
//! let snapshot = RunSnapshot::new().with_counters(&outcomes);
//!
//! let json = JsonObserver::new().pretty(true).to_json(snapshot)?;
//! println!("{}", json);
//! // {
//! //   "counters": [
//! //     { "strategy": "sequential", "result": 1000, "expected": 1000, "lost": 0, ... },
//! //     ...
//! ```

use crate::counters::CountOutcome;
use crate::observers::Result;
use crate::snapshot::{OutcomeSnapshot, RunSnapshot};

/// Configuration for the JSON observer.
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Whether to pretty-print the JSON output.
    pub pretty: bool,
    /// Whether to stamp the snapshot with the current time.
    pub include_timestamp: bool,
}

/// An observer that serializes harness results to JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonObserver {
    config: JsonConfig,
}

impl JsonObserver {
    /// Creates a new JSON observer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new JSON observer with the specified configuration.
    pub fn with_config(config: JsonConfig) -> Self {
        Self { config }
    }

    /// Enables or disables pretty-printing.
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.config.pretty = enabled;
        self
    }

    /// Enables or disables timestamp inclusion.
    pub fn include_timestamp(mut self, enabled: bool) -> Self {
        self.config.include_timestamp = enabled;
        self
    }

    fn serialize<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.config.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }

    /// Serializes a full run snapshot.
    pub fn to_json(&self, snapshot: RunSnapshot) -> Result<String> {
        let snapshot = if self.config.include_timestamp {
            snapshot.with_timestamp()
        } else {
            snapshot
        };
        self.serialize(&snapshot)
    }

    /// Serializes counter outcomes as a bare JSON array.
    pub fn outcomes_to_json(&self, outcomes: &[CountOutcome]) -> Result<String> {
        let snapshots: Vec<OutcomeSnapshot> = outcomes.iter().map(OutcomeSnapshot::from).collect();
        self.serialize(&snapshots)
    }
}
