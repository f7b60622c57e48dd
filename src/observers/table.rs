//! Table observer for pretty-printing harness results.
//!
//! This module provides [`TableObserver`], which renders counter outcomes,
//! contention reports and identity probes as formatted tables using the
//! `tabled` crate.
//!
//! # Feature Flag
//!
//! This module requires the `table` feature:
//!
//! ```toml
//! [dependencies]
//! contesa = { version = "0.1", features = ["table"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use contesa::counters::Workload;
//! use contesa::harness::run_all;
//! use contesa::observers::table::{TableObserver, TableStyle};
//!
//! let outcomes = run_all(Workload::new(1_000_000, 5).unwrap());
//! let observer = TableObserver::new().with_style(TableStyle::Rounded);
//! println!("{}", observer.render_outcomes(&outcomes));
//! // ╭────────────┬─────────┬──────────┬────────┬──────────╮
//! // │ Strategy   │ Result  │ Expected │ Lost   │ Elapsed  │
//! // ├────────────┼─────────┼──────────┼────────┼──────────┤
//! // │ sequential │ 1000000 │ 1000000  │ 0      │ 2.1ms    │
//! // │ racy       │ 412345  │ 1000000  │ 587655 │ 4.8ms    │
//! // ...
//! ```

use std::time::Duration;

use tabled::{settings::Style, Table, Tabled};

use crate::counters::CountOutcome;
use crate::harness::{ContentionReport, IdentityProbe};

/// Available table styles for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// ASCII table with simple characters: +, -, |
    Ascii,
    /// Modern rounded corners (default)
    #[default]
    Rounded,
    /// Sharp corners with box-drawing characters
    Sharp,
    /// Modern style with clean lines
    Modern,
    /// GitHub-flavored Markdown table
    Markdown,
    /// Dots for borders
    Dots,
    /// No borders, just spacing
    Blank,
}

/// Configuration for the table observer.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// The style to use for rendering.
    pub style: TableStyle,
    /// Whether to show the header row.
    pub show_header: bool,
    /// Custom title for the table (optional).
    pub title: Option<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            style: TableStyle::default(),
            show_header: true,
            title: None,
        }
    }
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Result")]
    result: u64,
    #[tabled(rename = "Expected")]
    expected: u64,
    #[tabled(rename = "Lost")]
    lost: u64,
    #[tabled(rename = "Elapsed")]
    elapsed: String,
}

#[derive(Tabled)]
struct ContentionRow {
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Callers")]
    callers: usize,
    #[tabled(rename = "Instances")]
    instances: usize,
    #[tabled(rename = "Constructions")]
    constructions: usize,
    #[tabled(rename = "Size")]
    size: usize,
    #[tabled(rename = "Failed reads")]
    failed_reads: usize,
}

#[derive(Tabled)]
struct IdentityRow {
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Instance")]
    instance: String,
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.1?}", elapsed)
}

/// An observer that renders harness results as formatted tables.
///
/// # Examples
///
/// ```rust,ignore
/// use contesa::observers::table::{TableObserver, TableStyle};
///
/// let observer = TableObserver::new()
///     .with_style(TableStyle::Markdown)
///     .with_title("counters");
/// let output = observer.render_outcomes(&outcomes);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableObserver {
    config: TableConfig,
}

impl TableObserver {
    /// Creates a new table observer with default settings.
    ///
    /// Default style is [`TableStyle::Rounded`] with a header row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new table observer with the specified configuration.
    pub fn with_config(config: TableConfig) -> Self {
        Self { config }
    }

    /// Sets the table style.
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.config.style = style;
        self
    }

    /// Sets whether to show the header row.
    pub fn with_header(mut self, show: bool) -> Self {
        self.config.show_header = show;
        self
    }

    /// Sets an optional title printed above the table.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    /// Applies the configured style to a table.
    fn apply_style(&self, table: &mut Table) {
        match self.config.style {
            TableStyle::Ascii => {
                table.with(Style::ascii());
            }
            TableStyle::Rounded => {
                table.with(Style::rounded());
            }
            TableStyle::Sharp => {
                table.with(Style::sharp());
            }
            TableStyle::Modern => {
                table.with(Style::modern());
            }
            TableStyle::Markdown => {
                table.with(Style::markdown());
            }
            TableStyle::Dots => {
                table.with(Style::dots());
            }
            TableStyle::Blank => {
                table.with(Style::blank());
            }
        }
    }

    fn finish<T: Tabled>(&self, rows: &[T]) -> String {
        let mut table = Table::new(rows);
        self.apply_style(&mut table);

        if !self.config.show_header {
            table.with(tabled::settings::Remove::row(
                tabled::settings::object::Rows::first(),
            ));
        }

        if let Some(ref title) = self.config.title {
            format!("{}\n{}", title, table)
        } else {
            table.to_string()
        }
    }

    /// Renders counter outcomes, one row per strategy.
    pub fn render_outcomes(&self, outcomes: &[CountOutcome]) -> String {
        let rows: Vec<OutcomeRow> = outcomes
            .iter()
            .map(|o| OutcomeRow {
                strategy: o.kind.to_string(),
                result: o.result,
                expected: o.expected,
                lost: o.lost(),
                elapsed: format_elapsed(o.elapsed),
            })
            .collect();
        self.finish(&rows)
    }

    /// Renders contention reports, one row per probe.
    pub fn render_contention(&self, reports: &[ContentionReport]) -> String {
        let rows: Vec<ContentionRow> = reports
            .iter()
            .map(|r| ContentionRow {
                strategy: r.strategy.to_string(),
                callers: r.callers,
                instances: r.distinct_instances,
                constructions: r.constructions,
                size: r.final_size,
                failed_reads: r.failed_reads,
            })
            .collect();
        self.finish(&rows)
    }

    /// Renders the store each strategy resolved to.
    pub fn render_identity(&self, probe: &IdentityProbe) -> String {
        let rows: Vec<IdentityRow> = probe
            .ids
            .iter()
            .map(|(strategy, id)| IdentityRow {
                strategy: strategy.to_string(),
                instance: format!("store#{id}"),
            })
            .collect();
        self.finish(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::CounterKind;
    use crate::registry::Strategy;

    fn outcome(kind: CounterKind, result: u64) -> CountOutcome {
        CountOutcome {
            kind,
            expected: 1_000,
            result,
            elapsed: Duration::from_micros(1_500),
            shards: Vec::new(),
        }
    }

    #[test]
    fn test_render_empty() {
        let output = TableObserver::new().render_outcomes(&[]);
        assert!(output.contains("Strategy"));
    }

    #[test]
    fn test_render_outcomes() {
        let outcomes = [
            outcome(CounterKind::Sequential, 1_000),
            outcome(CounterKind::Racy, 640),
        ];
        let output = TableObserver::new().render_outcomes(&outcomes);
        assert!(output.contains("sequential"));
        assert!(output.contains("racy"));
        assert!(output.contains("640"));
        assert!(output.contains("360"));
        assert!(output.contains("1.5ms"));
    }

    #[test]
    fn test_render_with_title() {
        let output = TableObserver::new()
            .with_title("Counters")
            .render_outcomes(&[outcome(CounterKind::Channel, 1_000)]);
        assert!(output.starts_with("Counters\n"));
    }

    #[test]
    fn test_render_without_header() {
        let output = TableObserver::new()
            .with_header(false)
            .render_outcomes(&[outcome(CounterKind::Sharded, 1_000)]);
        assert!(!output.contains("Expected"));
        assert!(output.contains("sharded"));
    }

    #[test]
    fn test_render_with_different_styles() {
        let outcomes = [outcome(CounterKind::Sequential, 1_000)];
        for style in [
            TableStyle::Ascii,
            TableStyle::Rounded,
            TableStyle::Sharp,
            TableStyle::Modern,
            TableStyle::Markdown,
            TableStyle::Dots,
            TableStyle::Blank,
        ] {
            let output = TableObserver::new()
                .with_style(style)
                .render_outcomes(&outcomes);
            assert!(output.contains("sequential"), "{style:?}");
        }
    }

    #[test]
    fn test_render_contention() {
        let report = ContentionReport {
            strategy: Strategy::DoubleChecked,
            callers: 100,
            distinct_instances: 1,
            constructions: 1,
            final_size: 100,
            failed_reads: 0,
        };
        let output = TableObserver::new().render_contention(&[report]);
        assert!(output.contains("double_checked"));
        assert!(output.contains("Constructions"));
    }

    #[test]
    fn test_render_identity() {
        let probe = IdentityProbe {
            ids: vec![(Strategy::Unsynchronized, 3), (Strategy::OnceGuarded, 3)],
        };
        let output = TableObserver::new().render_identity(&probe);
        assert!(output.contains("once_guarded"));
        assert!(output.contains("store#3"));
    }

    #[test]
    fn test_config_builder() {
        let config = TableConfig {
            style: TableStyle::Ascii,
            show_header: false,
            title: Some("t".to_string()),
        };
        let observer = TableObserver::with_config(config);
        let output = observer.render_outcomes(&[outcome(CounterKind::Racy, 1)]);
        assert!(output.starts_with("t\n+"));
    }
}
