//! Renderers for harness results.
//!
//! - [`table`] - Pretty-print outcomes and probe reports as tables using the `tabled` crate
//! - [`json`] - Serialize a [`RunSnapshot`](crate::snapshot::RunSnapshot) to JSON
//!
//! # Unified Error Handling
//!
//! All observers use a unified [`ObserverError`] type, so the demo driver
//! can switch output formats without changing its error handling.
//!
//! # Feature Flags
//!
//! - `table` - Enables the [`table`] module
//! - `json` - Enables the [`json`] module (and `serde`)
//! - `full` - Enables both

mod error;

pub use error::{ObserverError, Result};

#[cfg(feature = "table")]
pub mod table;

#[cfg(feature = "json")]
pub mod json;
