//! # Contesa - Singletons and Counters Under Contention
//!
//! A small library that puts competing concurrency strategies side by side
//! so their correctness and cost can be observed and tested, not just
//! described.
//!
//! It covers two classic problems:
//!
//! 1. **Lazy singletons.** A [`SingletonRegistry`](registry::SingletonRegistry)
//!    owns one thread-safe [`KeyValueStore`](store::KeyValueStore) and hands it
//!    out through four accessors: unsynchronized, mutex-guarded, one-shot
//!    guarded and double-checked locking.
//! 2. **Shared counters.** Four [counting strategies](counters) split the
//!    same workload over several threads: sequential, racy shared
//!    accumulator, channel-serialized accumulator and shard-then-aggregate.
//!
//! ## The Problem
//!
//! Both problems have a tempting, wrong answer. Checking "is the instance
//! set?" and then constructing it is a race: two threads can both see
//! "no" and both construct. Reading a counter, adding one and writing it
//! back is the same race: two threads can both read `n` and both write
//! `n + 1`.
//!
//! ## The Strategies
//!
//! | Problem | Wrong | Serialized | Lock-free after setup |
//! |---------|-------|------------|-----------------------|
//! | Singleton | [`Unsynchronized`](registry::Strategy::Unsynchronized) | [`MutexGuarded`](registry::Strategy::MutexGuarded) | [`OnceGuarded`](registry::Strategy::OnceGuarded), [`DoubleChecked`](registry::Strategy::DoubleChecked) |
//! | Counter | [`Racy`](counters::CounterKind::Racy) | [`Channel`](counters::CounterKind::Channel) | [`Sharded`](counters::CounterKind::Sharded) |
//!
//! The wrong strategies are kept on purpose: they are the baseline the
//! others are measured and tested against. Both are written so that they
//! lose races without invoking undefined behavior.
//!
//! ## Quick Start
//!
//! ```rust
//! use contesa::registry::{instance, Strategy};
//!
//! let store = instance(Strategy::OnceGuarded);
//! store.set("nome", "João");
//!
//! // every accessor converges on the same store
//! let again = instance(Strategy::DoubleChecked);
//! assert!(std::ptr::eq(store, again));
//! assert_eq!(again.get("nome").as_deref(), Some("João"));
//! ```
//!
//! ```rust
//! use contesa::counters::{CounterKind, Workload};
//!
//! let workload = Workload::new(100_000, 5).unwrap();
//! for kind in CounterKind::ALL {
//!     let outcome = kind.run(workload);
//!     assert!(outcome.result <= 100_000);
//!     if kind.is_exact() {
//!         assert_eq!(outcome.lost(), 0);
//!     }
//! }
//! ```
//!
//! ## Driver Entry Points
//!
//! The [`harness`] module wraps both halves in functions that return
//! structured reports: which store each strategy resolved to, what a burst
//! of concurrent callers observed, and how far each counter got.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: store construction at
//! `debug`, counter results at `info`, lost updates and orphaned
//! singletons at `warn`. No logger is installed by the library.
//!
//! ## Observers
//!
//! Optional renderers are gated behind feature flags:
//!
//! | Feature | Module | Description |
//! |---------|--------|-------------|
//! | `table` | `observers::table` | Pretty-print results as ASCII tables |
//! | `json` | `observers::json` | Serialize results to JSON |
//! | `full` | All observers | Enables all observer modules |
//! | `demo` | `contesa-demo` binary | Command-line driver |

pub mod counters;
pub mod harness;
pub mod observers;
pub mod registry;
pub mod store;

#[cfg(feature = "serde")]
pub mod snapshot;
