//! Integration tests for the process-wide registry.
//!
//! Every test in this file shares one global store, so they run serially and
//! never assume the store is empty or uninitialized.

use std::collections::HashSet;
use std::ptr;
use std::sync::Barrier;
use std::thread;

use contesa::harness::{probe_contention, probe_identity};
use contesa::registry::{self, instance, Strategy};
use serial_test::serial;

#[test]
#[serial]
fn test_all_accessors_return_same_instance() {
    let first = instance(Strategy::OnceGuarded);
    for strategy in Strategy::ALL {
        assert!(ptr::eq(first, instance(strategy)), "{strategy}");
    }
    assert_eq!(registry::global().constructions(), 1);
}

#[test]
#[serial]
fn test_data_shared_between_accessors() {
    instance(Strategy::OnceGuarded).set("nome", "João");
    instance(Strategy::MutexGuarded).set("idade", "30");

    assert_eq!(
        instance(Strategy::DoubleChecked).get("nome").as_deref(),
        Some("João")
    );
    assert_eq!(
        instance(Strategy::Unsynchronized).get("idade").as_deref(),
        Some("30")
    );

    instance(Strategy::DoubleChecked).delete("nome");
    assert_eq!(instance(Strategy::OnceGuarded).get("nome"), None);
}

#[test]
#[serial]
fn test_identity_probe_is_unique() {
    registry::global().once_guarded();
    let probe = probe_identity(registry::global());
    assert!(probe.is_unique(), "{probe:?}");
}

#[test]
#[serial]
fn test_concurrent_mixed_callers_never_panic() {
    registry::global().once_guarded();
    let before = registry::global().constructions();

    let barrier = Barrier::new(100);
    let ids: HashSet<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..100)
            .map(|i| {
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    let store = instance(Strategy::THREAD_SAFE[i % 3]);
                    let key = format!("goroutine_{i}");
                    store.set(key.as_str(), format!("valor_{i}"));
                    assert_eq!(store.get(&key), Some(format!("valor_{i}")));
                    assert!(store.size() >= 1);
                    store.id()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(ids.len(), 1);
    assert_eq!(registry::global().constructions(), before);
}

#[test]
#[serial]
fn test_contention_probes_on_global() {
    registry::global().once_guarded();
    for strategy in Strategy::THREAD_SAFE {
        let report = probe_contention(registry::global(), strategy, 100);
        assert!(report.holds_single_instance(), "{report:?}");
        assert_eq!(report.failed_reads, 0);
        assert!(report.final_size >= 100);
    }
}
