use std::sync::Arc;
use std::thread;

use contesa::registry::{SingletonRegistry, Strategy};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const NUM_THREADS: usize = 8;
const ITERATIONS_PER_THREAD: usize = 100_000;

/// Cost of resolving an already-initialized store from a single thread.
fn bench_warm_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("warm_access");

    for strategy in Strategy::ALL {
        let registry = SingletonRegistry::new();
        registry.once_guarded();

        group.bench_function(BenchmarkId::new("single thread", strategy), |b| {
            b.iter(|| black_box(registry.get(black_box(strategy))))
        });
    }

    group.finish();
}

/// Cost of resolving an already-initialized store from many threads at once.
fn bench_contended_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_access");

    for strategy in Strategy::THREAD_SAFE {
        group.bench_function(
            BenchmarkId::new(
                strategy.name(),
                format!("{}threads x {}iter", NUM_THREADS, ITERATIONS_PER_THREAD),
            ),
            |b| {
                b.iter(|| {
                    let registry = Arc::new(SingletonRegistry::new());
                    let mut handles = vec![];

                    for _ in 0..NUM_THREADS {
                        let registry = Arc::clone(&registry);
                        let handle = thread::spawn(move || {
                            for _ in 0..ITERATIONS_PER_THREAD {
                                black_box(registry.get(strategy));
                            }
                        });
                        handles.push(handle);
                    }

                    for handle in handles {
                        handle.join().unwrap();
                    }

                    black_box(registry.constructions())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_warm_access, bench_contended_access);
criterion_main!(benches);
