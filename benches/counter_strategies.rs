use contesa::counters::{CounterKind, CountingStrategy, Workload};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const TOTAL: u64 = 1_000_000;
const NUM_WORKERS: usize = 5;

fn bench_counter_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("counter_strategies");
    group.sample_size(10);

    let workload = Workload::new(TOTAL, NUM_WORKERS).unwrap();

    for kind in CounterKind::ALL {
        group.bench_function(
            BenchmarkId::new(kind.name(), format!("{}workers x {}total", NUM_WORKERS, TOTAL)),
            |b| b.iter(|| black_box(kind.strategy().count(black_box(workload)).result)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_counter_strategies);
criterion_main!(benches);
