//! Criterion benchmarks for estimator throughput

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use sentinel_engine::{rng_from_seed, Estimator, EstimatorConfig, Layout, NoProgress};

fn benchmark_plain_run(c: &mut Criterion) {
    let estimator = Estimator::new(EstimatorConfig::default()).unwrap();
    c.bench_function("estimator_1000_iterations_no_history", |b| {
        b.iter_batched(
            || rng_from_seed(Some(42)),
            |mut rng| {
                let result = estimator.run_plain(&mut rng, &mut NoProgress).unwrap();
                black_box(result);
            },
            BatchSize::SmallInput,
        )
    });
}

fn benchmark_adaptive_run(c: &mut Criterion) {
    let estimator = Estimator::new(EstimatorConfig::default()).unwrap();
    let recent = vec![
        Layout::from_cells([0, 7, 13]),
        Layout::from_cells([2, 11, 24]),
        Layout::from_cells([5, 6, 18]),
    ];
    c.bench_function("estimator_1000_iterations_three_patterns", |b| {
        b.iter_batched(
            || rng_from_seed(Some(42)),
            |mut rng| {
                let result = estimator
                    .run(black_box(&recent), 5, &mut rng, &mut NoProgress)
                    .unwrap();
                black_box(result);
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, benchmark_plain_run, benchmark_adaptive_run);
criterion_main!(benches);
