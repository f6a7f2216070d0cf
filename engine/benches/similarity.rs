//! Benchmarks for layout comparison and adaptive generation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sentinel_engine::generator::DEFAULT_MAX_ATTEMPTS;
use sentinel_engine::{generate, is_too_similar, rng_from_seed, similarity, Layout, GRID_CELLS};

fn benchmark_similarity(c: &mut Criterion) {
    let a = Layout::from_cells([1, 4, 9, 16, 23]);
    let b = Layout::from_cells([0, 4, 9, 15, 22]);
    c.bench_function("jaccard_five_cells", |bench| {
        bench.iter(|| similarity(black_box(&a), black_box(&b)))
    });

    let history: Vec<Layout> = (0..50)
        .map(|i| Layout::from_cells([i % 25, (i * 7) % 25, (i * 11 + 3) % 25]))
        .collect();
    let candidate = Layout::from_cells([2, 12, 20]);
    c.bench_function("too_similar_full_history", |bench| {
        bench.iter(|| is_too_similar(black_box(&candidate), black_box(&history), 0.6))
    });
}

fn benchmark_generate(c: &mut Criterion) {
    let recent = vec![Layout::from_cells([0, 1, 2]), Layout::from_cells([10, 11, 12])];
    let mut rng = rng_from_seed(Some(7));
    c.bench_function("adaptive_generate_three_mines", |bench| {
        bench.iter(|| {
            generate(3, black_box(&recent), DEFAULT_MAX_ATTEMPTS, GRID_CELLS, &mut rng).unwrap()
        })
    });
}

criterion_group!(benches, benchmark_similarity, benchmark_generate);
criterion_main!(benches);
