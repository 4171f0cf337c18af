//! Benchmarks for model-circuit generation and ideal evaluation
//!
//! Run with: cargo bench -p qvol-bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qvol_bench::{compute_heavy_set, generate_model_circuit};
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Benchmark building square model circuits
fn bench_model_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_circuit");

    for width in &[2u32, 4, 8, 16] {
        group.bench_with_input(BenchmarkId::new("square", width), width, |b, &n| {
            let mut rng = SmallRng::seed_from_u64(0);
            b.iter(|| generate_model_circuit(black_box(n), black_box(n), &mut rng).unwrap());
        });
    }

    group.finish();
}

/// Benchmark exact evaluation plus the median cut
fn bench_heavy_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("heavy_set");
    group.sample_size(20);

    for width in &[4u32, 8, 12, 16] {
        let mut rng = SmallRng::seed_from_u64(u64::from(*width));
        let circuit = generate_model_circuit(*width, *width, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::new("square", width), &circuit, |b, circuit| {
            b.iter(|| compute_heavy_set(black_box(circuit)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_model_circuit, bench_heavy_set);
criterion_main!(benches);
