//! Criterion benchmarks for the envelope union.
//! Focus sizes: n in {1, 4, 16, 32} envelopes along a random polyline.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p roadworld

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use roadworld::geom2::{union, Envelope, Polygon, Segment};

fn random_road_envelopes(n: usize, seed: u64) -> Vec<Polygon> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut at = Vector2::new(0.0, 0.0);
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        // random walk so consecutive envelopes overlap at their joints
        let theta: f64 = rng.gen::<f64>() * std::f64::consts::TAU;
        let len = rng.gen_range(150.0..600.0);
        let next = at + Vector2::new(theta.cos(), theta.sin()) * len;
        out.push(Envelope::new(Segment::new(at, next), 100.0, 10).poly);
        at = next;
    }
    out
}

fn bench_union(c: &mut Criterion) {
    let mut group = c.benchmark_group("union");
    for &n in &[1usize, 4, 16, 32] {
        group.bench_with_input(BenchmarkId::new("road_envelopes", n), &n, |b, &n| {
            b.iter_batched(
                || random_road_envelopes(n, 43),
                |polys| {
                    let _soup = union(&polys);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_union);
criterion_main!(benches);
