//! Criterion benchmarks for full world generation on square grids.
//! Focus sizes: k×k grids with k in {2, 3, 4}.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::vector;
use roadworld::{RoadGraph, World, WorldParams};

fn grid(k: usize, pitch: f64) -> RoadGraph {
    let mut g = RoadGraph::new();
    let mut ids = Vec::with_capacity(k * k);
    for i in 0..k {
        for j in 0..k {
            ids.push(g.add_point(vector![i as f64 * pitch, j as f64 * pitch]));
        }
    }
    for i in 0..k {
        for j in 0..k {
            if i + 1 < k {
                g.add_segment(ids[i * k + j], ids[(i + 1) * k + j]);
            }
            if j + 1 < k {
                g.add_segment(ids[i * k + j], ids[i * k + j + 1]);
            }
        }
    }
    g
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("world");
    group.sample_size(10);
    for &k in &[2usize, 3, 4] {
        let graph = grid(k, 800.0);
        group.bench_with_input(BenchmarkId::new("generate_grid", k), &graph, |b, g| {
            b.iter(|| World::new(g.clone(), WorldParams::default()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
