//! Criterion micro-benchmarks for trail recording and decimation.

use std::hint::black_box;

use chaoscope_core::TrajectoryId;
use chaoscope_trail::{Trail, TrailConfig, TrailStore};
use criterion::{criterion_group, criterion_main, Criterion};
use smallvec::smallvec;

/// Benchmark: push 10K points into a full 1000-point trail (steady-state
/// eviction).
fn bench_push_evicting(c: &mut Criterion) {
    c.bench_function("trail_push_evicting_10k", |b| {
        b.iter(|| {
            let mut trail = Trail::new(1000, None, 2);
            for i in 0..10_000 {
                let x = i as f64;
                trail.push(smallvec![x, -x, 0.5 * x]);
            }
            black_box(trail.len());
        });
    });
}

/// Benchmark: push 10K points with adaptive decimation at 800 points.
fn bench_push_decimating(c: &mut Criterion) {
    c.bench_function("trail_push_decimating_10k", |b| {
        b.iter(|| {
            let mut trail = Trail::new(1000, Some(800), 2);
            for i in 0..10_000 {
                let x = i as f64;
                trail.push(smallvec![x, -x, 0.5 * x]);
            }
            black_box(trail.len());
        });
    });
}

/// Benchmark: 10 trails under a shared 8000-point budget.
fn bench_store_budget(c: &mut Criterion) {
    c.bench_function("trail_store_budget_10x1000", |b| {
        b.iter(|| {
            let mut store = TrailStore::new(TrailConfig::default());
            for id in 0..10 {
                store.insert(TrajectoryId(id), "#ffffff");
            }
            for i in 0..1000 {
                let x = i as f64;
                for id in 0..10 {
                    store.add_point(TrajectoryId(id), smallvec![x, id as f64, 0.0]);
                }
            }
            black_box(store.total_points());
        });
    });
}

criterion_group!(
    benches,
    bench_push_evicting,
    bench_push_decimating,
    bench_store_budget
);
criterion_main!(benches);
