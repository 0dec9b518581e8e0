//! Criterion benchmarks for whole-simulation ticks and on-demand outputs.

use std::hint::black_box;

use chaoscope_bench::{reference_profile, stress_profile};
use chaoscope_export::{export_simulation, to_json, ExportOptions};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_tick_reference(c: &mut Criterion) {
    let mut sim = reference_profile(42).unwrap();
    // Warm up so trails have allocated.
    sim.step(100);

    c.bench_function("tick_reference", |b| {
        b.iter(|| black_box(sim.step(1)));
    });
}

fn bench_tick_stress(c: &mut Criterion) {
    let mut sim = stress_profile(42).unwrap();
    sim.step(10);

    c.bench_function("tick_stress", |b| {
        b.iter(|| black_box(sim.step(1)));
    });
}

fn bench_1000_ticks_reference(c: &mut Criterion) {
    c.bench_function("1000_ticks_reference", |b| {
        b.iter(|| {
            let mut sim = reference_profile(42).unwrap();
            black_box(sim.step(1000));
        });
    });
}

fn bench_aggregates(c: &mut Criterion) {
    let mut sim = reference_profile(7).unwrap();
    sim.step(500);
    c.bench_function("aggregates_reference", |b| {
        b.iter(|| black_box(sim.aggregates()));
    });
}

fn bench_export_json(c: &mut Criterion) {
    let mut sim = reference_profile(7).unwrap();
    sim.step(1000);
    let options = ExportOptions::default();
    c.bench_function("export_json_reference", |b| {
        b.iter(|| {
            let doc = export_simulation(&sim, &options);
            black_box(to_json(&doc).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_tick_reference,
    bench_tick_stress,
    bench_1000_ticks_reference,
    bench_aggregates,
    bench_export_json
);
criterion_main!(benches);
