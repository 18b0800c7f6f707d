//! Criterion micro-benchmarks for dataset rendering, digests, and schedules.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sluice_bench::reference_profile;
use sluice_dataset::{build_schedules, history_digest, write_json, Dataset};
use sluice_engine::Simulation;

fn bench_render_week(c: &mut Criterion) {
    let cfg = reference_profile(42, 7);
    let run = Simulation::new(cfg.clone()).unwrap().run().unwrap();

    c.bench_function("render_week", |b| {
        b.iter(|| {
            let ds = Dataset::from_run(&cfg, &run);
            black_box(&ds);
        });
    });
}

fn bench_digest_week(c: &mut Criterion) {
    let cfg = reference_profile(42, 7);
    let run = Simulation::new(cfg.clone()).unwrap().run().unwrap();
    let ds = Dataset::from_run(&cfg, &run);

    c.bench_function("history_digest_week", |b| {
        b.iter(|| black_box(history_digest(black_box(&ds.history))));
    });

    c.bench_function("history_json_week", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(8 << 20);
            write_json(&mut buf, &ds.history).unwrap();
            black_box(buf.len());
        });
    });
}

fn bench_schedules_week(c: &mut Criterion) {
    let cfg = reference_profile(42, 7);
    let run = Simulation::new(cfg.clone()).unwrap().run().unwrap();

    c.bench_function("schedules_week", |b| {
        b.iter(|| {
            let file = build_schedules(
                &run.tickets,
                &cfg.travel,
                &cfg.depot,
                cfg.dispatch.unload_minutes,
            );
            black_box(&file);
        });
    });
}

criterion_group!(
    benches,
    bench_render_week,
    bench_digest_week,
    bench_schedules_week
);
criterion_main!(benches);
