//! Criterion benchmarks for the engine tick loop.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sluice_bench::{reference_profile, stress_profile};
use sluice_engine::{AnomalyInjector, EngineConfig, Simulation};

/// A 30-day simulation stepped past the first dispatch burst.
fn warmed(cfg: EngineConfig) -> Simulation {
    let mut sim = Simulation::new(cfg).unwrap();
    for _ in 0..120 {
        sim.step().unwrap();
    }
    sim
}

fn bench_tick(c: &mut Criterion, name: &str, profile: fn(u64, i64) -> EngineConfig) {
    let mut sim = warmed(profile(42, 30));

    c.bench_function(name, |b| {
        b.iter(|| {
            if sim.is_finished() {
                sim = warmed(profile(42, 30));
            }
            let outcome = sim.step().unwrap();
            black_box(&outcome);
        });
    });
}

fn bench_tick_reference(c: &mut Criterion) {
    bench_tick(c, "tick_reference", reference_profile);
}

fn bench_tick_stress(c: &mut Criterion) {
    bench_tick(c, "tick_stress", stress_profile);
}

fn bench_day_reference(c: &mut Criterion) {
    c.bench_function("day_reference", |b| {
        b.iter(|| {
            let mut cfg = reference_profile(42, 1);
            cfg.anomalies.enabled = false;
            let out = Simulation::new(cfg).unwrap().run().unwrap();
            black_box(&out);
        });
    });
}

fn bench_anomaly_injection(c: &mut Criterion) {
    let mut cfg = reference_profile(42, 7);
    cfg.anomalies.enabled = false;
    let run = Simulation::new(cfg.clone()).unwrap().run().unwrap();
    cfg.anomalies.enabled = true;
    let injector = AnomalyInjector::new(&cfg);

    c.bench_function("anomaly_injection_week", |b| {
        b.iter(|| {
            let mut history = run.history.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            let report = injector.inject(&mut history, &cfg.nodes, &run.tickets, &[], &mut rng);
            black_box(&report);
        });
    });
}

criterion_group!(
    benches,
    bench_tick_reference,
    bench_tick_stress,
    bench_day_reference,
    bench_anomaly_injection
);
criterion_main!(benches);
