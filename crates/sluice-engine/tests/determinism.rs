//! Identical inputs produce identical datasets.

use sluice_engine::{RunOutput, Simulation};
use sluice_test_utils::small_network_config;

fn run(seed: u64) -> RunOutput {
    Simulation::new(small_network_config(seed, 2))
        .unwrap()
        .run()
        .unwrap()
}

#[test]
fn same_seed_same_output() {
    let a = run(42);
    let b = run(42);
    assert_eq!(a.history, b.history);
    assert_eq!(a.tickets, b.tickets);
    assert_eq!(a.anomalies, b.anomalies);
    assert_eq!(a.metrics.dispatches, b.metrics.dispatches);
}

#[test]
fn different_seed_different_history() {
    let a = run(1);
    let b = run(2);
    assert_ne!(a.history, b.history);
}

#[test]
fn stepping_and_running_agree() {
    let mut sim = Simulation::new(small_network_config(9, 1)).unwrap();
    while !sim.is_finished() {
        sim.step().unwrap();
    }
    let stepped = sim.finish();
    let ran = Simulation::new(small_network_config(9, 1))
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(stepped.history, ran.history);
    assert_eq!(stepped.tickets, ran.tickets);
}
