//! Benchmark profiles for the Sluice collection-network simulator.
//!
//! Provides pre-built [`EngineConfig`] profiles for benchmarking:
//!
//! - [`reference_profile`]: 12 nodes, 5 couriers, the production mix
//! - [`stress_profile`]: 120 nodes, 40 couriers
//! - [`star_travel`]: deterministic depot-to-node travel times via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use sluice_core::{Minute, NodeId, MINUTES_PER_DAY};
use sluice_engine::{CourierSpec, EngineConfig, NodeSpec, Shift};
use sluice_network::{Edge, TravelModel};

/// Depot used by every profile.
pub const DEPOT: &str = "market_001";

/// 2024-10-30T00:00:00Z.
pub const START: Minute = Minute(28_837_440);

/// Fill rates of the twelve reference nodes. One fills about twice as
/// fast as the rest and overflows part-way through a long run.
const REFERENCE_FILL: [f64; 12] = [
    0.08, 0.065, 0.09, 0.07, 0.075, 0.055, 0.095, 0.08, 0.18, 0.075, 0.09, 0.065,
];

/// Build the reference profile: 12 nodes, 5 couriers (one floater),
/// `days` days from [`START`].
pub fn reference_profile(seed: u64, days: i64) -> EngineConfig {
    let nodes: Vec<NodeSpec> = REFERENCE_FILL
        .iter()
        .enumerate()
        .map(|(i, &fill)| {
            let max = 800.0 + ((i * 137) % 600) as f64;
            NodeSpec::new(format!("cauldron_{:03}", i + 1), max, fill)
                .with_threshold(0.3)
                .with_initial_level(max * 0.25)
        })
        .collect();
    let couriers = vec![
        CourierSpec::new("courier_001", Shift::Night),
        CourierSpec::new("courier_002", Shift::Day),
        CourierSpec::new("courier_003", Shift::Evening),
        CourierSpec::new("courier_004", Shift::Day),
        CourierSpec::new("courier_005", Shift::Any),
    ];
    profile(seed, days, nodes, couriers)
}

/// Build a stress profile: 120 nodes, 40 couriers across the shifts.
///
/// Same tunables as [`reference_profile`] at 10x the node count.
pub fn stress_profile(seed: u64, days: i64) -> EngineConfig {
    let nodes: Vec<NodeSpec> = (0..120)
        .map(|i| {
            let fill = REFERENCE_FILL[i % REFERENCE_FILL.len()];
            let max = 800.0 + ((i * 137) % 600) as f64;
            NodeSpec::new(format!("cauldron_{:03}", i + 1), max, fill)
                .with_threshold(0.3)
                .with_initial_level(max * 0.25)
        })
        .collect();
    let shifts = [Shift::Night, Shift::Day, Shift::Evening, Shift::Any];
    let couriers = (0..40)
        .map(|i| CourierSpec::new(format!("courier_{:03}", i + 1), shifts[i % shifts.len()]))
        .collect();
    profile(seed, days, nodes, couriers)
}

fn profile(
    seed: u64,
    days: i64,
    nodes: Vec<NodeSpec>,
    couriers: Vec<CourierSpec>,
) -> EngineConfig {
    let ids: Vec<NodeId> = nodes.iter().map(|n| n.id.clone()).collect();
    let mut cfg = EngineConfig::new(
        START,
        START + (days * MINUTES_PER_DAY - 1),
        DEPOT,
        nodes,
        couriers,
        star_travel(&ids, seed),
    );
    cfg.seed = seed;
    cfg
}

/// Deterministic depot-to-node travel times in `10..=45` minutes.
///
/// Uses a simple hash of the seed so profiles are reproducible without
/// an RNG. Node-to-node pairs fall back to the model default.
pub fn star_travel(nodes: &[NodeId], seed: u64) -> TravelModel {
    let mut travel = TravelModel::new();
    for (i, node) in nodes.iter().enumerate() {
        let h = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(i as u64 * 1442695040888963407);
        let minutes = 10 + ((h >> 33) % 36) as u32;
        // Node ids never equal the depot and each pair appears once.
        let _ = travel.insert(Edge::new(DEPOT, node.location(), minutes));
    }
    travel
}
