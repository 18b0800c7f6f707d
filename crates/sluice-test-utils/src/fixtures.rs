//! Reusable engine configurations.
//!
//! - [`single_node_config`]: one nearly full, fast-filling node and one courier.
//! - [`two_node_config`]: two full nodes competing for one courier.
//! - [`starving_pair_config`]: an unservable node ranked above a servable one.
//! - [`small_network_config`]: six nodes, four couriers on shifts, anomalies on.

use sluice_core::{CourierId, Minute, NodeId, TimeWindow};
use sluice_engine::{CourierSpec, EngineConfig, NodeSpec, Shift, Ticket};
use sluice_network::{Edge, TravelModel};

/// 2024-10-30T00:00:00Z.
pub const EPOCH: Minute = Minute(28_837_440);

/// Depot id used by every fixture.
pub const DEPOT: &str = "market_001";

fn star(nodes: &[NodeSpec], minutes: &[u32]) -> TravelModel {
    let mut travel = TravelModel::new();
    for (node, &m) in nodes.iter().zip(minutes) {
        // Fixture ids are unique and never the depot, so inserts cannot fail.
        let _ = travel.insert(Edge::new(DEPOT, node.id.location(), m));
    }
    travel
}

/// One 1000 L node at 950 L filling 10 L/min, one courier on any shift.
///
/// Every tunable keeps its default; only anomaly injection is off.
pub fn single_node_config(minutes: i64) -> EngineConfig {
    let nodes = vec![NodeSpec::new("cauldron_001", 1000.0, 10.0).with_initial_level(950.0)];
    let travel = star(&nodes, &[10]);
    let mut cfg = EngineConfig::new(
        EPOCH,
        EPOCH + (minutes - 1),
        DEPOT,
        nodes,
        vec![CourierSpec::new("courier_001", Shift::Any)],
        travel,
    );
    cfg.anomalies.enabled = false;
    cfg
}

/// Two full 1000 L nodes and a single courier on any shift.
///
/// Every tunable keeps its default; only anomaly injection is off.
pub fn two_node_config(minutes: i64) -> EngineConfig {
    let nodes = vec![
        NodeSpec::new("cauldron_001", 1000.0, 1.0).with_initial_level(1000.0),
        NodeSpec::new("cauldron_002", 1000.0, 1.0).with_initial_level(995.0),
    ];
    let travel = star(&nodes, &[12, 18]);
    let mut cfg = EngineConfig::new(
        EPOCH,
        EPOCH + (minutes - 1),
        DEPOT,
        nodes,
        vec![CourierSpec::new("courier_001", Shift::Any)],
        travel,
    );
    cfg.anomalies.enabled = false;
    cfg
}

/// One node refilling faster than a courier can carry in a single minute
/// next to an ordinary full node, one courier, default tunables.
pub fn starving_pair_config(minutes: i64) -> EngineConfig {
    let nodes = vec![
        NodeSpec::new("fast", 1000.0, 150.0).with_initial_level(1000.0),
        NodeSpec::new("slow", 1000.0, 0.1).with_initial_level(950.0),
    ];
    let travel = star(&nodes, &[10, 10]);
    let mut cfg = EngineConfig::new(
        EPOCH,
        EPOCH + (minutes - 1),
        DEPOT,
        nodes,
        vec![CourierSpec::new("courier_001", Shift::Any)],
        travel,
    );
    cfg.anomalies.enabled = false;
    cfg
}

/// Six nodes with mixed rates, four couriers (one per shift plus a
/// floater), default tunables, anomalies enabled.
pub fn small_network_config(seed: u64, days: i64) -> EngineConfig {
    let nodes = vec![
        NodeSpec::new("cauldron_001", 1000.0, 0.20)
            .with_threshold(0.3)
            .with_initial_level(400.0),
        NodeSpec::new("cauldron_002", 800.0, 0.15)
            .with_threshold(0.3)
            .with_initial_level(350.0),
        NodeSpec::new("cauldron_003", 1200.0, 0.25)
            .with_threshold(0.35)
            .with_initial_level(600.0),
        NodeSpec::new("cauldron_004", 600.0, 0.10)
            .with_threshold(0.4)
            .with_initial_level(250.0),
        NodeSpec::new("cauldron_005", 900.0, 0.18)
            .with_threshold(0.3)
            .with_initial_level(500.0),
        NodeSpec::new("cauldron_006", 700.0, 0.12)
            .with_threshold(0.5)
            .with_initial_level(300.0),
    ];
    let mut travel = star(&nodes, &[15, 22, 30, 18, 25, 40]);
    let _ = travel.insert(Edge::new("cauldron_001", "cauldron_002", 9));
    let couriers = vec![
        CourierSpec::new("courier_001", Shift::Night),
        CourierSpec::new("courier_002", Shift::Day),
        CourierSpec::new("courier_003", Shift::Evening),
        CourierSpec::new("courier_004", Shift::Any),
    ];
    let mut cfg = EngineConfig::new(
        EPOCH,
        EPOCH + (days * 1440 - 1),
        DEPOT,
        nodes,
        couriers,
        travel,
    );
    cfg.seed = seed;
    cfg
}

/// A non-suspicious ticket for hand-built scenarios.
pub fn ticket(id: &str, node: &str, courier: &str, start: Minute, minutes: i64, amount: f64) -> Ticket {
    Ticket {
        id: id.to_string(),
        node: NodeId::from(node),
        courier: CourierId::from(courier),
        collection: TimeWindow::with_duration(start, minutes)
            .unwrap_or_else(|_| panic!("fixture window of {minutes} minutes is malformed")),
        reported_amount: amount,
        true_amount: amount,
        suspicious: false,
    }
}
