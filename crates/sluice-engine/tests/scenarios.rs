//! End-to-end dispatch scenarios on hand-built networks.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sluice_core::{Minute, NodeId};
use sluice_engine::{AnomalyInjector, History, NodeSpec, Simulation};
use sluice_test_utils::{
    single_node_config, small_network_config, starving_pair_config, ticket, two_node_config,
    EPOCH,
};

#[test]
fn nearly_full_node_is_collected_on_first_tick() {
    let cfg = single_node_config(240);
    let capacity = cfg.dispatch.courier_capacity;
    let mut sim = Simulation::new(cfg).unwrap();
    let first = sim.step().unwrap();

    let id = first.ticket.expect("a ticket on the first tick");
    assert_eq!(id, "TT_20241030_001");
    assert_eq!(first.pending, None);
    assert_eq!(sim.ledger().len(), 1);
    let t = &sim.tickets()[0];
    assert_eq!(t.node.as_str(), "cauldron_001");
    assert_eq!(t.courier.as_str(), "courier_001");
    assert_eq!(t.collection.start(), EPOCH + 10);
    assert!(t.collection.start() < t.collection.end());
    assert!(t.true_amount > 0.0);
    assert!(t.true_amount <= capacity + 1e-9);

    while !sim.is_finished() {
        sim.step().unwrap();
    }
    for snapshot in sim.history().snapshots() {
        assert!(snapshot.levels[0] >= 0.0 && snapshot.levels[0] <= 1000.0);
    }
}

#[test]
fn drain_removes_exactly_its_net_amount() {
    let mut sim = Simulation::new(single_node_config(240)).unwrap();
    while !sim.is_finished() {
        sim.step().unwrap();
    }
    let t = sim.tickets()[0].clone();
    let spec = &sim.config().nodes[0];
    let net = t.true_amount - spec.fill_rate * t.collection.duration() as f64;
    assert!(net > 0.0);

    let h = sim.history();
    let before = h.level(t.collection.start() - 1, 0).unwrap();
    let after = h.level(t.collection.end() - 1, 0).unwrap();
    assert!(((before - after) - net).abs() < 1e-6, "drop {} vs net {net}", before - after);
}

#[test]
fn second_node_waits_for_the_only_courier() {
    let mut sim = Simulation::new(two_node_config(600)).unwrap();

    let first = sim.step().unwrap();
    assert!(first.ticket.is_some());
    assert_eq!(sim.tickets().len(), 1);
    assert_eq!(sim.tickets()[0].node.as_str(), "cauldron_001");

    let second = sim.step().unwrap();
    assert!(second.ticket.is_none());
    assert_eq!(second.pending, Some(NodeId::from("cauldron_002")));

    let mut dispatched_at = None;
    while !sim.is_finished() {
        let outcome = sim.step().unwrap();
        if outcome.ticket.is_some() && dispatched_at.is_none() {
            dispatched_at = Some(outcome.at);
        }
    }
    let dispatched_at = dispatched_at.expect("second node eventually dispatched");
    let trips = sim.roster().get(0).trips();
    assert_eq!(trips[1].node.as_str(), "cauldron_002");
    // Leaves exactly when the courier's post-unload buffer expires, and is
    // booked as soon as that departure is within the allowed delay.
    assert_eq!(trips[1].departure, trips[0].unload_complete + 30);
    assert_eq!(trips[1].departure.minutes_since(dispatched_at), 60);
    assert!(sim.metrics().pending_no_courier > 0);
}

#[test]
fn unservable_node_does_not_starve_its_neighbour() {
    let out = Simulation::new(starving_pair_config(1440))
        .unwrap()
        .run()
        .unwrap();
    assert!(!out.tickets.is_empty());
    assert!(out.tickets.iter().all(|t| t.node.as_str() == "slow"));
    assert_eq!(out.tickets[0].collection.start(), EPOCH + 10);
    assert!(out.metrics.pending_not_dispatchable > 0);
}

#[test]
fn anomaly_overlapping_a_ticket_is_rejected() {
    let cfg = small_network_config(1, 2);
    let nodes: Vec<NodeSpec> = vec![cfg.nodes[0].clone()];
    let mut history = History::new(vec![nodes[0].id.clone()], EPOCH);
    for _ in 0..2000 {
        history.push(vec![600.0]);
    }
    let blocking = ticket(
        "TT_20241030_001",
        "cauldron_001",
        "courier_001",
        EPOCH,
        2000,
        80.0,
    );
    let untouched = history.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let report =
        AnomalyInjector::new(&cfg).inject(&mut history, &nodes, &[blocking], &[], &mut rng);
    assert!(report.accepted.is_empty());
    assert!(report.exhausted());
    assert_eq!(history, untouched);
}

#[test]
fn tickets_span_whole_run_and_stay_consistent() {
    let out = Simulation::new(small_network_config(7, 3))
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(out.history.len(), 3 * 1440);
    assert!(!out.tickets.is_empty());
    for t in &out.tickets {
        assert!(t.collection.start() <= t.collection.end());
        assert!(t.collection.start() >= EPOCH);
        if t.suspicious {
            assert!(t.true_amount >= t.reported_amount);
        } else {
            assert_eq!(t.true_amount, t.reported_amount);
        }
    }
    let last: Minute = out.history.last_minute().unwrap();
    assert_eq!(last, EPOCH + (3 * 1440 - 1));
}
