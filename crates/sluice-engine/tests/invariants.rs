//! Properties that must hold after every tick, for any seed.

use std::collections::HashSet;

use proptest::prelude::*;
use sluice_engine::Simulation;
use sluice_test_utils::small_network_config;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn levels_drains_and_schedules_stay_consistent(seed in any::<u64>()) {
        let cfg = small_network_config(seed, 2);
        let capacity = cfg.dispatch.courier_capacity;
        let buffer = cfg.dispatch.trip_buffer_minutes;
        let maxima: Vec<f64> = cfg.nodes.iter().map(|n| n.max_volume).collect();
        let fills: Vec<f64> = cfg.nodes.iter().map(|n| n.fill_rate).collect();
        let mut sim = Simulation::new(cfg).unwrap();

        while !sim.is_finished() {
            sim.step().unwrap();

            // Levels within bounds.
            for (i, max) in maxima.iter().enumerate() {
                let level = sim.nodes().level(i);
                prop_assert!(level >= 0.0 && level <= *max, "node {i} at {level}");
            }

            // At most one registered drain per node.
            let mut seen = HashSet::new();
            for d in sim.ledger().drains() {
                prop_assert!(seen.insert(d.node), "node {} drained twice", d.node);
            }
        }

        // Courier trips are chronological and separated by the buffer.
        for courier in sim.roster().iter() {
            for pair in courier.trips().windows(2) {
                let (a, b) = (pair[0].span(), pair[1].span());
                prop_assert!(!a.overlaps(&b));
                prop_assert!(a.separation(&b) >= buffer);
            }
        }

        // Ticket consistency.
        for t in sim.tickets() {
            prop_assert!(t.collection.start() <= t.collection.end());
            prop_assert!(t.true_amount <= capacity + 1e-9);
            if t.suspicious {
                prop_assert!(t.true_amount >= t.reported_amount);
            } else {
                prop_assert_eq!(t.true_amount, t.reported_amount);
            }
        }

        // Anomalies only ever lower levels, so bounds still hold afterwards.
        let out = sim.finish();
        for s in out.history.snapshots() {
            for (level, max) in s.levels.iter().zip(&maxima) {
                prop_assert!(*level >= 0.0 && level <= max);
            }
        }
        // No minute rises faster than the noisiest fill plus jitter allows,
        // so injected losses never snap back.
        for pair in out.history.snapshots().windows(2) {
            for i in 0..fills.len() {
                let rise = pair[1].levels[i] - pair[0].levels[i];
                let ceiling = fills[i] * 1.1 + maxima[i] * 0.0005 + 1e-9;
                prop_assert!(rise <= ceiling, "node {i} rose {rise} at {}", pair[1].at);
            }
        }
    }
}

#[test]
fn collections_on_one_node_are_spaced() {
    let cfg = small_network_config(3, 3);
    let gap = cfg.dispatch.node_gap_minutes;
    let out = Simulation::new(cfg).unwrap().run().unwrap();
    let mut by_node: Vec<_> = out.tickets.iter().collect();
    by_node.sort_by_key(|t| (t.node.clone(), t.collection.start()));
    for pair in by_node.windows(2) {
        if pair[0].node == pair[1].node {
            assert!(pair[0].collection.separation(&pair[1].collection) >= gap);
        }
    }
}
