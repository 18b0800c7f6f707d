//! Continuing a run from its own output.

use indexmap::IndexMap;
use sluice_engine::{PriorState, Simulation};
use sluice_test_utils::{small_network_config, EPOCH};

#[test]
fn resumed_run_continues_where_the_first_stopped() {
    let mut first_cfg = small_network_config(5, 1);
    first_cfg.anomalies.enabled = false;
    let first = Simulation::new(first_cfg).unwrap().run().unwrap();
    let last = first.history.snapshots().last().unwrap();

    let levels: IndexMap<_, _> = first
        .history
        .node_ids()
        .iter()
        .cloned()
        .zip(last.levels.iter().copied())
        .collect();
    let prior = PriorState {
        last_minute: last.at,
        levels: levels.clone(),
        tickets: first.tickets.clone(),
        anomalies: Vec::new(),
    };

    let mut cfg = small_network_config(6, 2);
    cfg.start = last.at.next();
    cfg.anomalies.enabled = false;
    let mut sim = Simulation::resume(cfg, prior).unwrap();

    // Levels carried over, extraction counts rebuilt.
    for (i, level) in levels.values().enumerate() {
        assert_eq!(sim.nodes().level(i), *level);
    }
    let rebuilt: u32 = (0..sim.nodes().len())
        .map(|i| sim.nodes().state(i).extractions)
        .sum();
    assert_eq!(rebuilt as usize, first.tickets.len());

    // Extractions still running at the boundary are back in the ledger.
    let in_flight = first
        .tickets
        .iter()
        .filter(|t| t.collection.end() > sim.now())
        .count();
    assert_eq!(sim.ledger().len(), in_flight);

    // Rebuilt courier schedules hold every prior trip.
    let trips: usize = sim.roster().iter().map(|c| c.trips().len()).sum();
    assert_eq!(trips, first.tickets.len());

    while !sim.is_finished() {
        sim.step().unwrap();
    }
    let second = sim.finish();

    // Gap-free continuation.
    assert_eq!(second.history.start(), EPOCH + 1440);
    assert_eq!(second.history.len(), 1440);

    // Numbering continues from the prior count.
    if let Some(t) = second.tickets.first() {
        let counter: usize = t.id.rsplit('_').next().unwrap().parse().unwrap();
        assert_eq!(counter, first.tickets.len() + 1);
    }

    // No courier double-booked across the boundary.
    let mut all = first.tickets.clone();
    all.extend(second.tickets.iter().cloned());
    for c in ["courier_001", "courier_002", "courier_003", "courier_004"] {
        let mut windows: Vec<_> = all
            .iter()
            .filter(|t| t.courier.as_str() == c)
            .map(|t| t.collection)
            .collect();
        windows.sort_by_key(|w| w.start());
        for pair in windows.windows(2) {
            assert!(!pair[0].overlaps(&pair[1]));
        }
    }
}
