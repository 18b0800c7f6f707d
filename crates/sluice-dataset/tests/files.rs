//! Datasets written to disk, read back, and continued.

use std::collections::HashSet;

use sluice_dataset::{
    build_schedules, compare_histories, continue_dataset, generate, history_digest, load,
    reassign, save, ticket_digest, Dataset, DatasetPaths, NetworkFile, ReassignOptions,
    SimulationSettings,
};

const NETWORK: &str = r#"{
    "depot": "market_001",
    "nodes": [
        { "id": "cauldron_001", "max_volume": 1000, "fill_rate": 0.20, "collection_threshold": 0.3, "initial_level": 400 },
        { "id": "cauldron_002", "max_volume": 800,  "fill_rate": 0.15, "collection_threshold": 0.3, "initial_level": 350 },
        { "id": "cauldron_003", "max_volume": 1200, "fill_rate": 0.25, "collection_threshold": 0.35 },
        { "id": "cauldron_004", "max_volume": 600,  "fill_rate": 0.10, "collection_threshold": 0.4, "initial_level": 250 }
    ],
    "network": { "edges": [
        { "from": "market_001", "to": "cauldron_001", "travel_time_minutes": 15 },
        { "from": "market_001", "to": "cauldron_002", "travel_time_minutes": 22 },
        { "from": "market_001", "to": "cauldron_003", "travel_time_minutes": 30 },
        { "from": "market_001", "to": "cauldron_004", "travel_time_minutes": 18 }
    ] },
    "couriers": [
        { "courier_id": "courier_001", "shift": 1 },
        { "courier_id": "courier_002", "shift": 2 },
        { "courier_id": "courier_003", "shift": 3 },
        { "courier_id": "courier_004" }
    ]
}"#;

fn network() -> NetworkFile {
    serde_json::from_str(NETWORK).unwrap()
}

fn settings(seed: u64, days: u32) -> SimulationSettings {
    SimulationSettings {
        seed,
        days,
        ..SimulationSettings::default()
    }
}

fn counter(id: &str) -> usize {
    id.rsplit('_').next().unwrap().parse().unwrap()
}

#[test]
fn dataset_survives_a_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DatasetPaths::new(dir.path());
    save(&paths.network(), &network()).unwrap();

    let generated = generate(&load(&paths.network()).unwrap(), &settings(3, 1)).unwrap();
    generated.dataset.save(&paths).unwrap();
    assert!(paths.has_history());

    let back = Dataset::load(&paths).unwrap();
    assert_eq!(back, generated.dataset);
    assert_eq!(history_digest(&back.history), history_digest(&generated.dataset.history));
    assert_eq!(ticket_digest(&back.tickets), ticket_digest(&generated.dataset.tickets));
}

#[test]
fn continuation_appends_without_gaps() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DatasetPaths::new(dir.path());
    let first = generate(&network(), &settings(8, 1)).unwrap();
    first.dataset.save(&paths).unwrap();
    let first_tickets = first.dataset.tickets.transport_tickets.len();

    let existing = Dataset::load(&paths).unwrap();
    let second = continue_dataset(&network(), &settings(8, 1), existing).unwrap();
    let ds = &second.dataset;

    ds.check_contiguous().unwrap();
    assert_eq!(ds.history.data.len(), 2 * 1440);
    assert_eq!(ds.history.metadata.total_minutes, 2 * 1440);
    assert_eq!(ds.history.metadata.start_date, "2024-10-30T00:00:00Z");
    assert_eq!(ds.history.metadata.end_date, "2024-10-31T23:59:00Z");
    assert_eq!(second.config.start.format(), "2024-10-31T00:00:00Z");

    // Prior records are kept untouched at the front.
    assert_eq!(
        ds.history.data[..1440],
        first.dataset.history.data[..],
    );
    assert_eq!(
        ds.tickets.transport_tickets[..first_tickets],
        first.dataset.tickets.transport_tickets[..],
    );

    // Numbering continues and ids stay unique.
    let counters: Vec<usize> = ds
        .tickets
        .transport_tickets
        .iter()
        .map(|t| counter(&t.ticket_id))
        .collect();
    assert_eq!(counters, (1..=counters.len()).collect::<Vec<_>>());
    let ids: HashSet<_> = ds.tickets.transport_tickets.iter().map(|t| &t.ticket_id).collect();
    assert_eq!(ids.len(), ds.tickets.transport_tickets.len());

    assert_eq!(ds.tickets.metadata.total_tickets, ds.tickets.transport_tickets.len());
    assert_eq!(
        ds.drains.metadata.total_unreported_drains,
        ds.drains.unreported_drains.len()
    );
    assert_eq!(ds.history.metadata.total_collections, ds.tickets.transport_tickets.len());
}

#[test]
fn digest_tracks_the_seed() {
    let a = generate(&network(), &settings(21, 1)).unwrap();
    let b = generate(&network(), &settings(21, 1)).unwrap();
    let c = generate(&network(), &settings(22, 1)).unwrap();

    assert_eq!(history_digest(&a.dataset.history), history_digest(&b.dataset.history));
    assert!(compare_histories(&a.dataset.history, &b.dataset.history).is_none());

    assert_ne!(history_digest(&a.dataset.history), history_digest(&c.dataset.history));
    let report = compare_histories(&a.dataset.history, &c.dataset.history).unwrap();
    assert!(report.first_index().is_some());
}

#[test]
fn engine_schedules_reconstruct_without_late_arrivals() {
    let generated = generate(&network(), &settings(5, 2)).unwrap();
    let schedules = generated.schedules().unwrap();
    assert_eq!(
        schedules.metadata.total_tickets,
        generated.dataset.tickets.transport_tickets.len()
    );
    assert_eq!(schedules.metadata.late_arrivals, 0);
    let listed: usize = schedules
        .courier_schedules
        .values()
        .map(|c| c.total_tickets)
        .sum();
    assert_eq!(listed, schedules.metadata.total_tickets);
    for courier in schedules.courier_schedules.values() {
        for pair in courier.schedule.windows(2) {
            assert!(pair[0].ready_for_next_task <= pair[1].departure_from_depot);
        }
    }
}

#[test]
fn written_tickets_honour_the_suspicious_convention() {
    let generated = generate(&network(), &settings(13, 3)).unwrap();
    for t in &generated.dataset.tickets.transport_tickets {
        assert!(t.collection_start_timestamp <= t.collection_timestamp);
        match t.actual_amount_collected {
            Some(actual) => {
                assert!(t.is_suspicious);
                assert!(actual >= t.amount_collected);
            }
            None => assert!(!t.is_suspicious),
        }
    }
}

#[test]
fn reassigned_couriers_are_never_double_booked() {
    let generated = generate(&network(), &settings(5, 2)).unwrap();
    let net = network();
    let travel = net.travel().unwrap();
    let s = settings(5, 2);
    let options = ReassignOptions {
        couriers: net.couriers.len(),
        unload_minutes: s.unload_minutes,
        buffer_minutes: s.trip_buffer_minutes,
    };
    let r = reassign(&generated.dataset.tickets, &travel, &net.depot, &options).unwrap();

    assert_eq!(
        r.tickets.transport_tickets.len(),
        generated.dataset.tickets.transport_tickets.len()
    );
    let carried: usize = r.load().iter().map(|(_, n)| n).sum();
    assert_eq!(carried, r.tickets.transport_tickets.len());
    for courier in r.roster.iter() {
        for pair in courier.trips().windows(2) {
            assert!(pair[0].span().separation(&pair[1].span()) >= s.trip_buffer_minutes);
        }
    }
    let tickets = r.tickets.to_tickets().unwrap();
    let schedules = build_schedules(&tickets, &travel, &net.depot, s.unload_minutes);
    assert_eq!(schedules.metadata.late_arrivals, 0);
}
