//! Detailed courier schedules reconstructed from tickets.
//!
//! Each ticket is expanded into the full depot → node → depot trip using
//! the travel model. Couriers leave just in time to arrive at the
//! recorded collection start. If the previous trip's unload has not
//! finished in time, the courier leaves straight after it, arrives late,
//! and the whole collection slides by the delay.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sluice_core::{CourierId, LocationId, Minute, NodeId};
use sluice_engine::Ticket;
use sluice_network::TravelModel;

use crate::records::round2;

/// `courier_schedules.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleFile {
    /// Totals.
    pub metadata: ScheduleMetadata,
    /// Per courier, ordered by courier id.
    pub courier_schedules: IndexMap<CourierId, CourierScheduleRecord>,
}

/// Header of the schedule file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetadata {
    /// Couriers with at least one ticket.
    pub total_couriers: usize,
    /// Tickets expanded.
    pub total_tickets: usize,
    /// Unload duration applied to every trip.
    pub unload_time_minutes: i64,
    /// Trips whose courier could not arrive at the recorded start.
    pub late_arrivals: usize,
}

/// Every trip of one courier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourierScheduleRecord {
    /// Number of entries.
    pub total_tickets: usize,
    /// Trips in chronological order.
    pub schedule: Vec<ScheduleEntry>,
}

/// One expanded trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Ticket the trip was built from.
    pub ticket_id: String,
    /// Node visited.
    pub node_id: NodeId,
    /// Reported amount.
    pub amount_collected: f64,
    /// Leaves the depot.
    pub departure_from_depot: String,
    /// Outbound leg.
    pub travel_to_node_minutes: u32,
    /// Reaches the node.
    pub arrival_at_node: String,
    /// Extraction begins.
    pub collection_start: String,
    /// Extraction length.
    pub collection_duration_minutes: i64,
    /// Extraction ends.
    pub collection_end: String,
    /// Leaves the node.
    pub departure_from_node: String,
    /// Return leg.
    pub travel_to_depot_minutes: u32,
    /// Back at the depot.
    pub arrival_at_depot: String,
    /// Unloading begins.
    pub unload_start: String,
    /// Unloading length.
    pub unload_duration_minutes: i64,
    /// Unloading ends.
    pub unload_complete: String,
    /// Free for the next trip.
    pub ready_for_next_task: String,
    /// Minutes after the recorded collection start the courier arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_by_minutes: Option<i64>,
}

/// Expand `tickets` into per-courier trip schedules.
pub fn build_schedules(
    tickets: &[Ticket],
    travel: &TravelModel,
    depot: &LocationId,
    unload_minutes: i64,
) -> ScheduleFile {
    let mut by_courier: IndexMap<CourierId, Vec<&Ticket>> = IndexMap::new();
    for t in tickets {
        by_courier.entry(t.courier.clone()).or_default().push(t);
    }
    by_courier.sort_keys();

    let mut late_arrivals = 0;
    let mut courier_schedules = IndexMap::with_capacity(by_courier.len());
    for (courier, mut trips) in by_courier {
        trips.sort_by_key(|t| t.collection.start());
        let mut ready: Option<Minute> = None;
        let mut schedule = Vec::with_capacity(trips.len());
        for t in trips {
            let (entry, free) = expand(t, travel, depot, unload_minutes, ready);
            if entry.late_by_minutes.is_some() {
                late_arrivals += 1;
            }
            ready = Some(free);
            schedule.push(entry);
        }
        let record = CourierScheduleRecord {
            total_tickets: schedule.len(),
            schedule,
        };
        courier_schedules.insert(courier, record);
    }

    ScheduleFile {
        metadata: ScheduleMetadata {
            total_couriers: courier_schedules.len(),
            total_tickets: tickets.len(),
            unload_time_minutes: unload_minutes,
            late_arrivals,
        },
        courier_schedules,
    }
}

/// One trip, plus the minute the courier is free again.
fn expand(
    t: &Ticket,
    travel: &TravelModel,
    depot: &LocationId,
    unload_minutes: i64,
    ready: Option<Minute>,
) -> (ScheduleEntry, Minute) {
    let (to, back) = travel.round_trip(depot, &t.node.location());
    let recorded = t.collection.start();
    let on_time_departure = recorded - i64::from(to);

    let (departure, arrival) = match ready {
        Some(free) if free > on_time_departure => (free, free + i64::from(to)),
        _ => (on_time_departure, recorded),
    };
    let late = arrival.minutes_since(recorded);

    let duration = t.collection.duration();
    let collection_end = arrival + duration;
    let at_depot = collection_end + i64::from(back);
    let unload_complete = at_depot + unload_minutes;

    let entry = ScheduleEntry {
        ticket_id: t.id.clone(),
        node_id: t.node.clone(),
        amount_collected: round2(t.reported_amount),
        departure_from_depot: departure.format(),
        travel_to_node_minutes: to,
        arrival_at_node: arrival.format(),
        collection_start: arrival.format(),
        collection_duration_minutes: duration,
        collection_end: collection_end.format(),
        departure_from_node: collection_end.format(),
        travel_to_depot_minutes: back,
        arrival_at_depot: at_depot.format(),
        unload_start: at_depot.format(),
        unload_duration_minutes: unload_minutes,
        unload_complete: unload_complete.format(),
        ready_for_next_task: unload_complete.format(),
        late_by_minutes: (late > 0).then_some(late),
    };
    (entry, unload_complete)
}
