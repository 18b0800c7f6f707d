//! Move existing tickets onto a smaller pool of round-the-clock couriers.
//!
//! Collection windows are fixed by the level history, so a courier can
//! only take a ticket if the whole trip around that window (outbound leg,
//! collection, return leg, unload) clears its other trips by the buffer.
//! Trips are offered in departure order and couriers are tried
//! round-robin, starting after the one that took the previous trip. In
//! that order a pool at least as large as the busiest moment always
//! places every ticket.

use sluice_core::{CourierId, LocationId};
use sluice_engine::{CourierSpec, Roster, Shift, Trip};
use sluice_network::TravelModel;
use tracing::{debug, info};

use crate::error::DatasetError;
use crate::network::CourierRecord;
use crate::records::TicketFile;

/// Courier, trip buffer and unload settings for a reassignment.
#[derive(Clone, Debug, PartialEq)]
pub struct ReassignOptions {
    /// Size of the new pool.
    pub couriers: usize,
    /// Minutes spent unloading at the depot.
    pub unload_minutes: i64,
    /// Minimum idle minutes between two trips of one courier.
    pub buffer_minutes: i64,
}

/// A reassigned ticket file and the pool that carries it.
#[derive(Clone, Debug)]
pub struct Reassignment {
    /// The new roster entries, all without a shift.
    pub couriers: Vec<CourierRecord>,
    /// The input tickets in their original order, courier ids replaced.
    pub tickets: TicketFile,
    /// Every courier's committed trips.
    pub roster: Roster,
}

impl Reassignment {
    /// Tickets carried by each courier, in roster order.
    pub fn load(&self) -> Vec<(CourierId, usize)> {
        self.roster
            .iter()
            .map(|c| (c.id.clone(), c.trips().len()))
            .collect()
    }
}

/// Courier ids of a pool of `n`: `courier_001`, `courier_002`, ...
pub fn pool_ids(n: usize) -> Vec<CourierId> {
    (1..=n)
        .map(|i| CourierId::from(format!("courier_{i:03}")))
        .collect()
}

/// Reassign every ticket in `file` to a pool of `options.couriers`
/// couriers with no shift restrictions.
///
/// Fails with [`DatasetError::Unassignable`] on the first ticket no
/// courier can take without overlapping another trip.
pub fn reassign(
    file: &TicketFile,
    travel: &TravelModel,
    depot: &LocationId,
    options: &ReassignOptions,
) -> Result<Reassignment, DatasetError> {
    let n = options.couriers;
    if n == 0 {
        return Err(DatasetError::Inconsistent {
            detail: "a reassignment needs at least one courier".to_string(),
        });
    }
    let specs: Vec<CourierSpec> = pool_ids(n)
        .into_iter()
        .map(|id| CourierSpec::new(id, Shift::Any))
        .collect();
    let mut roster = Roster::new(&specs);

    let tickets = file.to_tickets()?;
    let mut trips = Vec::with_capacity(tickets.len());
    for (i, t) in tickets.iter().enumerate() {
        let (to, back) = travel.round_trip(depot, &t.node.location());
        let departure = t.collection.start() - i64::from(to);
        let return_arrival = t.collection.end() + i64::from(back);
        trips.push((i, departure, return_arrival));
    }
    trips.sort_by_key(|&(i, departure, _)| (departure, i));

    let mut out = file.clone();
    let mut next = 0;
    for (i, departure, return_arrival) in trips {
        let t = &tickets[i];
        let mut taken = None;
        for k in 0..n {
            let c = (next + k) % n;
            let schedule = roster.get_mut(c);
            let trip = Trip::new(
                &schedule.id,
                t.node.clone(),
                departure,
                t.collection,
                return_arrival,
                return_arrival + options.unload_minutes,
            )?;
            if schedule.is_free(&trip.span(), options.buffer_minutes) {
                schedule.commit(trip)?;
                taken = Some(c);
                break;
            }
        }
        let Some(c) = taken else {
            return Err(DatasetError::Unassignable {
                ticket_id: t.id.clone(),
                couriers: n,
            });
        };
        let courier = roster.get(c).id.clone();
        debug!(ticket = %t.id, courier = %courier, "ticket reassigned");
        out.transport_tickets[i].courier_id = courier;
        next = (c + 1) % n;
    }

    info!(
        tickets = out.transport_tickets.len(),
        couriers = n,
        "tickets reassigned"
    );
    let couriers = specs
        .into_iter()
        .map(|s| CourierRecord {
            courier_id: s.id,
            shift: None,
        })
        .collect();
    Ok(Reassignment {
        couriers,
        tickets: out,
        roster,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::TicketRecord;
    use sluice_network::Edge;
    use sluice_test_utils::{ticket, DEPOT, EPOCH};

    fn travel() -> TravelModel {
        TravelModel::from_edges([
            Edge::new(DEPOT, "cauldron_001", 15),
            Edge::new(DEPOT, "cauldron_002", 20),
        ])
        .unwrap()
    }

    fn options(couriers: usize) -> ReassignOptions {
        ReassignOptions {
            couriers,
            unload_minutes: 15,
            buffer_minutes: 30,
        }
    }

    fn file(tickets: &[sluice_engine::Ticket]) -> TicketFile {
        TicketFile::new(tickets.iter().map(TicketRecord::from_ticket).collect())
    }

    #[test]
    fn overlapping_trips_go_to_different_couriers() {
        // Spans 00:45-02:10 and 01:40-02:40 overlap; the third trip leaves
        // at 03:25, clear of the first courier's buffer.
        let tickets = [
            ticket("TT_20241030_001", "cauldron_001", "courier_017", EPOCH + 60, 40, 80.0),
            ticket("TT_20241030_002", "cauldron_002", "courier_018", EPOCH + 120, 5, 60.0),
            ticket("TT_20241030_003", "cauldron_001", "courier_019", EPOCH + 220, 30, 70.0),
        ];
        let r = reassign(&file(&tickets), &travel(), &DEPOT.into(), &options(2)).unwrap();

        let ids: Vec<&str> = r
            .tickets
            .transport_tickets
            .iter()
            .map(|t| t.courier_id.as_str())
            .collect();
        assert_eq!(ids, ["courier_001", "courier_002", "courier_001"]);
        assert_eq!(
            r.load(),
            [(CourierId::from("courier_001"), 2), (CourierId::from("courier_002"), 1)]
        );
        assert!(r.couriers.iter().all(|c| c.shift.is_none()));
        // Nothing but the courier changes.
        assert_eq!(r.tickets.metadata, file(&tickets).metadata);
        assert_eq!(
            r.tickets.transport_tickets[0].collection_start_timestamp,
            "2024-10-30T01:00:00Z"
        );
    }

    #[test]
    fn too_small_a_pool_is_reported() {
        let tickets = [
            ticket("TT_20241030_001", "cauldron_001", "courier_001", EPOCH + 60, 40, 80.0),
            ticket("TT_20241030_002", "cauldron_002", "courier_002", EPOCH + 70, 40, 60.0),
        ];
        match reassign(&file(&tickets), &travel(), &DEPOT.into(), &options(1)) {
            Err(DatasetError::Unassignable {
                ticket_id,
                couriers: 1,
            }) => assert_eq!(ticket_id, "TT_20241030_002"),
            other => panic!("expected Unassignable, got {other:?}"),
        }
    }

    #[test]
    fn empty_pool_rejected() {
        match reassign(&file(&[]), &travel(), &DEPOT.into(), &options(0)) {
            Err(DatasetError::Inconsistent { .. }) => {}
            other => panic!("expected Inconsistent, got {other:?}"),
        }
    }
}
