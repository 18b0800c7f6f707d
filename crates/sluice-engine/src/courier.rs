//! Courier trips, per-courier schedules, and the roster.

use sluice_core::{CourierId, Minute, NodeId, ScheduleError, TimeWindow};

use crate::config::{CourierSpec, Shift};

// ── Trip ───────────────────────────────────────────────────────────

/// One depot → node → depot round trip.
#[derive(Clone, Debug, PartialEq)]
pub struct Trip {
    /// Node visited.
    pub node: NodeId,
    /// Leaves the depot.
    pub departure: Minute,
    /// Extraction window at the node; starts on arrival.
    pub collection: TimeWindow,
    /// Back at the depot.
    pub return_arrival: Minute,
    /// Unloading done; the courier is free again.
    pub unload_complete: Minute,
    span: TimeWindow,
}

impl Trip {
    /// Build a trip from its stage times, checking they are in order.
    pub fn new(
        courier: &CourierId,
        node: NodeId,
        departure: Minute,
        collection: TimeWindow,
        return_arrival: Minute,
        unload_complete: Minute,
    ) -> Result<Trip, ScheduleError> {
        let stages = [
            ("arrival", departure, collection.start()),
            ("return_arrival", collection.end(), return_arrival),
            ("unload_complete", return_arrival, unload_complete),
        ];
        for (stage, before, after) in stages {
            if after < before {
                return Err(ScheduleError::StagesOutOfOrder {
                    courier: courier.clone(),
                    stage,
                });
            }
        }
        let span = TimeWindow::new(departure, unload_complete)?;
        Ok(Trip {
            node,
            departure,
            collection,
            return_arrival,
            unload_complete,
            span,
        })
    }

    /// Arrival at the node.
    pub fn arrival(&self) -> Minute {
        self.collection.start()
    }

    /// `[departure, unload_complete)`: the courier is busy for all of it.
    pub fn span(&self) -> TimeWindow {
        self.span
    }
}

// ── CourierSchedule ────────────────────────────────────────────────

/// A courier's chronological list of trips.
#[derive(Clone, Debug, PartialEq)]
pub struct CourierSchedule {
    /// Courier identifier.
    pub id: CourierId,
    /// Working hours.
    pub shift: Shift,
    trips: Vec<Trip>,
}

impl CourierSchedule {
    /// An idle courier.
    pub fn new(spec: &CourierSpec) -> Self {
        Self {
            id: spec.id.clone(),
            shift: spec.shift,
            trips: Vec::new(),
        }
    }

    /// When the last committed trip finishes unloading.
    pub fn last_unload(&self) -> Option<Minute> {
        self.trips.last().map(|t| t.unload_complete)
    }

    /// Whether `span`, widened by `buffer` on each side, is clear of every
    /// committed trip.
    pub fn is_free(&self, span: &TimeWindow, buffer: i64) -> bool {
        let padded = span.padded(buffer);
        !self.trips.iter().any(|t| t.span().overlaps(&padded))
    }

    /// Append a trip. Trips must be committed in chronological order.
    pub fn commit(&mut self, trip: Trip) -> Result<(), ScheduleError> {
        if let Some(previous_end) = self.last_unload() {
            if trip.departure < previous_end {
                return Err(ScheduleError::OutOfOrder {
                    courier: self.id.clone(),
                    previous_end,
                    next_start: trip.departure,
                });
            }
        }
        self.trips.push(trip);
        Ok(())
    }

    /// Committed trips in chronological order.
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }
}

// ── Roster ─────────────────────────────────────────────────────────

/// Every courier's schedule, in roster order.
#[derive(Clone, Debug)]
pub struct Roster {
    couriers: Vec<CourierSchedule>,
}

impl Roster {
    /// One idle schedule per spec.
    pub fn new(specs: &[CourierSpec]) -> Self {
        Self {
            couriers: specs.iter().map(CourierSchedule::new).collect(),
        }
    }

    /// Positions of couriers eligible to start work during `hour`.
    ///
    /// With shifts disabled every courier is eligible.
    pub fn eligible(&self, hour: u32, shifts_enabled: bool) -> impl Iterator<Item = usize> + '_ {
        self.couriers
            .iter()
            .enumerate()
            .filter(move |(_, c)| !shifts_enabled || c.shift.covers(hour))
            .map(|(i, _)| i)
    }

    /// Position of a courier by id.
    pub fn index_of(&self, id: &CourierId) -> Option<usize> {
        self.couriers.iter().position(|c| &c.id == id)
    }

    /// Schedule of courier `idx`.
    pub fn get(&self, idx: usize) -> &CourierSchedule {
        &self.couriers[idx]
    }

    /// Mutable schedule of courier `idx`.
    pub fn get_mut(&mut self, idx: usize) -> &mut CourierSchedule {
        &mut self.couriers[idx]
    }

    /// All schedules in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &CourierSchedule> + '_ {
        self.couriers.iter()
    }

    /// Number of couriers.
    pub fn len(&self) -> usize {
        self.couriers.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.couriers.is_empty()
    }
}
