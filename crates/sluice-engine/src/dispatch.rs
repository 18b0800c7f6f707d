//! Urgency scoring, candidate balancing, and courier search.
//!
//! Each tick the dispatcher ranks every node without a registered drain,
//! picks at most one, sizes the extraction, and walks the eligible
//! couriers in roster order until one can make the trip. Everything the
//! dispatcher decides is returned as a [`Decision`]; applying it to the
//! ledger, roster and ticket stream is the tick loop's job.

use rand::Rng;
use smallvec::SmallVec;
use sluice_core::{LocationId, Minute, StepError, TimeWindow};
use sluice_network::TravelModel;

use crate::config::{BalanceConfig, DispatchConfig, EngineConfig, NodeSpec, PriorityBands};
use crate::courier::{Roster, Trip};
use crate::ledger::{DrainLedger, DrainPlan};
use crate::node::{sample, NodeTable};

/// Inline capacity for the per-tick candidate list.
const INLINE_CANDIDATES: usize = 16;

/// Ranked candidates for one tick.
pub type Candidates = SmallVec<[Candidate; INLINE_CANDIDATES]>;

/// A node that wants collecting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Position in the node table.
    pub node: usize,
    /// Urgency score, never 0.
    pub score: u32,
    /// Ticketed extractions so far.
    pub extractions: u32,
}

/// A fully planned extraction awaiting commitment.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    /// Position of the courier in the roster.
    pub courier: usize,
    /// Position of the node in the node table.
    pub node: usize,
    /// The courier's round trip.
    pub trip: Trip,
    /// Net and gross amounts.
    pub plan: DrainPlan,
    /// Urgency score that won the node its slot.
    pub score: u32,
}

/// Why a selected node was not dispatched this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingReason {
    /// No eligible courier could make the trip in time.
    NoCourier,
    /// No ranked node could be sized: one minute of refill already
    /// exceeds the courier capacity.
    NotDispatchable,
}

/// Outcome of one dispatch pass.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    /// No node needs collecting.
    Idle,
    /// A node was selected but nothing was committed.
    Pending {
        /// Position of the node in the node table.
        node: usize,
        /// Why.
        reason: PendingReason,
    },
    /// A courier was found.
    Assign(Box<Assignment>),
}

/// Urgency score of a node, `0` when it is not a candidate.
///
/// Capacity bands are checked first, then threshold bands, then (only for
/// nodes never collected) the untouched bands.
pub fn urgency(spec: &NodeSpec, level: f64, extractions: u32, bands: &PriorityBands) -> u32 {
    let fraction = level / spec.max_volume;
    if let Some(b) = bands.capacity.iter().find(|b| fraction >= b.fraction) {
        return b.score;
    }
    let threshold = spec.collection_threshold * spec.max_volume;
    if let Some(b) = bands.threshold.iter().find(|b| level >= threshold * b.fraction) {
        return b.score;
    }
    if extractions == 0 {
        if let Some(b) = bands.untouched.iter().find(|b| fraction >= b.fraction) {
            return b.score;
        }
    }
    0
}

/// The dispatch engine.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    depot: LocationId,
    bands: PriorityBands,
    balance: BalanceConfig,
    dispatch: DispatchConfig,
}

impl Dispatcher {
    /// Build from the relevant parts of a validated configuration.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            depot: config.depot.clone(),
            bands: config.priority.clone(),
            balance: config.balance.clone(),
            dispatch: config.dispatch.clone(),
        }
    }

    /// Candidates ordered by score (descending), extraction count
    /// (ascending), configuration order, then balanced.
    pub fn rank(&self, nodes: &NodeTable, ledger: &DrainLedger) -> Candidates {
        let mut candidates: Candidates = (0..nodes.len())
            .filter(|&i| !ledger.has_drain(i))
            .filter_map(|i| {
                let state = nodes.state(i);
                let score = urgency(nodes.spec(i), state.level, state.extractions, &self.bands);
                (score > 0).then_some(Candidate {
                    node: i,
                    score,
                    extractions: state.extractions,
                })
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.extractions.cmp(&b.extractions))
                .then(a.node.cmp(&b.node))
        });
        self.rebalance(&mut candidates);
        candidates
    }

    fn rebalance(&self, candidates: &mut Candidates) {
        if candidates.len() < 2 {
            return;
        }
        let top = candidates[0];
        let swap = candidates[1..].iter().position(|c| {
            c.score + self.balance.score_window >= top.score
                && c.extractions + self.balance.count_gap < top.extractions
        });
        if let Some(i) = swap {
            candidates.swap(0, i + 1);
        }

        if candidates[0].extractions == 0 {
            return;
        }
        // Best never-collected node; the first one wins a tie.
        let mut best: Option<usize> = None;
        for (i, c) in candidates.iter().enumerate() {
            if c.extractions == 0 && best.is_none_or(|b| c.score > candidates[b].score) {
                best = Some(i);
            }
        }
        if let Some(i) = best {
            if candidates[i].score >= self.balance.zero_boost_floor {
                let boosted = candidates.remove(i);
                candidates.insert(0, boosted);
            }
        }
    }

    /// Size an extraction for `spec` given its current level and the
    /// outbound travel time.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        spec: &NodeSpec,
        level: f64,
        travel_to: u32,
        rng: &mut R,
    ) -> Option<DrainPlan> {
        let d = &self.dispatch;
        let at_collection = (level + spec.fill_rate * f64::from(travel_to)).min(spec.max_volume);
        let mut net = (at_collection * sample(rng, d.collect_fraction)).min(d.courier_capacity);
        let (lo, hi) = d.estimated_minutes;
        let estimated = if hi > lo {
            rng.random_range(lo..=hi)
        } else {
            lo
        };
        let refill = spec.fill_rate * estimated as f64;
        if net <= refill {
            net = refill + sample(rng, d.top_up);
        }
        let net = net.min(at_collection).max(d.min_net);
        DrainPlan::fit(
            net,
            spec.fill_rate,
            spec.drain_rate,
            d.courier_capacity,
            d.duration_bounds,
        )
    }

    /// One dispatch pass at minute `now`.
    ///
    /// The highest-ranked node that can be sized gets the courier search;
    /// nodes ranked above it that cannot be sized are passed over.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        now: Minute,
        nodes: &NodeTable,
        ledger: &DrainLedger,
        roster: &Roster,
        travel: &TravelModel,
        rng: &mut R,
    ) -> Result<Decision, StepError> {
        let ranked = self.rank(nodes, ledger);
        let Some(first) = ranked.first().copied() else {
            return Ok(Decision::Idle);
        };
        for top in ranked {
            let spec = nodes.spec(top.node);
            let (to, back) = travel.round_trip(&self.depot, &spec.id.location());
            if let Some(plan) = self.plan(spec, nodes.state(top.node).level, to, rng) {
                return self.search(now, top, plan, (to, back), nodes, roster);
            }
        }
        Ok(Decision::Pending {
            node: first.node,
            reason: PendingReason::NotDispatchable,
        })
    }

    /// Walk the eligible couriers for a sized extraction on `top`.
    fn search(
        &self,
        now: Minute,
        top: Candidate,
        plan: DrainPlan,
        (to, back): (u32, u32),
        nodes: &NodeTable,
        roster: &Roster,
    ) -> Result<Decision, StepError> {
        let spec = nodes.spec(top.node);
        let state = nodes.state(top.node);
        let (travel_to, travel_back) = (i64::from(to), i64::from(back));

        let d = &self.dispatch;
        let node_ready = state
            .last_collection_end
            .map(|end| end + d.node_gap_minutes - travel_to);

        for c in roster.eligible(now.hour_of_day(), d.shifts_enabled) {
            let schedule = roster.get(c);
            let mut departure = now;
            if let Some(unload) = schedule.last_unload() {
                departure = departure.max(unload + d.trip_buffer_minutes);
            }
            if let Some(ready) = node_ready {
                departure = departure.max(ready);
            }
            if let Some(max_delay) = d.max_departure_delay_minutes {
                if departure.minutes_since(now) > max_delay {
                    continue;
                }
            }
            let collection = TimeWindow::with_duration(departure + travel_to, plan.duration)?;
            let return_arrival = collection.end() + travel_back;
            let trip = Trip::new(
                &schedule.id,
                spec.id.clone(),
                departure,
                collection,
                return_arrival,
                return_arrival + d.unload_minutes,
            )?;
            if schedule.is_free(&trip.span(), d.trip_buffer_minutes) {
                return Ok(Decision::Assign(Box::new(Assignment {
                    courier: c,
                    node: top.node,
                    trip,
                    plan,
                    score: top.score,
                })));
            }
        }
        Ok(Decision::Pending {
            node: top.node,
            reason: PendingReason::NoCourier,
        })
    }
}
