//! The minute-resolution tick loop.
//!
//! [`Simulation`] owns every piece of mutable run state. Each
//! [`step()`](Simulation::step) advances the clock by one minute in a fixed
//! order:
//!
//! 1. fill every node not under an active drain,
//! 2. apply active drains, then retire expired ones,
//! 3. run one dispatch pass and commit its decision,
//! 4. record the minute's levels.
//!
//! [`finish()`](Simulation::finish) runs the anomaly injector over the
//! recorded history and hands everything back as a [`RunOutput`].
//!
//! # Determinism
//!
//! The fill, dispatch and ticket draws share one `ChaCha8Rng` seeded from
//! [`EngineConfig::seed`]; the injector uses a second stream seeded from
//! `seed ^ anomalies.seed_salt`. Nodes and couriers are always visited in
//! configuration order, so identical inputs give identical outputs.

use std::time::Instant;

use indexmap::IndexMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sluice_core::{Minute, NodeId, StepError, MINUTES_PER_DAY};
use tracing::{debug, info, warn};

use crate::anomaly::{AnomalyInjector, UnreportedDrain};
use crate::config::{ConfigError, EngineConfig};
use crate::courier::{Roster, Trip};
use crate::dispatch::{Assignment, Decision, Dispatcher, PendingReason};
use crate::history::History;
use crate::ledger::DrainLedger;
use crate::metrics::{RunMetrics, TickOutcome};
use crate::node::NodeTable;
use crate::ticket::{Ticket, TicketEmitter};

// ── PriorState ─────────────────────────────────────────────────────

/// What an earlier run left behind, used to continue it.
#[derive(Clone, Debug, Default)]
pub struct PriorState {
    /// Minute of the last recorded snapshot.
    pub last_minute: Minute,
    /// Levels at that minute. Nodes missing here start at their
    /// configured initial level.
    pub levels: IndexMap<NodeId, f64>,
    /// Every ticket issued so far.
    pub tickets: Vec<Ticket>,
    /// Every unreported drain injected so far.
    pub anomalies: Vec<UnreportedDrain>,
}

// ── RunOutput ──────────────────────────────────────────────────────

/// Everything a finished run produced. Prior records are not repeated.
#[derive(Clone, Debug)]
pub struct RunOutput {
    /// One snapshot per simulated minute, anomalies applied.
    pub history: History,
    /// Tickets issued by this run.
    pub tickets: Vec<Ticket>,
    /// Unreported drains injected by this run.
    pub anomalies: Vec<UnreportedDrain>,
    /// Run counters.
    pub metrics: RunMetrics,
}

// ── Simulation ─────────────────────────────────────────────────────

/// A single-threaded, deterministic simulation run.
pub struct Simulation {
    config: EngineConfig,
    clock: Minute,
    nodes: NodeTable,
    ledger: DrainLedger,
    roster: Roster,
    dispatcher: Dispatcher,
    emitter: TicketEmitter,
    rng: ChaCha8Rng,
    history: History,
    tickets: Vec<Ticket>,
    prior_tickets: Vec<Ticket>,
    prior_anomalies: Vec<UnreportedDrain>,
    metrics: RunMetrics,
}

impl Simulation {
    /// Validate `config` and build a fresh run starting at `config.start`.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let nodes = NodeTable::new(&config.nodes);
        let history = History::new(nodes.ids().cloned().collect(), config.start);
        Ok(Self {
            clock: config.start,
            roster: Roster::new(&config.couriers),
            dispatcher: Dispatcher::new(&config),
            emitter: TicketEmitter::new(&config.tickets),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ledger: DrainLedger::new(),
            tickets: Vec::new(),
            prior_tickets: Vec::new(),
            prior_anomalies: Vec::new(),
            metrics: RunMetrics::default(),
            nodes,
            history,
            config,
        })
    }

    /// Continue an earlier run.
    ///
    /// `config.start` must be the minute right after `prior.last_minute`.
    /// Levels are restored, extraction counts and courier schedules are
    /// rebuilt from the prior tickets, ticket numbering continues, and any
    /// prior extraction still in progress is re-registered for its
    /// remaining minutes.
    pub fn resume(config: EngineConfig, prior: PriorState) -> Result<Self, ConfigError> {
        if config.start != prior.last_minute.next() {
            return Err(ConfigError::PriorState {
                reason: format!(
                    "run starts at {} but prior history ends at {}",
                    config.start, prior.last_minute
                ),
            });
        }
        let mut sim = Self::new(config)?;
        let start = sim.config.start;

        for (id, &level) in &prior.levels {
            match sim.nodes.index_of(id) {
                Some(i) => sim.nodes.set_level(i, level),
                None => warn!(node = %id, "prior level for unknown node ignored"),
            }
        }

        let mut tickets = prior.tickets.clone();
        tickets.sort_by_key(|t| t.collection.start());
        for t in &tickets {
            let Some(node) = sim.nodes.index_of(&t.node) else {
                warn!(ticket = %t.id, node = %t.node, "prior ticket for unknown node ignored");
                continue;
            };
            sim.nodes.record_extraction(node, t.collection.end());

            if let Some(c) = sim.roster.index_of(&t.courier) {
                let (to, back) = sim
                    .config
                    .travel
                    .round_trip(&sim.config.depot, &t.node.location());
                let return_arrival = t.collection.end() + i64::from(back);
                let trip = Trip::new(
                    &t.courier,
                    t.node.clone(),
                    t.collection.start() - i64::from(to),
                    t.collection,
                    return_arrival,
                    return_arrival + sim.config.dispatch.unload_minutes,
                )?;
                sim.roster.get_mut(c).commit(trip)?;
            }

            if t.collection.end() > start {
                let spec = sim.nodes.spec(node);
                let minutes = t.collection.duration();
                let net = (t.true_amount - spec.fill_rate * minutes as f64).max(0.0);
                let elapsed = start.minutes_since(t.collection.start()).clamp(0, minutes);
                let applied = if minutes > 0 {
                    net * elapsed as f64 / minutes as f64
                } else {
                    0.0
                };
                sim.ledger
                    .register_partial(node, t.node.clone(), t.collection, net, applied)
                    .map_err(|e| ConfigError::PriorState {
                        reason: e.to_string(),
                    })?;
            }
        }

        sim.emitter = TicketEmitter::continuing(&sim.config.tickets, prior.tickets.len() as u64);
        info!(
            start = %start,
            prior_tickets = prior.tickets.len(),
            in_flight = sim.ledger.len(),
            "resuming from prior state"
        );
        sim.prior_tickets = prior.tickets;
        sim.prior_anomalies = prior.anomalies;
        Ok(sim)
    }

    /// Simulate one minute.
    ///
    /// # Errors
    ///
    /// [`StepError::HorizonReached`] once the last minute has been
    /// simulated; any other variant signals an internal inconsistency.
    pub fn step(&mut self) -> Result<TickOutcome, StepError> {
        if self.is_finished() {
            return Err(StepError::HorizonReached {
                end: self.config.end,
            });
        }
        let tick_start = Instant::now();
        let now = self.clock;
        let mut outcome = TickOutcome {
            at: now,
            ..TickOutcome::default()
        };

        // 1. Fill.
        for i in 0..self.nodes.len() {
            if self.ledger.is_draining(i, now) {
                continue;
            }
            self.nodes.fill(i, &self.config.fill, &mut self.rng);
            if self.nodes.level(i) >= self.nodes.spec(i).max_volume {
                outcome.at_capacity += 1;
            }
        }

        // 2. Drain, then retire.
        let applied = self.ledger.apply(now, &mut self.nodes);
        outcome.drains_applied = applied.applied;
        outcome.clamped = applied.clamped;
        outcome.retired = self.ledger.retire(now).len() as u32;

        // 3. Dispatch.
        let decision = self.dispatcher.decide(
            now,
            &self.nodes,
            &self.ledger,
            &self.roster,
            &self.config.travel,
            &mut self.rng,
        )?;
        match decision {
            Decision::Idle => {}
            Decision::Pending { node, reason } => {
                match reason {
                    PendingReason::NoCourier => self.metrics.pending_no_courier += 1,
                    PendingReason::NotDispatchable => self.metrics.pending_not_dispatchable += 1,
                }
                outcome.pending = Some(self.nodes.spec(node).id.clone());
            }
            Decision::Assign(assignment) => {
                let ticket = self.commit(*assignment)?;
                outcome.ticket = Some(ticket);
            }
        }

        // 4. Record.
        self.history.push(self.nodes.levels());
        self.clock = now.next();
        if self.clock.0.rem_euclid(MINUTES_PER_DAY) == 0 {
            info!(
                day = %now.date_stamp(),
                tickets = self.metrics.dispatches + u64::from(outcome.ticket.is_some()),
                pending = self.metrics.pending_no_courier,
                "simulated day complete"
            );
        }
        self.metrics.record(&outcome);
        self.metrics.add_wall(tick_start.elapsed());
        Ok(outcome)
    }

    fn commit(&mut self, a: Assignment) -> Result<String, StepError> {
        let node_id = self.nodes.spec(a.node).id.clone();
        let collection = a.trip.collection;
        let departure = a.trip.departure;
        self.ledger
            .register(a.node, node_id.clone(), collection, a.plan.net)?;
        let courier = self.roster.get_mut(a.courier);
        let courier_id = courier.id.clone();
        courier.commit(a.trip)?;
        self.nodes.record_extraction(a.node, collection.end());
        let ticket = self.emitter.emit(
            node_id,
            courier_id,
            collection,
            a.plan.gross,
            &mut self.rng,
        );
        debug!(
            ticket = %ticket.id,
            node = %ticket.node,
            courier = %ticket.courier,
            score = a.score,
            departure = %departure,
            collection = %collection,
            net = a.plan.net,
            gross = a.plan.gross,
            suspicious = ticket.suspicious,
            "dispatched"
        );
        if ticket.suspicious {
            self.metrics.suspicious += 1;
        }
        let id = ticket.id.clone();
        self.tickets.push(ticket);
        Ok(id)
    }

    /// Step until the horizon, then [`finish()`](Self::finish).
    pub fn run(mut self) -> Result<RunOutput, StepError> {
        info!(
            start = %self.config.start,
            end = %self.config.end,
            nodes = self.nodes.len(),
            couriers = self.roster.len(),
            seed = self.config.seed,
            "simulation started"
        );
        while !self.is_finished() {
            self.step()?;
        }
        Ok(self.finish())
    }

    /// Inject unreported drains into the recorded history and return the
    /// run's output. May be called before the horizon is reached.
    pub fn finish(mut self) -> RunOutput {
        let started = Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed ^ self.config.anomalies.seed_salt);
        let mut spacing = self.prior_tickets.clone();
        spacing.extend(self.tickets.iter().cloned());
        let report = AnomalyInjector::new(&self.config).inject(
            &mut self.history,
            self.nodes.specs(),
            &spacing,
            &self.prior_anomalies,
            &mut rng,
        );
        self.metrics.anomalies = report.accepted.len() as u64;
        self.metrics.anomaly_attempts = u64::from(report.attempts);
        self.metrics.anomaly_budget_exhausted = report.exhausted();
        self.metrics.add_wall(started.elapsed());
        info!(
            minutes = self.metrics.ticks,
            tickets = self.metrics.dispatches,
            suspicious = self.metrics.suspicious,
            anomalies = self.metrics.anomalies,
            pending = self.metrics.pending_no_courier,
            "simulation finished"
        );
        RunOutput {
            history: self.history,
            tickets: self.tickets,
            anomalies: report.accepted,
            metrics: self.metrics,
        }
    }

    /// Whether every minute up to `config.end` has been simulated.
    pub fn is_finished(&self) -> bool {
        self.clock > self.config.end
    }

    /// The next minute to simulate.
    pub fn now(&self) -> Minute {
        self.clock
    }

    /// The configuration this run was built from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Node levels and extraction counts.
    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    /// Registered drains.
    pub fn ledger(&self) -> &DrainLedger {
        &self.ledger
    }

    /// Courier schedules, including trips rebuilt from prior tickets.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Snapshots recorded so far.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Tickets issued by this run so far.
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Counters so far.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("now", &self.clock)
            .field("end", &self.config.end)
            .field("seed", &self.config.seed)
            .field("nodes", &self.nodes.len())
            .field("active_drains", &self.ledger.len())
            .field("tickets", &self.tickets.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CourierSpec, NodeSpec, Shift};
    use sluice_network::{Edge, TravelModel};

    fn config() -> EngineConfig {
        let travel = TravelModel::from_edges([Edge::new("depot", "n1", 10)]).unwrap();
        let mut cfg = EngineConfig::new(
            Minute(0),
            Minute(119),
            "depot",
            vec![NodeSpec::new("n1", 1000.0, 1.0)],
            vec![CourierSpec::new("c1", Shift::Any)],
            travel,
        );
        cfg.anomalies.enabled = false;
        cfg
    }

    #[test]
    fn step_past_horizon_fails() {
        let mut sim = Simulation::new(config()).unwrap();
        while !sim.is_finished() {
            sim.step().unwrap();
        }
        assert_eq!(sim.history().len(), 120);
        match sim.step() {
            Err(StepError::HorizonReached { end }) => assert_eq!(end, Minute(119)),
            other => panic!("expected HorizonReached, got {other:?}"),
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = config();
        cfg.nodes[0].fill_rate = f64::INFINITY;
        assert!(matches!(
            Simulation::new(cfg),
            Err(ConfigError::InvalidNode { .. })
        ));
    }

    #[test]
    fn resume_requires_contiguous_start() {
        let prior = PriorState {
            last_minute: Minute(50),
            ..PriorState::default()
        };
        match Simulation::resume(config(), prior) {
            Err(ConfigError::PriorState { .. }) => {}
            other => panic!("expected PriorState, got {other:?}"),
        }
    }

    #[test]
    fn resume_restores_levels_and_numbering() {
        let mut cfg = config();
        cfg.start = Minute(100);
        cfg.end = Minute(200);
        let mut levels = IndexMap::new();
        levels.insert(NodeId::from("n1"), 321.0);
        let prior = PriorState {
            last_minute: Minute(99),
            levels,
            tickets: Vec::new(),
            anomalies: Vec::new(),
        };
        let sim = Simulation::resume(cfg, prior).unwrap();
        assert_eq!(sim.now(), Minute(100));
        assert_eq!(sim.nodes().level(0), 321.0);
        assert!(sim.ledger().is_empty());
    }

    #[test]
    fn first_step_fills_and_records() {
        let mut cfg = config();
        cfg.fill = crate::config::FillNoise::none();
        cfg.nodes[0].initial_level = 0.0;
        let mut sim = Simulation::new(cfg).unwrap();
        let outcome = sim.step().unwrap();
        assert_eq!(outcome.at, Minute(0));
        assert_eq!(sim.nodes().level(0), 1.0);
        assert_eq!(sim.history().level(Minute(0), 0), Some(1.0));
    }
}
