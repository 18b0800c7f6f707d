//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] is the immutable input to
//! [`Simulation::new`](crate::Simulation::new). Every tunable the fill
//! model, dispatcher, ticket emitter and anomaly injector consult lives in
//! one of the nested structs below; each has a `Default` carrying the
//! production values. [`validate()`](EngineConfig::validate) checks all
//! structural invariants up front so the tick loop never has to.

use std::error::Error;
use std::fmt;

use indexmap::IndexSet;
use sluice_core::{CourierId, LocationId, Minute, NodeId, ScheduleError};
use sluice_network::TravelModel;

/// Default per-minute net drain rate while a courier extracts.
pub const DEFAULT_DRAIN_RATE: f64 = 0.35;

/// Default collection threshold as a fraction of capacity.
pub const DEFAULT_COLLECTION_THRESHOLD: f64 = 0.5;

// ── Shift ──────────────────────────────────────────────────────────

/// Working hours of a courier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shift {
    /// 00:00–08:00 UTC.
    Night,
    /// 08:00–16:00 UTC.
    Day,
    /// 16:00–24:00 UTC.
    Evening,
    /// Eligible at any hour.
    Any,
}

impl Shift {
    /// The shift that covers `hour` (0–23).
    pub fn for_hour(hour: u32) -> Shift {
        match hour {
            0..=7 => Shift::Night,
            8..=15 => Shift::Day,
            _ => Shift::Evening,
        }
    }

    /// Whether a courier on this shift works during `hour`.
    pub fn covers(self, hour: u32) -> bool {
        self == Shift::Any || self == Shift::for_hour(hour)
    }

    /// Decode the numeric shift used in network files (1, 2, 3).
    pub fn from_number(n: u8) -> Option<Shift> {
        match n {
            1 => Some(Shift::Night),
            2 => Some(Shift::Day),
            3 => Some(Shift::Evening),
            _ => None,
        }
    }

    /// The numeric form, `None` for [`Shift::Any`].
    pub fn number(self) -> Option<u8> {
        match self {
            Shift::Night => Some(1),
            Shift::Day => Some(2),
            Shift::Evening => Some(3),
            Shift::Any => None,
        }
    }
}

// ── NodeSpec / CourierSpec ─────────────────────────────────────────

/// Static description of one production node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSpec {
    /// Node identifier (also its location on the travel graph).
    pub id: NodeId,
    /// Capacity in liters.
    pub max_volume: f64,
    /// Liters gained per minute before noise.
    pub fill_rate: f64,
    /// Fraction of capacity at which collection becomes desirable.
    pub collection_threshold: f64,
    /// Net liters removed per minute while a courier extracts.
    pub drain_rate: f64,
    /// Level at the first simulated minute of a fresh run.
    pub initial_level: f64,
}

impl NodeSpec {
    /// A node starting empty, with default threshold and drain rate.
    pub fn new(id: impl Into<NodeId>, max_volume: f64, fill_rate: f64) -> Self {
        Self {
            id: id.into(),
            max_volume,
            fill_rate,
            collection_threshold: DEFAULT_COLLECTION_THRESHOLD,
            drain_rate: DEFAULT_DRAIN_RATE,
            initial_level: 0.0,
        }
    }

    /// Set the starting level.
    pub fn with_initial_level(mut self, level: f64) -> Self {
        self.initial_level = level;
        self
    }

    /// Set the collection threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.collection_threshold = threshold;
        self
    }

    /// Set the extraction drain rate.
    pub fn with_drain_rate(mut self, rate: f64) -> Self {
        self.drain_rate = rate;
        self
    }

    /// Largest net amount whose gross still fits a courier of `capacity`.
    ///
    /// While extracting `net` at `drain_rate`, the node keeps filling, so
    /// the courier carries `net × (1 + fill_rate / drain_rate)`.
    pub fn max_net_for_capacity(&self, capacity: f64) -> f64 {
        capacity / (1.0 + self.fill_rate / self.drain_rate)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidNode {
            id: self.id.clone(),
            reason,
        };
        if !self.max_volume.is_finite() || self.max_volume <= 0.0 {
            return Err(invalid(format!(
                "max_volume must be finite and positive, got {}",
                self.max_volume
            )));
        }
        if !self.fill_rate.is_finite() || self.fill_rate < 0.0 {
            return Err(invalid(format!(
                "fill_rate must be finite and non-negative, got {}",
                self.fill_rate
            )));
        }
        if !self.drain_rate.is_finite() || self.drain_rate <= 0.0 {
            return Err(invalid(format!(
                "drain_rate must be finite and positive, got {}",
                self.drain_rate
            )));
        }
        if !self.collection_threshold.is_finite()
            || self.collection_threshold <= 0.0
            || self.collection_threshold > 1.0
        {
            return Err(invalid(format!(
                "collection_threshold must be in (0.0, 1.0], got {}",
                self.collection_threshold
            )));
        }
        if !self.initial_level.is_finite()
            || self.initial_level < 0.0
            || self.initial_level > self.max_volume
        {
            return Err(invalid(format!(
                "initial_level must be in [0, {}], got {}",
                self.max_volume, self.initial_level
            )));
        }
        Ok(())
    }
}

/// Static description of one courier.
#[derive(Clone, Debug, PartialEq)]
pub struct CourierSpec {
    /// Courier identifier.
    pub id: CourierId,
    /// Working hours.
    pub shift: Shift,
}

impl CourierSpec {
    /// A courier on the given shift.
    pub fn new(id: impl Into<CourierId>, shift: Shift) -> Self {
        Self {
            id: id.into(),
            shift,
        }
    }
}

// ── FillNoise ──────────────────────────────────────────────────────

/// Multiplicative and additive noise applied to every fill step.
#[derive(Clone, Debug, PartialEq)]
pub struct FillNoise {
    /// Range of the base multiplier. Default: 0.98–1.02.
    pub base_range: (f64, f64),
    /// Probability of a spike on a given node-minute. Default: 0.01.
    pub spike_chance: f64,
    /// Range of the spike multiplier. Default: 0.97–1.03.
    pub spike_range: (f64, f64),
    /// Jitter as a fraction of the current level, applied ±. Default: 0.0005.
    pub jitter_factor: f64,
}

impl Default for FillNoise {
    fn default() -> Self {
        Self {
            base_range: (0.98, 1.02),
            spike_chance: 0.01,
            spike_range: (0.97, 1.03),
            jitter_factor: 0.0005,
        }
    }
}

impl FillNoise {
    /// No noise at all: every node fills at exactly its rate.
    pub fn none() -> Self {
        Self {
            base_range: (1.0, 1.0),
            spike_chance: 0.0,
            spike_range: (1.0, 1.0),
            jitter_factor: 0.0,
        }
    }
}

// ── PriorityBands ──────────────────────────────────────────────────

/// One urgency band: at or above `fraction`, a node scores `score`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    /// Lower bound of the band (inclusive).
    pub fraction: f64,
    /// Urgency score awarded.
    pub score: u32,
}

impl Band {
    /// Shorthand constructor.
    pub const fn new(fraction: f64, score: u32) -> Self {
        Self { fraction, score }
    }
}

/// Urgency scoring table, checked in order: capacity bands, then
/// threshold bands, then (for never-collected nodes) untouched bands.
#[derive(Clone, Debug, PartialEq)]
pub struct PriorityBands {
    /// Fractions of `max_volume`, highest first.
    pub capacity: Vec<Band>,
    /// Multiples of `collection_threshold × max_volume`, highest first.
    pub threshold: Vec<Band>,
    /// Fractions of `max_volume` for nodes with zero extractions.
    pub untouched: Vec<Band>,
}

impl Default for PriorityBands {
    fn default() -> Self {
        Self {
            capacity: vec![
                Band::new(0.99, 100),
                Band::new(0.90, 98),
                Band::new(0.80, 95),
                Band::new(0.70, 90),
            ],
            threshold: vec![
                Band::new(1.0, 85),
                Band::new(0.85, 80),
                Band::new(0.70, 75),
                Band::new(0.55, 70),
            ],
            untouched: vec![Band::new(0.45, 70), Band::new(0.35, 65), Band::new(0.30, 60)],
        }
    }
}

impl PriorityBands {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, bands) in [
            ("capacity", &self.capacity),
            ("threshold", &self.threshold),
            ("untouched", &self.untouched),
        ] {
            for band in bands {
                if !band.fraction.is_finite() || band.fraction < 0.0 {
                    return Err(ConfigError::InvalidBands {
                        reason: format!(
                            "{name} band fraction must be finite and non-negative, got {}",
                            band.fraction
                        ),
                    });
                }
                if band.score == 0 {
                    return Err(ConfigError::InvalidBands {
                        reason: format!("{name} band at {} has score 0", band.fraction),
                    });
                }
            }
            if bands.windows(2).any(|w| w[0].fraction < w[1].fraction) {
                return Err(ConfigError::InvalidBands {
                    reason: format!("{name} bands must be ordered highest fraction first"),
                });
            }
        }
        Ok(())
    }
}

// ── BalanceConfig ──────────────────────────────────────────────────

/// Fairness adjustments applied after candidates are ranked.
#[derive(Clone, Debug, PartialEq)]
pub struct BalanceConfig {
    /// A candidate within this many points of the top may displace it. Default: 5.
    pub score_window: u32,
    /// ...if it has strictly more than this many fewer extractions. Default: 2.
    pub count_gap: u32,
    /// Minimum score for a never-collected node to jump the queue. Default: 60.
    pub zero_boost_floor: u32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            score_window: 5,
            count_gap: 2,
            zero_boost_floor: 60,
        }
    }
}

// ── DispatchConfig ─────────────────────────────────────────────────

/// Courier capacity, trip timing, and net-target sampling.
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchConfig {
    /// Liters one courier can carry. Default: 100.
    pub courier_capacity: f64,
    /// Minutes to unload at the depot. Default: 15.
    pub unload_minutes: i64,
    /// Minimum idle minutes around every courier trip. Default: 30.
    pub trip_buffer_minutes: i64,
    /// Minimum minutes between two collections on the same node. Default: 30.
    pub node_gap_minutes: i64,
    /// A courier whose earliest departure lies further ahead than this is
    /// not considered on the current tick. `None` waits indefinitely. Default: 60.
    pub max_departure_delay_minutes: Option<i64>,
    /// Fraction of the projected level to target. Default: 0.50–0.60.
    pub collect_fraction: (f64, f64),
    /// Smallest net amount worth a trip. Default: 15.
    pub min_net: f64,
    /// Bounds on extraction duration in minutes. Default: 15–180.
    pub duration_bounds: (i64, i64),
    /// Minutes used to estimate refill during an extraction. Default: 60–90.
    pub estimated_minutes: (i64, i64),
    /// Extra liters added when the target is topped up. Default: 15–40.
    pub top_up: (f64, f64),
    /// Whether courier shifts restrict eligibility. Default: true.
    pub shifts_enabled: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            courier_capacity: 100.0,
            unload_minutes: 15,
            trip_buffer_minutes: 30,
            node_gap_minutes: 30,
            max_departure_delay_minutes: Some(60),
            collect_fraction: (0.50, 0.60),
            min_net: 15.0,
            duration_bounds: (15, 180),
            estimated_minutes: (60, 90),
            top_up: (15.0, 40.0),
            shifts_enabled: true,
        }
    }
}

// ── TicketConfig ───────────────────────────────────────────────────

/// Ticket numbering and under-reporting.
#[derive(Clone, Debug, PartialEq)]
pub struct TicketConfig {
    /// Probability a ticket under-reports its amount. Default: 0.12.
    pub suspicious_probability: f64,
    /// Reported fraction of the true amount on suspicious tickets. Default: 0.75–0.92.
    pub underreport_range: (f64, f64),
    /// Ticket id prefix. Default: `"TT"`.
    pub id_prefix: String,
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self {
            suspicious_probability: 0.12,
            underreport_range: (0.75, 0.92),
            id_prefix: "TT".to_string(),
        }
    }
}

// ── AnomalyConfig ──────────────────────────────────────────────────

/// Post-run injection of unreported drains.
#[derive(Clone, Debug, PartialEq)]
pub struct AnomalyConfig {
    /// Run the injector at all. Default: true.
    pub enabled: bool,
    /// Inclusive range the target count is drawn from. Default: 10–12.
    pub target_count: (u32, u32),
    /// Candidate draws before giving up. Default: 2000.
    pub max_attempts: u32,
    /// Minutes kept clear at both ends of the history. Default: 200.
    pub edge_margin_minutes: i64,
    /// A node must hold more than this many liters to be drained. Default: 200.
    pub min_level: f64,
    /// Minimum spacing from tickets and other anomalies on the same node. Default: 30.
    pub min_gap_minutes: i64,
    /// Range of the lower bound on the drained amount. Default: 15–50.
    pub net_drop: (f64, f64),
    /// Cap on the drained amount as a fraction of the level. Default: 0.5.
    pub max_level_fraction: f64,
    /// Liters that must remain in the node. Default: 15.
    pub level_reserve: f64,
    /// Reject drains smaller than this in total. Default: 25.
    pub min_total_drop: f64,
    /// Reject drains whose visible level drop is smaller than this. Default: 10.
    pub min_visible_drop: f64,
    /// XORed into the run seed to derive the injector's RNG stream.
    pub seed_salt: u64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_count: (10, 12),
            max_attempts: 2000,
            edge_margin_minutes: 200,
            min_level: 200.0,
            min_gap_minutes: 30,
            net_drop: (15.0, 50.0),
            max_level_fraction: 0.5,
            level_reserve: 15.0,
            min_total_drop: 25.0,
            min_visible_drop: 10.0,
            seed_salt: 0x5a1c_e0dd_a7a5_eed5,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`EngineConfig::validate()`] or while
/// reconstructing state for a resumed run.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// No nodes configured.
    NoNodes,
    /// No couriers configured.
    NoCouriers,
    /// Two nodes share an identifier.
    DuplicateNode {
        /// The repeated identifier.
        id: NodeId,
    },
    /// Two couriers share an identifier.
    DuplicateCourier {
        /// The repeated identifier.
        id: CourierId,
    },
    /// The depot shares an identifier with a node.
    DepotIsNode {
        /// The clashing identifier.
        depot: LocationId,
    },
    /// A node's numeric parameters are out of range.
    InvalidNode {
        /// The offending node.
        id: NodeId,
        /// Description of the violated constraint.
        reason: String,
    },
    /// The simulated period ends before it starts.
    InvalidHorizon {
        /// First simulated minute.
        start: Minute,
        /// Last simulated minute.
        end: Minute,
    },
    /// A `(lo, hi)` range is empty, inverted, or non-finite.
    InvalidRange {
        /// Which setting.
        what: &'static str,
        /// Lower bound.
        lo: f64,
        /// Upper bound.
        hi: f64,
    },
    /// A probability is outside `[0, 1]`.
    InvalidProbability {
        /// Which setting.
        what: &'static str,
        /// The offending value.
        value: f64,
    },
    /// A scalar setting is out of range.
    InvalidSetting {
        /// Which setting.
        what: &'static str,
        /// Description of the violated constraint.
        reason: String,
    },
    /// The priority table is malformed.
    InvalidBands {
        /// Description of the violated constraint.
        reason: String,
    },
    /// Prior state handed to a resumed run is inconsistent.
    PriorState {
        /// Description of the inconsistency.
        reason: String,
    },
    /// Rebuilding a courier schedule from prior tickets failed.
    Schedule(ScheduleError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNodes => write!(f, "no nodes configured"),
            Self::NoCouriers => write!(f, "no couriers configured"),
            Self::DuplicateNode { id } => write!(f, "duplicate node id '{id}'"),
            Self::DuplicateCourier { id } => write!(f, "duplicate courier id '{id}'"),
            Self::DepotIsNode { depot } => {
                write!(f, "depot '{depot}' is also configured as a node")
            }
            Self::InvalidNode { id, reason } => write!(f, "node '{id}': {reason}"),
            Self::InvalidHorizon { start, end } => {
                write!(f, "simulation ends at {end}, before it starts at {start}")
            }
            Self::InvalidRange { what, lo, hi } => {
                write!(f, "{what} range ({lo}, {hi}) must be finite with lo <= hi")
            }
            Self::InvalidProbability { what, value } => {
                write!(f, "{what} must be in [0.0, 1.0], got {value}")
            }
            Self::InvalidSetting { what, reason } => write!(f, "{what}: {reason}"),
            Self::InvalidBands { reason } => write!(f, "invalid priority bands: {reason}"),
            Self::PriorState { reason } => write!(f, "inconsistent prior state: {reason}"),
            Self::Schedule(e) => write!(f, "schedule: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schedule(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ScheduleError> for ConfigError {
    fn from(e: ScheduleError) -> Self {
        Self::Schedule(e)
    }
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Complete configuration for one simulation run.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// First simulated minute.
    pub start: Minute,
    /// Last simulated minute (inclusive).
    pub end: Minute,
    /// RNG seed for the fill, dispatch and ticket streams.
    pub seed: u64,
    /// Where couriers depart from and unload.
    pub depot: LocationId,
    /// Nodes in configuration order. Ties in dispatch break on this order.
    pub nodes: Vec<NodeSpec>,
    /// Couriers in roster order. The first feasible courier wins.
    pub couriers: Vec<CourierSpec>,
    /// Travel times between the depot and nodes.
    pub travel: TravelModel,
    /// Fill noise.
    pub fill: FillNoise,
    /// Urgency scoring.
    pub priority: PriorityBands,
    /// Fairness adjustments.
    pub balance: BalanceConfig,
    /// Trip timing and net targets.
    pub dispatch: DispatchConfig,
    /// Ticket emission.
    pub tickets: TicketConfig,
    /// Unreported-drain injection.
    pub anomalies: AnomalyConfig,
}

impl EngineConfig {
    /// A configuration with every tunable at its default.
    pub fn new(
        start: Minute,
        end: Minute,
        depot: impl Into<LocationId>,
        nodes: Vec<NodeSpec>,
        couriers: Vec<CourierSpec>,
        travel: TravelModel,
    ) -> Self {
        Self {
            start,
            end,
            seed: 42,
            depot: depot.into(),
            nodes,
            couriers,
            travel,
            fill: FillNoise::default(),
            priority: PriorityBands::default(),
            balance: BalanceConfig::default(),
            dispatch: DispatchConfig::default(),
            tickets: TicketConfig::default(),
            anomalies: AnomalyConfig::default(),
        }
    }

    /// Number of minutes the run will simulate.
    pub fn total_minutes(&self) -> i64 {
        self.end.minutes_since(self.start) + 1
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Horizon.
        if self.end < self.start {
            return Err(ConfigError::InvalidHorizon {
                start: self.start,
                end: self.end,
            });
        }
        // 2. Nodes: present, unique, numerically sane, not the depot.
        if self.nodes.is_empty() {
            return Err(ConfigError::NoNodes);
        }
        let mut seen = IndexSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(&node.id) {
                return Err(ConfigError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
            if node.id.location() == self.depot {
                return Err(ConfigError::DepotIsNode {
                    depot: self.depot.clone(),
                });
            }
            node.validate()?;
        }
        // 3. Couriers: present and unique.
        if self.couriers.is_empty() {
            return Err(ConfigError::NoCouriers);
        }
        let mut seen = IndexSet::with_capacity(self.couriers.len());
        for courier in &self.couriers {
            if !seen.insert(&courier.id) {
                return Err(ConfigError::DuplicateCourier {
                    id: courier.id.clone(),
                });
            }
        }
        // 4. Fill noise.
        let n = &self.fill;
        check_range("fill.base_range", n.base_range)?;
        check_range("fill.spike_range", n.spike_range)?;
        check_probability("fill.spike_chance", n.spike_chance)?;
        if !n.jitter_factor.is_finite() || n.jitter_factor < 0.0 {
            return Err(ConfigError::InvalidSetting {
                what: "fill.jitter_factor",
                reason: format!("must be finite and non-negative, got {}", n.jitter_factor),
            });
        }
        // 5. Priority bands.
        self.priority.validate()?;
        // 6. Dispatch.
        let d = &self.dispatch;
        if !d.courier_capacity.is_finite() || d.courier_capacity <= 0.0 {
            return Err(ConfigError::InvalidSetting {
                what: "dispatch.courier_capacity",
                reason: format!("must be finite and positive, got {}", d.courier_capacity),
            });
        }
        for (what, value) in [
            ("dispatch.unload_minutes", d.unload_minutes),
            ("dispatch.trip_buffer_minutes", d.trip_buffer_minutes),
            ("dispatch.node_gap_minutes", d.node_gap_minutes),
            (
                "dispatch.max_departure_delay_minutes",
                d.max_departure_delay_minutes.unwrap_or(0),
            ),
        ] {
            if value < 0 {
                return Err(ConfigError::InvalidSetting {
                    what,
                    reason: format!("must be non-negative, got {value}"),
                });
            }
        }
        check_range("dispatch.collect_fraction", d.collect_fraction)?;
        check_range("dispatch.top_up", d.top_up)?;
        check_range(
            "dispatch.estimated_minutes",
            (d.estimated_minutes.0 as f64, d.estimated_minutes.1 as f64),
        )?;
        if d.duration_bounds.0 < 1 || d.duration_bounds.0 > d.duration_bounds.1 {
            return Err(ConfigError::InvalidRange {
                what: "dispatch.duration_bounds",
                lo: d.duration_bounds.0 as f64,
                hi: d.duration_bounds.1 as f64,
            });
        }
        if !d.min_net.is_finite() || d.min_net < 0.0 {
            return Err(ConfigError::InvalidSetting {
                what: "dispatch.min_net",
                reason: format!("must be finite and non-negative, got {}", d.min_net),
            });
        }
        // 7. Tickets.
        check_probability(
            "tickets.suspicious_probability",
            self.tickets.suspicious_probability,
        )?;
        let (lo, hi) = self.tickets.underreport_range;
        check_range("tickets.underreport_range", (lo, hi))?;
        if lo < 0.0 || hi > 1.0 {
            return Err(ConfigError::InvalidRange {
                what: "tickets.underreport_range",
                lo,
                hi,
            });
        }
        // 8. Anomalies.
        let a = &self.anomalies;
        if a.target_count.0 > a.target_count.1 {
            return Err(ConfigError::InvalidRange {
                what: "anomalies.target_count",
                lo: f64::from(a.target_count.0),
                hi: f64::from(a.target_count.1),
            });
        }
        check_range("anomalies.net_drop", a.net_drop)?;
        check_probability("anomalies.max_level_fraction", a.max_level_fraction)?;
        if a.edge_margin_minutes < 0 || a.min_gap_minutes < 0 {
            return Err(ConfigError::InvalidSetting {
                what: "anomalies",
                reason: "edge_margin_minutes and min_gap_minutes must be non-negative"
                    .to_string(),
            });
        }
        Ok(())
    }
}

fn check_range(what: &'static str, (lo, hi): (f64, f64)) -> Result<(), ConfigError> {
    if !lo.is_finite() || !hi.is_finite() || lo > hi {
        return Err(ConfigError::InvalidRange { what, lo, hi });
    }
    Ok(())
}

fn check_probability(what: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidProbability { what, value });
    }
    Ok(())
}
