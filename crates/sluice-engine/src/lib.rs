//! Minute-resolution fill, drain and dispatch engine for Sluice.
//!
//! A [`Simulation`] is built from an immutable [`EngineConfig`] and advanced
//! one minute at a time. Each tick fills the nodes, applies the drain
//! ledger, dispatches at most one courier and records the levels. When the
//! horizon is reached, [`Simulation::finish`] injects unreported drains
//! into the recorded history and returns a [`RunOutput`].
//!
//! The pieces are usable on their own: [`Dispatcher`] for ranking and
//! courier search, [`DrainLedger`] and [`DrainPlan`] for the net/gross
//! arithmetic, [`AnomalyInjector`] for post-hoc tampering of any
//! [`History`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod anomaly;
pub mod config;
pub mod courier;
pub mod dispatch;
pub mod history;
pub mod ledger;
pub mod metrics;
pub mod node;
pub mod sim;
pub mod ticket;

pub use anomaly::{AnomalyInjector, InjectionReport, UnreportedDrain};
pub use config::{
    AnomalyConfig, BalanceConfig, Band, ConfigError, CourierSpec, DispatchConfig, EngineConfig,
    FillNoise, NodeSpec, PriorityBands, Shift, TicketConfig,
};
pub use courier::{CourierSchedule, Roster, Trip};
pub use dispatch::{urgency, Assignment, Candidate, Decision, Dispatcher, PendingReason};
pub use history::{History, MinuteSnapshot};
pub use ledger::{ActiveDrain, DrainLedger, DrainPlan};
pub use metrics::{RunMetrics, TickOutcome};
pub use node::{NodeState, NodeTable};
pub use sim::{PriorState, RunOutput, Simulation};
pub use ticket::{Ticket, TicketEmitter};
