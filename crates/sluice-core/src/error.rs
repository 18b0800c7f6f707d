//! Error types shared across the Sluice workspace.
//!
//! Only logic defects are errors here. A node left uncollected, a tick
//! with no feasible courier, or an anomaly budget running dry are normal
//! outcomes and never surface through these types.

use std::error::Error;
use std::fmt;

use crate::id::{CourierId, NodeId};
use crate::time::Minute;

/// Violations of time-window or courier-schedule consistency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    /// A window ends before it starts.
    MalformedWindow {
        /// Declared start.
        start: Minute,
        /// Declared end, earlier than `start`.
        end: Minute,
    },
    /// The stages of a trip (departure, arrival, collection, return,
    /// unload) are not in chronological order.
    StagesOutOfOrder {
        /// Courier the trip belongs to.
        courier: CourierId,
        /// Name of the first stage found earlier than its predecessor.
        stage: &'static str,
    },
    /// A commitment was inserted that starts before the previous one ends.
    OutOfOrder {
        /// Courier whose schedule would become inconsistent.
        courier: CourierId,
        /// Unload-complete time of the last existing commitment.
        previous_end: Minute,
        /// Departure of the rejected commitment.
        next_start: Minute,
    },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedWindow { start, end } => {
                write!(f, "malformed window: end {end} precedes start {start}")
            }
            Self::StagesOutOfOrder { courier, stage } => {
                write!(f, "trip for courier '{courier}' has stage '{stage}' out of order")
            }
            Self::OutOfOrder {
                courier,
                previous_end,
                next_start,
            } => write!(
                f,
                "courier '{courier}' schedule out of order: next trip departs {next_start} \
                 before previous trip completes {previous_end}"
            ),
        }
    }
}

impl Error for ScheduleError {}

/// Errors from the tick engine during `step()`.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// A drain window or courier schedule was inconsistent.
    Schedule(ScheduleError),
    /// A quantity that must be finite and non-negative was not.
    InvalidQuantity {
        /// Which quantity (e.g. `"fill_rate"`, `"net_amount"`).
        what: &'static str,
        /// The offending value.
        value: f64,
    },
    /// A second drain was registered on a node that already has one.
    NodeAlreadyDraining {
        /// The node.
        node: NodeId,
    },
    /// `step()` was called after the configured horizon was reached.
    HorizonReached {
        /// Last simulated minute of the run.
        end: Minute,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schedule(e) => write!(f, "schedule: {e}"),
            Self::InvalidQuantity { what, value } => {
                write!(f, "{what} must be finite and non-negative, got {value}")
            }
            Self::NodeAlreadyDraining { node } => {
                write!(f, "node '{node}' already has a drain registered")
            }
            Self::HorizonReached { end } => {
                write!(f, "simulation horizon {end} already reached")
            }
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schedule(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ScheduleError> for StepError {
    fn from(e: ScheduleError) -> Self {
        Self::Schedule(e)
    }
}
