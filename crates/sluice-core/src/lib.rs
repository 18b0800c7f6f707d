//! Core types for the Sluice collection-network simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers, the minute clock, time windows, and the error types
//! shared by the travel model, the engine, and the dataset layer.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod time;
pub mod window;

pub use error::{ScheduleError, StepError};
pub use id::{CourierId, LocationId, NodeId};
pub use time::{Minute, TimestampError, MINUTES_PER_DAY};
pub use window::TimeWindow;
