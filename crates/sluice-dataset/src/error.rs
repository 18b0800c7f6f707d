//! Error types for dataset I/O.

use std::fmt;
use std::io;
use std::path::PathBuf;

use sluice_core::{ScheduleError, StepError, TimestampError};
use sluice_engine::ConfigError;
use sluice_network::NetworkError;

/// Errors that can occur while reading, writing or merging dataset files.
#[derive(Debug)]
pub enum DatasetError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// A file could not be opened or created.
    File {
        /// The offending path.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// A document did not match its expected JSON shape.
    Json(serde_json::Error),
    /// A timestamp field was not in the wire format.
    Timestamp(TimestampError),
    /// The network file describes an invalid graph.
    Network(NetworkError),
    /// The assembled engine configuration was rejected.
    Config(ConfigError),
    /// A record carries an impossible time window.
    Schedule(ScheduleError),
    /// The engine failed mid-run.
    Step(StepError),
    /// No courier in a reassignment pool was free for a ticket's trip.
    Unassignable {
        /// Ticket that could not be placed.
        ticket_id: String,
        /// Size of the pool.
        couriers: usize,
    },
    /// The files disagree with each other.
    Inconsistent {
        /// Human-readable description of what went wrong.
        detail: String,
    },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::File { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json(e) => write!(f, "malformed dataset JSON: {e}"),
            Self::Timestamp(e) => write!(f, "{e}"),
            Self::Network(e) => write!(f, "invalid network: {e}"),
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::Schedule(e) => write!(f, "invalid record: {e}"),
            Self::Step(e) => write!(f, "simulation failed: {e}"),
            Self::Unassignable {
                ticket_id,
                couriers,
            } => write!(
                f,
                "ticket {ticket_id} clashes with a trip of every one of {couriers} couriers"
            ),
            Self::Inconsistent { detail } => write!(f, "inconsistent dataset: {detail}"),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::File { source, .. } => Some(source),
            Self::Json(e) => Some(e),
            Self::Timestamp(e) => Some(e),
            Self::Network(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Schedule(e) => Some(e),
            Self::Step(e) => Some(e),
            Self::Unassignable { .. } | Self::Inconsistent { .. } => None,
        }
    }
}

impl From<io::Error> for DatasetError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<TimestampError> for DatasetError {
    fn from(e: TimestampError) -> Self {
        Self::Timestamp(e)
    }
}

impl From<NetworkError> for DatasetError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

impl From<ConfigError> for DatasetError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ScheduleError> for DatasetError {
    fn from(e: ScheduleError) -> Self {
        Self::Schedule(e)
    }
}

impl From<StepError> for DatasetError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}
