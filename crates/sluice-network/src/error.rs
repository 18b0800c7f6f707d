//! Error types for travel-model construction.

use sluice_core::LocationId;
use std::fmt;

/// Errors arising while building a [`TravelModel`](crate::TravelModel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// An edge connects a location to itself.
    SelfLoop {
        /// The location on both ends.
        location: LocationId,
    },
    /// The same unordered pair was listed twice with different times.
    ConflictingEdge {
        /// One endpoint.
        from: LocationId,
        /// The other endpoint.
        to: LocationId,
        /// Time already recorded.
        existing: u32,
        /// Time in the conflicting entry.
        conflicting: u32,
    },
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfLoop { location } => {
                write!(f, "edge connects '{location}' to itself")
            }
            Self::ConflictingEdge {
                from,
                to,
                existing,
                conflicting,
            } => write!(
                f,
                "edge '{from}'-'{to}' listed with {existing} and {conflicting} minutes"
            ),
        }
    }
}

impl std::error::Error for NetworkError {}
