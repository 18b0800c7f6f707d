//! Travel-time model for Sluice simulations.
//!
//! Couriers move between a single depot and the production nodes over an
//! undirected weighted graph. This crate turns the edge list into a
//! symmetric point-to-point lookup:
//!
//! - [`Edge`]: one undirected connection with a travel time in minutes
//! - [`TravelModel`]: the lookup, with a fixed fallback for unlisted pairs

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod error;
pub mod travel;

pub use edge::Edge;
pub use error::NetworkError;
pub use travel::{TravelModel, DEFAULT_FALLBACK_MINUTES};
