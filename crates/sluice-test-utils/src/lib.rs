//! Test fixtures for Sluice development.
//!
//! Canned [`EngineConfig`](sluice_engine::EngineConfig)s for the engine's
//! scenario, invariant and determinism tests, and for the benchmark
//! profiles.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::*;
