//! Sluice: a synthetic liquid-collection dataset generator.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Sluice sub-crates. For most users, adding `sluice` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use sluice::prelude::*;
//!
//! // One node, one courier, one day.
//! let start = Minute::parse("2024-10-30T00:00:00Z").unwrap();
//! let mut travel = TravelModel::new();
//! travel
//!     .insert(Edge::new("market_001", "cauldron_001", 20))
//!     .unwrap();
//! let nodes = vec![NodeSpec::new("cauldron_001", 1000.0, 0.1)
//!     .with_threshold(0.3)
//!     .with_initial_level(250.0)];
//! let couriers = vec![CourierSpec::new("courier_001", Shift::Any)];
//! let config = EngineConfig::new(
//!     start,
//!     start + (MINUTES_PER_DAY - 1),
//!     "market_001",
//!     nodes,
//!     couriers,
//!     travel,
//! );
//!
//! let run = Simulation::new(config.clone()).unwrap().run().unwrap();
//! assert_eq!(run.history.len(), 1440);
//!
//! let dataset = Dataset::from_run(&config, &run);
//! assert_eq!(dataset.history.data.len(), 1440);
//! assert_eq!(dataset.tickets.transport_tickets.len(), run.tickets.len());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `sluice-core` | IDs, `Minute`, `TimeWindow`, scheduling errors |
//! | [`network`] | `sluice-network` | Edges and the travel-time model |
//! | [`engine`] | `sluice-engine` | Config, dispatch, drain ledger, `Simulation` |
//! | [`dataset`] | `sluice-dataset` | JSON files, continuation, schedules, verification |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types: node, courier and location IDs, minute timestamps, windows.
pub use sluice_core as types;

/// Travel-time model between the depot and nodes.
pub use sluice_network as network;

/// The minute-by-minute simulation: fill, dispatch, drains, tickets.
///
/// Build an [`engine::EngineConfig`] and run it with
/// [`engine::Simulation`], or resume from an [`engine::PriorState`].
pub use sluice_engine as engine;

/// Dataset files: write a run to disk, continue it, and check that it
/// regenerates with [`dataset::compare_histories`].
pub use sluice_dataset as dataset;

/// Common imports for typical Sluice usage.
///
/// ```rust
/// use sluice::prelude::*;
/// ```
///
/// This imports the most frequently used types: IDs and time, the travel
/// model, engine configuration and the simulation, and the dataset files.
pub mod prelude {
    // Core types
    pub use sluice_core::{CourierId, LocationId, Minute, NodeId, TimeWindow, MINUTES_PER_DAY};

    // Errors
    pub use sluice_core::{ScheduleError, StepError};

    // Network
    pub use sluice_network::{Edge, TravelModel};

    // Engine
    pub use sluice_engine::{
        ConfigError, CourierSpec, EngineConfig, FillNoise, NodeSpec, PriorState, RunMetrics,
        RunOutput, Shift, Simulation, Ticket, UnreportedDrain,
    };

    // Dataset
    pub use sluice_dataset::{
        continue_dataset, generate, Dataset, DatasetError, DatasetPaths, NetworkFile,
        SimulationSettings,
    };
}
