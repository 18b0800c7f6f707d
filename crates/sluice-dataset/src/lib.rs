//! JSON dataset files for Sluice runs.
//!
//! Turns engine output into the files an analyst audits, reads them back,
//! and continues an existing dataset by resuming the engine from its last
//! minute.
//!
//! # Architecture
//!
//! - [`NetworkFile`] and [`SimulationSettings`] describe a run
//! - [`generate`] and [`continue_dataset`] drive the engine
//! - [`Dataset`] holds the level series, tickets and unreported drains
//! - [`build_schedules`] expands tickets into full courier trips
//! - [`reassign`] moves tickets onto a smaller pool of couriers
//! - [`history_digest`] and [`compare_histories`] verify regeneration
//!
//! # Files
//!
//! ```text
//! network.json             depot, nodes, edges, couriers   (input)
//! historical_data.json     one level map per minute        (output)
//! transport_tickets.json   every ticketed extraction       (output)
//! unreported_drains.json   extractions with no ticket      (output)
//! courier_schedules.json   tickets expanded into trips     (output)
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compare;
pub mod dataset;
pub mod error;
pub mod generate;
pub mod hash;
pub mod io;
pub mod network;
pub mod reassign;
pub mod records;
pub mod schedule;
pub mod settings;

pub use compare::{compare_histories, Divergence, DivergenceKind, DivergenceReport};
pub use dataset::Dataset;
pub use error::DatasetError;
pub use generate::{continue_dataset, generate, Generated};
pub use hash::{history_digest, ticket_digest};
pub use io::{load, read_json, save, write_json, DatasetPaths};
pub use network::{CourierRecord, EdgeList, EdgeRecord, NetworkFile, NodeRecord};
pub use reassign::{pool_ids, reassign, ReassignOptions, Reassignment};
pub use records::{
    round2, DateRange, DrainFile, DrainRecord, HistoryFile, HistoryMetadata, NoiseRecord,
    SnapshotRecord, TicketFile, TicketRecord,
};
pub use schedule::{build_schedules, CourierScheduleRecord, ScheduleEntry, ScheduleFile};
pub use settings::SimulationSettings;
