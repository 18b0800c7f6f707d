//! On-disk shapes of the dataset files.
//!
//! Every timestamp is a `YYYY-MM-DDTHH:MM:SSZ` string and every level or
//! amount is rounded to two decimals. Rounding happens here, in the
//! `from_*` constructors, and nowhere else.
//!
//! Older files used `cauldron_id` / `cauldron_levels` for what is now
//! `node_id` / `levels`; both spellings are accepted on read.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sluice_core::{CourierId, Minute, NodeId, TimeWindow};
use sluice_engine::{FillNoise, MinuteSnapshot, NodeSpec, Ticket, UnreportedDrain};

use crate::error::DatasetError;

/// Round to two decimals.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Ticket status written for every extraction.
pub const STATUS_COMPLETED: &str = "completed";

/// `suspicious_type` of an under-reported ticket.
pub const UNDERREPORTED: &str = "underreported";

/// Note attached to every unreported drain record.
pub const NO_TICKET_NOTE: &str = "NO TICKET EXISTS - this is an unreported drain";

// ── History ────────────────────────────────────────────────────────

/// `historical_data.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryFile {
    /// Summary of the series.
    pub metadata: HistoryMetadata,
    /// One entry per minute, strictly increasing.
    pub data: Vec<SnapshotRecord>,
}

/// Header of the history file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryMetadata {
    /// First timestamp in `data`.
    pub start_date: String,
    /// Last timestamp in `data`.
    pub end_date: String,
    /// Always 1.
    pub interval_minutes: u32,
    /// Number of entries in `data`.
    #[serde(default)]
    pub total_minutes: usize,
    /// Tickets issued over the whole series.
    #[serde(default)]
    pub total_collections: usize,
    /// Fill rate per node.
    pub fill_rates_l_per_min: IndexMap<NodeId, f64>,
    /// Net drain rate per node.
    pub drain_rates_l_per_min: IndexMap<NodeId, f64>,
    /// Fill noise the series was generated with.
    pub noise_parameters: NoiseRecord,
    /// Always `"liters"`.
    pub unit: String,
}

/// Fill noise parameters as written in the history header.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseRecord {
    /// Multiplier range drawn every minute.
    pub base_noise_range: (f64, f64),
    /// Per-minute spike probability.
    pub spike_chance: f64,
    /// Multiplier range of a spike.
    pub spike_range: (f64, f64),
    /// Additive jitter as a fraction of the fill rate.
    pub jitter_factor: f64,
}

impl From<&FillNoise> for NoiseRecord {
    fn from(n: &FillNoise) -> Self {
        Self {
            base_noise_range: n.base_range,
            spike_chance: n.spike_chance,
            spike_range: n.spike_range,
            jitter_factor: n.jitter_factor,
        }
    }
}

impl From<&NoiseRecord> for FillNoise {
    fn from(n: &NoiseRecord) -> Self {
        Self {
            base_range: n.base_noise_range,
            spike_chance: n.spike_chance,
            spike_range: n.spike_range,
            jitter_factor: n.jitter_factor,
        }
    }
}

/// One minute of levels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Minute of the snapshot.
    pub timestamp: String,
    /// Level per node, in network order.
    #[serde(alias = "cauldron_levels")]
    pub levels: IndexMap<NodeId, f64>,
}

impl SnapshotRecord {
    /// Render an engine snapshot.
    pub fn from_snapshot(node_ids: &[NodeId], s: &MinuteSnapshot) -> Self {
        Self {
            timestamp: s.at.format(),
            levels: node_ids
                .iter()
                .cloned()
                .zip(s.levels.iter().map(|&l| round2(l)))
                .collect(),
        }
    }

    /// Parsed timestamp.
    pub fn minute(&self) -> Result<Minute, DatasetError> {
        Ok(Minute::parse(&self.timestamp)?)
    }
}

impl HistoryMetadata {
    /// Header for a series over `nodes`, with placeholder dates until
    /// [`HistoryFile::refresh_metadata`] runs.
    pub fn for_nodes(nodes: &[NodeSpec], noise: &FillNoise) -> Self {
        Self {
            start_date: String::new(),
            end_date: String::new(),
            interval_minutes: 1,
            total_minutes: 0,
            total_collections: 0,
            fill_rates_l_per_min: nodes.iter().map(|n| (n.id.clone(), n.fill_rate)).collect(),
            drain_rates_l_per_min: nodes
                .iter()
                .map(|n| (n.id.clone(), n.drain_rate))
                .collect(),
            noise_parameters: noise.into(),
            unit: "liters".to_string(),
        }
    }
}

impl HistoryFile {
    /// Recompute dates and counts from `data`.
    pub fn refresh_metadata(&mut self, total_collections: usize) {
        if let (Some(first), Some(last)) = (self.data.first(), self.data.last()) {
            self.metadata.start_date = first.timestamp.clone();
            self.metadata.end_date = last.timestamp.clone();
        }
        self.metadata.total_minutes = self.data.len();
        self.metadata.total_collections = total_collections;
    }

    /// Parsed timestamp of the last entry, if any.
    pub fn last_minute(&self) -> Result<Option<Minute>, DatasetError> {
        self.data.last().map(SnapshotRecord::minute).transpose()
    }
}

// ── Tickets ────────────────────────────────────────────────────────

/// `transport_tickets.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TicketFile {
    /// Counts and date range.
    pub metadata: TicketMetadata,
    /// Tickets in issue order.
    pub transport_tickets: Vec<TicketRecord>,
}

/// Header of the ticket file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TicketMetadata {
    /// Number of tickets.
    pub total_tickets: usize,
    /// Number flagged as under-reported.
    pub suspicious_tickets: usize,
    /// Earliest and latest collection start.
    pub date_range: DateRange,
}

/// Inclusive range of start timestamps. Both ends are `null` when the
/// list is empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest start.
    pub start: Option<String>,
    /// Latest start.
    pub end: Option<String>,
}

impl DateRange {
    fn of<'a>(starts: impl Iterator<Item = &'a String>) -> Self {
        let mut range = DateRange::default();
        for s in starts {
            if range.start.as_ref().is_none_or(|cur| s < cur) {
                range.start = Some(s.clone());
            }
            if range.end.as_ref().is_none_or(|cur| s > cur) {
                range.end = Some(s.clone());
            }
        }
        range
    }
}

/// One ticket as written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Ticket id.
    pub ticket_id: String,
    /// Node drained.
    #[serde(alias = "cauldron_id")]
    pub node_id: NodeId,
    /// Collection start.
    pub collection_start_timestamp: String,
    /// Collection end.
    pub collection_timestamp: String,
    /// Reported gross amount.
    pub amount_collected: f64,
    /// Courier id.
    pub courier_id: CourierId,
    /// Always `"completed"`.
    pub status: String,
    /// Present and true on under-reported tickets.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_suspicious: bool,
    /// `"underreported"` on suspicious tickets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspicious_type: Option<String>,
    /// Gross amount actually carried, on suspicious tickets only.
    #[serde(
        default,
        rename = "_actual_amount_collected",
        skip_serializing_if = "Option::is_none"
    )]
    pub actual_amount_collected: Option<f64>,
}

impl TicketRecord {
    /// Render an engine ticket.
    pub fn from_ticket(t: &Ticket) -> Self {
        Self {
            ticket_id: t.id.clone(),
            node_id: t.node.clone(),
            collection_start_timestamp: t.collection.start().format(),
            collection_timestamp: t.collection.end().format(),
            amount_collected: round2(t.reported_amount),
            courier_id: t.courier.clone(),
            status: STATUS_COMPLETED.to_string(),
            is_suspicious: t.suspicious,
            suspicious_type: t.suspicious.then(|| UNDERREPORTED.to_string()),
            actual_amount_collected: t.suspicious.then(|| round2(t.true_amount)),
        }
    }

    /// Parse back into an engine ticket.
    pub fn to_ticket(&self) -> Result<Ticket, DatasetError> {
        let start = Minute::parse(&self.collection_start_timestamp)?;
        let end = Minute::parse(&self.collection_timestamp)?;
        Ok(Ticket {
            id: self.ticket_id.clone(),
            node: self.node_id.clone(),
            courier: self.courier_id.clone(),
            collection: TimeWindow::new(start, end)?,
            reported_amount: self.amount_collected,
            true_amount: self.actual_amount_collected.unwrap_or(self.amount_collected),
            suspicious: self.is_suspicious,
        })
    }
}

impl TicketFile {
    /// Wrap records and compute the header.
    pub fn new(transport_tickets: Vec<TicketRecord>) -> Self {
        let mut file = Self {
            metadata: TicketMetadata {
                total_tickets: 0,
                suspicious_tickets: 0,
                date_range: DateRange::default(),
            },
            transport_tickets,
        };
        file.refresh_metadata();
        file
    }

    /// Recompute counts and date range.
    pub fn refresh_metadata(&mut self) {
        let tickets = &self.transport_tickets;
        self.metadata = TicketMetadata {
            total_tickets: tickets.len(),
            suspicious_tickets: tickets.iter().filter(|t| t.is_suspicious).count(),
            date_range: DateRange::of(tickets.iter().map(|t| &t.collection_start_timestamp)),
        };
    }

    /// Parse every record.
    pub fn to_tickets(&self) -> Result<Vec<Ticket>, DatasetError> {
        self.transport_tickets
            .iter()
            .map(TicketRecord::to_ticket)
            .collect()
    }
}

// ── Unreported drains ──────────────────────────────────────────────

/// `unreported_drains.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrainFile {
    /// Count and date range.
    pub metadata: DrainMetadata,
    /// Drains in acceptance order.
    pub unreported_drains: Vec<DrainRecord>,
}

/// Header of the unreported-drain file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrainMetadata {
    /// Number of drains.
    pub total_unreported_drains: usize,
    /// Earliest and latest drain start.
    pub date_range: DateRange,
}

/// One unreported drain as written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrainRecord {
    /// Node drained.
    #[serde(alias = "cauldron_id")]
    pub node_id: NodeId,
    /// First lowered minute.
    pub drain_start_timestamp: String,
    /// First minute after the drain.
    pub drain_end_timestamp: String,
    /// Net liters removed.
    pub estimated_amount_drained_liters: f64,
    /// Length of the drain.
    pub duration_minutes: i64,
    /// Fixed reminder that no ticket covers this drain.
    #[serde(default)]
    pub note: String,
}

impl DrainRecord {
    /// Render an injected drain.
    pub fn from_drain(d: &UnreportedDrain) -> Self {
        Self {
            node_id: d.node.clone(),
            drain_start_timestamp: d.window.start().format(),
            drain_end_timestamp: d.window.end().format(),
            estimated_amount_drained_liters: round2(d.amount),
            duration_minutes: d.window.duration(),
            note: NO_TICKET_NOTE.to_string(),
        }
    }

    /// Parse back into an engine drain.
    pub fn to_drain(&self) -> Result<UnreportedDrain, DatasetError> {
        let start = Minute::parse(&self.drain_start_timestamp)?;
        let end = Minute::parse(&self.drain_end_timestamp)?;
        Ok(UnreportedDrain {
            node: self.node_id.clone(),
            window: TimeWindow::new(start, end)?,
            amount: self.estimated_amount_drained_liters,
        })
    }
}

impl DrainFile {
    /// Wrap records and compute the header.
    pub fn new(unreported_drains: Vec<DrainRecord>) -> Self {
        let mut file = Self {
            metadata: DrainMetadata {
                total_unreported_drains: 0,
                date_range: DateRange::default(),
            },
            unreported_drains,
        };
        file.refresh_metadata();
        file
    }

    /// Recompute count and date range.
    pub fn refresh_metadata(&mut self) {
        let drains = &self.unreported_drains;
        self.metadata = DrainMetadata {
            total_unreported_drains: drains.len(),
            date_range: DateRange::of(drains.iter().map(|d| &d.drain_start_timestamp)),
        };
    }

    /// Parse every record.
    pub fn to_drains(&self) -> Result<Vec<UnreportedDrain>, DatasetError> {
        self.unreported_drains
            .iter()
            .map(DrainRecord::to_drain)
            .collect()
    }
}
