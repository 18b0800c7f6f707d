//! The network description file.
//!
//! ```json
//! {
//!   "depot": "market_001",
//!   "nodes": [{ "id": "cauldron_001", "max_volume": 1000, "fill_rate": 0.08 }],
//!   "network": { "edges": [{ "from": "market_001", "to": "cauldron_001", "travel_time_minutes": 15 }] },
//!   "couriers": [{ "courier_id": "courier_001", "shift": 1 }]
//! }
//! ```
//!
//! Optional node fields fall back to [`SimulationSettings`] or engine
//! defaults. A courier without a `shift` works around the clock.

use serde::{Deserialize, Serialize};
use sluice_core::{CourierId, LocationId, Minute, NodeId};
use sluice_engine::{CourierSpec, EngineConfig, NodeSpec, Shift};
use sluice_network::{Edge, TravelModel};

use crate::error::DatasetError;
use crate::settings::SimulationSettings;

/// `network.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkFile {
    /// Where couriers start and unload.
    pub depot: LocationId,
    /// Production nodes in iteration order.
    #[serde(alias = "cauldrons")]
    pub nodes: Vec<NodeRecord>,
    /// Travel graph.
    pub network: EdgeList,
    /// Courier fleet.
    pub couriers: Vec<CourierRecord>,
}

/// One node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node id.
    pub id: NodeId,
    /// Capacity in liters.
    pub max_volume: f64,
    /// Liters per minute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_rate: Option<f64>,
    /// Fraction of capacity above which the node wants collecting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_threshold: Option<f64>,
    /// Net liters per minute while a courier extracts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drain_rate: Option<f64>,
    /// Level at the start of a fresh run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_level: Option<f64>,
}

/// Wrapper matching the `"network": { "edges": [...] }` nesting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeList {
    /// Undirected edges.
    pub edges: Vec<EdgeRecord>,
}

/// One undirected edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// One endpoint.
    pub from: LocationId,
    /// The other endpoint.
    pub to: LocationId,
    /// Travel time.
    pub travel_time_minutes: u32,
}

/// One courier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourierRecord {
    /// Courier id.
    pub courier_id: CourierId,
    /// 1 night, 2 day, 3 evening; absent for any hour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<u8>,
}

impl NetworkFile {
    /// Build the travel lookup.
    pub fn travel(&self) -> Result<TravelModel, DatasetError> {
        let edges = self
            .network
            .edges
            .iter()
            .map(|e| Edge::new(e.from.clone(), e.to.clone(), e.travel_time_minutes));
        Ok(TravelModel::from_edges(edges)?)
    }

    /// Node specs with defaults filled in from `settings`.
    pub fn node_specs(&self, settings: &SimulationSettings) -> Vec<NodeSpec> {
        self.nodes
            .iter()
            .map(|n| {
                let mut spec = NodeSpec::new(
                    n.id.clone(),
                    n.max_volume,
                    n.fill_rate.unwrap_or(settings.default_fill_rate),
                )
                .with_initial_level(
                    n.initial_level
                        .unwrap_or(n.max_volume * settings.initial_fill_fraction),
                );
                if let Some(t) = n.collection_threshold {
                    spec = spec.with_threshold(t);
                }
                if let Some(r) = n.drain_rate {
                    spec = spec.with_drain_rate(r);
                }
                spec
            })
            .collect()
    }

    /// Courier specs. Fails on a shift number other than 1, 2 or 3.
    pub fn courier_specs(&self) -> Result<Vec<CourierSpec>, DatasetError> {
        self.couriers
            .iter()
            .map(|c| {
                let shift = match c.shift {
                    None => Shift::Any,
                    Some(n) => Shift::from_number(n).ok_or_else(|| DatasetError::Inconsistent {
                        detail: format!("courier '{}' has unknown shift {n}", c.courier_id),
                    })?,
                };
                Ok(CourierSpec::new(c.courier_id.clone(), shift))
            })
            .collect()
    }

    /// Assemble and validate an engine configuration for a run starting
    /// at `start` and lasting `settings.days` days.
    pub fn engine_config(
        &self,
        settings: &SimulationSettings,
        start: Minute,
    ) -> Result<EngineConfig, DatasetError> {
        let mut cfg = EngineConfig::new(
            start,
            settings.end_from(start),
            self.depot.clone(),
            self.node_specs(settings),
            self.courier_specs()?,
            self.travel()?,
        );
        settings.apply(&mut cfg);
        cfg.validate()?;
        Ok(cfg)
    }
}
