//! Run settings loaded from a JSON file.
//!
//! Every field is optional in the file; anything missing takes the
//! engine's default. Settings only override tunables, never the network.

use serde::{Deserialize, Serialize};
use sluice_core::{Minute, MINUTES_PER_DAY};
use sluice_engine::{DispatchConfig, EngineConfig, FillNoise, TicketConfig};

use crate::error::DatasetError;
use crate::records::NoiseRecord;

/// Tunables for one generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// First simulated minute of a fresh run.
    pub start_date: String,
    /// Whole days to simulate.
    pub days: u32,
    /// Master RNG seed.
    pub seed: u64,
    /// Fill rate for nodes whose record omits one.
    pub default_fill_rate: f64,
    /// Starting level, as a fraction of capacity, for nodes whose record
    /// omits one.
    pub initial_fill_fraction: f64,
    /// Fill noise override.
    pub noise: Option<NoiseRecord>,
    /// Liters one courier can carry.
    pub courier_capacity: f64,
    /// Minutes spent unloading at the depot.
    pub unload_minutes: i64,
    /// Minimum idle gap between two trips of one courier.
    pub trip_buffer_minutes: i64,
    /// Minimum gap between two extractions on one node.
    pub node_gap_minutes: i64,
    /// Longest a courier may wait before leaving, `None` for no limit.
    pub max_departure_delay_minutes: Option<i64>,
    /// Whether couriers only work their shift.
    pub shifts_enabled: bool,
    /// Probability a ticket under-reports.
    pub suspicious_probability: f64,
    /// Whether to inject unreported drains.
    pub anomalies_enabled: bool,
    /// Inclusive range the anomaly target is drawn from.
    pub anomaly_count: (u32, u32),
}

impl Default for SimulationSettings {
    fn default() -> Self {
        let dispatch = DispatchConfig::default();
        let tickets = TicketConfig::default();
        let anomalies = sluice_engine::AnomalyConfig::default();
        Self {
            start_date: "2024-10-30T00:00:00Z".to_string(),
            days: 7,
            seed: 42,
            default_fill_rate: 0.08,
            initial_fill_fraction: 0.2,
            noise: None,
            courier_capacity: dispatch.courier_capacity,
            unload_minutes: dispatch.unload_minutes,
            trip_buffer_minutes: dispatch.trip_buffer_minutes,
            node_gap_minutes: dispatch.node_gap_minutes,
            max_departure_delay_minutes: dispatch.max_departure_delay_minutes,
            shifts_enabled: dispatch.shifts_enabled,
            suspicious_probability: tickets.suspicious_probability,
            anomalies_enabled: anomalies.enabled,
            anomaly_count: anomalies.target_count,
        }
    }
}

impl SimulationSettings {
    /// Parsed `start_date`.
    pub fn start(&self) -> Result<Minute, DatasetError> {
        Ok(Minute::parse(&self.start_date)?)
    }

    /// Last minute of a run of `days` days starting at `start`.
    pub fn end_from(&self, start: Minute) -> Minute {
        start + (i64::from(self.days) * MINUTES_PER_DAY - 1)
    }

    /// Copy the overrides into `cfg`.
    pub fn apply(&self, cfg: &mut EngineConfig) {
        cfg.seed = self.seed;
        if let Some(noise) = &self.noise {
            cfg.fill = FillNoise::from(noise);
        }
        let d = &mut cfg.dispatch;
        d.courier_capacity = self.courier_capacity;
        d.unload_minutes = self.unload_minutes;
        d.trip_buffer_minutes = self.trip_buffer_minutes;
        d.node_gap_minutes = self.node_gap_minutes;
        d.max_departure_delay_minutes = self.max_departure_delay_minutes;
        d.shifts_enabled = self.shifts_enabled;
        cfg.tickets.suspicious_probability = self.suspicious_probability;
        cfg.anomalies.enabled = self.anomalies_enabled;
        cfg.anomalies.target_count = self.anomaly_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_test_utils::{single_node_config, EPOCH};

    #[test]
    fn empty_object_is_all_defaults() {
        let s: SimulationSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(s, SimulationSettings::default());
        assert_eq!(s.start().unwrap(), EPOCH);
        assert_eq!(s.end_from(EPOCH), EPOCH + (7 * 1440 - 1));
    }

    #[test]
    fn partial_file_overrides_only_what_it_names() {
        let s: SimulationSettings =
            serde_json::from_str(r#"{"seed": 7, "days": 2, "anomalies_enabled": false}"#).unwrap();
        assert_eq!(s.seed, 7);
        assert_eq!(s.days, 2);
        assert!(!s.anomalies_enabled);
        assert_eq!(s.courier_capacity, SimulationSettings::default().courier_capacity);

        let mut cfg = single_node_config(60);
        cfg.anomalies.enabled = true;
        s.apply(&mut cfg);
        assert_eq!(cfg.seed, 7);
        assert!(!cfg.anomalies.enabled);
        assert_eq!(cfg.dispatch.courier_capacity, 100.0);
    }

    #[test]
    fn bad_start_date_is_reported() {
        let s = SimulationSettings {
            start_date: "yesterday".into(),
            ..SimulationSettings::default()
        };
        match s.start() {
            Err(DatasetError::Timestamp(_)) => {}
            other => panic!("expected Timestamp, got {other:?}"),
        }
    }
}
