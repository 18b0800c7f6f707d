//! The three output files as one unit: build from a run, continue from
//! disk, append a continuation.

use sluice_core::Minute;
use sluice_engine::{EngineConfig, PriorState, RunOutput};
use tracing::{debug, info};

use crate::error::DatasetError;
use crate::io::{load, save, DatasetPaths};
use crate::records::{
    DrainFile, DrainRecord, HistoryFile, HistoryMetadata, SnapshotRecord, TicketFile,
    TicketRecord,
};

/// Level series, tickets and unreported drains of one dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    /// `historical_data.json`.
    pub history: HistoryFile,
    /// `transport_tickets.json`.
    pub tickets: TicketFile,
    /// `unreported_drains.json`.
    pub drains: DrainFile,
}

impl Dataset {
    /// Render a finished run.
    pub fn from_run(config: &EngineConfig, run: &RunOutput) -> Self {
        let mut dataset = Self {
            history: HistoryFile {
                metadata: HistoryMetadata::for_nodes(&config.nodes, &config.fill),
                data: snapshot_records(run),
            },
            tickets: TicketFile::new(run.tickets.iter().map(TicketRecord::from_ticket).collect()),
            drains: DrainFile::new(run.anomalies.iter().map(DrainRecord::from_drain).collect()),
        };
        dataset.refresh_metadata();
        dataset
    }

    /// Append a run that continues this dataset.
    ///
    /// The run's first minute must directly follow the last recorded one.
    /// Metadata is recomputed afterwards.
    pub fn append(&mut self, run: &RunOutput) -> Result<(), DatasetError> {
        let first = run.history.snapshots().first();
        if let (Some(last), Some(first)) = (self.history.last_minute()?, first) {
            if first.at != last.next() {
                return Err(DatasetError::Inconsistent {
                    detail: format!(
                        "continuation starts at {} but history ends at {last}",
                        first.at
                    ),
                });
            }
        }
        self.history.data.extend(snapshot_records(run));
        self.tickets
            .transport_tickets
            .extend(run.tickets.iter().map(TicketRecord::from_ticket));
        self.drains
            .unreported_drains
            .extend(run.anomalies.iter().map(DrainRecord::from_drain));
        self.refresh_metadata();
        debug!(
            minutes = run.history.len(),
            tickets = run.tickets.len(),
            drains = run.anomalies.len(),
            "appended continuation"
        );
        Ok(())
    }

    /// Recompute every header from the records.
    pub fn refresh_metadata(&mut self) {
        self.tickets.refresh_metadata();
        self.drains.refresh_metadata();
        let collections = self.tickets.transport_tickets.len();
        self.history.refresh_metadata(collections);
    }

    /// State the engine needs to continue this dataset.
    pub fn prior_state(&self) -> Result<PriorState, DatasetError> {
        let last = self.history.data.last().ok_or_else(|| DatasetError::Inconsistent {
            detail: "history is empty; nothing to continue".to_string(),
        })?;
        Ok(PriorState {
            last_minute: last.minute()?,
            levels: last.levels.clone(),
            tickets: self.tickets.to_tickets()?,
            anomalies: self.drains.to_drains()?,
        })
    }

    /// Check that the series advances by exactly one minute per entry.
    pub fn check_contiguous(&self) -> Result<(), DatasetError> {
        let mut prev: Option<Minute> = None;
        for (i, s) in self.history.data.iter().enumerate() {
            let at = s.minute()?;
            if let Some(p) = prev {
                if at != p.next() {
                    return Err(DatasetError::Inconsistent {
                        detail: format!("entry {i} at {at} does not follow {p}"),
                    });
                }
            }
            prev = Some(at);
        }
        Ok(())
    }

    /// Read the three files from `paths`.
    pub fn load(paths: &DatasetPaths) -> Result<Self, DatasetError> {
        let dataset = Self {
            history: load(&paths.history())?,
            tickets: load(&paths.tickets())?,
            drains: load(&paths.drains())?,
        };
        info!(
            dir = %paths.dir().display(),
            minutes = dataset.history.data.len(),
            tickets = dataset.tickets.transport_tickets.len(),
            drains = dataset.drains.unreported_drains.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Write the three files into `paths`.
    pub fn save(&self, paths: &DatasetPaths) -> Result<(), DatasetError> {
        save(&paths.history(), &self.history)?;
        save(&paths.tickets(), &self.tickets)?;
        save(&paths.drains(), &self.drains)?;
        info!(dir = %paths.dir().display(), "wrote dataset");
        Ok(())
    }
}

fn snapshot_records(run: &RunOutput) -> Vec<SnapshotRecord> {
    let ids = run.history.node_ids();
    run.history
        .snapshots()
        .iter()
        .map(|s| SnapshotRecord::from_snapshot(ids, s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_engine::Simulation;
    use sluice_test_utils::{small_network_config, EPOCH};

    fn dataset(seed: u64, days: i64) -> (EngineConfig, Dataset) {
        let cfg = small_network_config(seed, days);
        let run = Simulation::new(cfg.clone()).unwrap().run().unwrap();
        let ds = Dataset::from_run(&cfg, &run);
        (cfg, ds)
    }

    #[test]
    fn metadata_describes_the_run() {
        let (cfg, ds) = dataset(4, 1);
        let meta = &ds.history.metadata;
        assert_eq!(meta.start_date, "2024-10-30T00:00:00Z");
        assert_eq!(meta.end_date, "2024-10-30T23:59:00Z");
        assert_eq!(meta.total_minutes, 1440);
        assert_eq!(meta.total_collections, ds.tickets.transport_tickets.len());
        assert_eq!(meta.fill_rates_l_per_min.len(), cfg.nodes.len());
        assert_eq!(meta.interval_minutes, 1);
        ds.check_contiguous().unwrap();
    }

    #[test]
    fn levels_are_rounded_on_write() {
        let (_, ds) = dataset(4, 1);
        for s in &ds.history.data {
            for &l in s.levels.values() {
                assert_eq!(l, crate::records::round2(l));
            }
        }
    }

    #[test]
    fn prior_state_reflects_last_snapshot() {
        let (_, ds) = dataset(4, 1);
        let prior = ds.prior_state().unwrap();
        assert_eq!(prior.last_minute, EPOCH + 1439);
        assert_eq!(prior.levels, ds.history.data.last().unwrap().levels);
        assert_eq!(prior.tickets.len(), ds.tickets.transport_tickets.len());
        assert_eq!(prior.anomalies.len(), ds.drains.unreported_drains.len());
    }

    #[test]
    fn append_rejects_a_non_contiguous_run() {
        let (_, mut ds) = dataset(4, 1);
        // Same horizon again: starts at the first minute, not the next one.
        let repeat = Simulation::new(small_network_config(4, 1)).unwrap().run().unwrap();
        match ds.append(&repeat) {
            Err(DatasetError::Inconsistent { .. }) => {}
            other => panic!("expected Inconsistent, got {other:?}"),
        }
    }

    #[test]
    fn empty_history_cannot_be_continued() {
        let (_, mut ds) = dataset(4, 1);
        ds.history.data.clear();
        assert!(matches!(ds.prior_state(), Err(DatasetError::Inconsistent { .. })));
    }
}
