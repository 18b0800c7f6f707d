//! Fresh and continued generation runs.

use sluice_engine::{EngineConfig, RunOutput, Simulation};
use tracing::info;

use crate::dataset::Dataset;
use crate::error::DatasetError;
use crate::network::NetworkFile;
use crate::schedule::{build_schedules, ScheduleFile};
use crate::settings::SimulationSettings;

/// What one generation run produced.
#[derive(Debug)]
pub struct Generated {
    /// Configuration the engine ran with.
    pub config: EngineConfig,
    /// Raw engine output of this run only.
    pub run: RunOutput,
    /// The full dataset, including any prior records.
    pub dataset: Dataset,
}

impl Generated {
    /// Courier schedules for every ticket in the dataset.
    pub fn schedules(&self) -> Result<ScheduleFile, DatasetError> {
        let tickets = self.dataset.tickets.to_tickets()?;
        Ok(build_schedules(
            &tickets,
            &self.config.travel,
            &self.config.depot,
            self.config.dispatch.unload_minutes,
        ))
    }
}

/// Simulate `settings.days` days from `settings.start_date`.
pub fn generate(
    network: &NetworkFile,
    settings: &SimulationSettings,
) -> Result<Generated, DatasetError> {
    let config = network.engine_config(settings, settings.start()?)?;
    info!(
        start = %config.start,
        end = %config.end,
        nodes = config.nodes.len(),
        couriers = config.couriers.len(),
        seed = config.seed,
        "generating fresh dataset"
    );
    let run = Simulation::new(config.clone())?.run()?;
    let dataset = Dataset::from_run(&config, &run);
    Ok(Generated {
        config,
        run,
        dataset,
    })
}

/// Simulate `settings.days` more days after the end of `existing` and
/// append them.
pub fn continue_dataset(
    network: &NetworkFile,
    settings: &SimulationSettings,
    mut existing: Dataset,
) -> Result<Generated, DatasetError> {
    existing.check_contiguous()?;
    let prior = existing.prior_state()?;
    let config = network.engine_config(settings, prior.last_minute.next())?;
    info!(
        start = %config.start,
        end = %config.end,
        prior_minutes = existing.history.data.len(),
        prior_tickets = prior.tickets.len(),
        "continuing dataset"
    );
    let run = Simulation::resume(config.clone(), prior)?.run()?;
    existing.append(&run)?;
    Ok(Generated {
        config,
        run,
        dataset: existing,
    })
}
