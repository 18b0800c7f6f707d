//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use sluice_dataset::{
    build_schedules, compare_histories, continue_dataset, generate as generate_fresh,
    history_digest, load, reassign as reassign_tickets, save, Dataset, DatasetPaths,
    DivergenceKind, NetworkFile, ReassignOptions, SimulationSettings, TicketFile,
};
use tracing::{info, warn};

use crate::summary::Summary;

/// Options shared by every command that needs the network and settings.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Directory holding the dataset files
    #[arg(short, long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Network description [default: <data-dir>/network.json]
    #[arg(short, long)]
    pub network: Option<PathBuf>,

    /// Settings file; missing fields take defaults
    #[arg(short, long)]
    pub settings: Option<PathBuf>,
}

impl InputArgs {
    fn paths(&self) -> DatasetPaths {
        DatasetPaths::new(&self.data_dir)
    }

    fn network_path(&self) -> PathBuf {
        self.network.clone().unwrap_or_else(|| self.paths().network())
    }

    fn network(&self) -> anyhow::Result<NetworkFile> {
        let path = self.network_path();
        load(&path).with_context(|| format!("reading network {}", path.display()))
    }

    fn settings(&self) -> anyhow::Result<SimulationSettings> {
        match &self.settings {
            Some(path) => {
                load(path).with_context(|| format!("reading settings {}", path.display()))
            }
            None => Ok(SimulationSettings::default()),
        }
    }
}

/// `sluice generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Override the settings seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the number of days to simulate
    #[arg(long)]
    pub days: Option<u32>,

    /// Ignore any existing history and start over
    #[arg(long)]
    pub fresh: bool,

    /// Skip writing courier_schedules.json
    #[arg(long)]
    pub no_schedules: bool,
}

/// `sluice schedules`.
#[derive(Args, Debug)]
pub struct SchedulesArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// `sluice reassign`.
#[derive(Args, Debug)]
pub struct ReassignArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Size of the new courier pool; every courier works any hour
    #[arg(short, long)]
    pub couriers: usize,
}

/// `sluice verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// `sluice summary`.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Directory holding the dataset files
    #[arg(short, long, default_value = ".")]
    pub data_dir: PathBuf,
}

pub fn generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let paths = args.input.paths();
    let network = args.input.network()?;
    let mut settings = args.input.settings()?;
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(days) = args.days {
        settings.days = days;
    }

    let generated = if paths.has_history() && !args.fresh {
        let existing = Dataset::load(&paths).context("loading existing dataset")?;
        continue_dataset(&network, &settings, existing).context("continuing dataset")?
    } else {
        generate_fresh(&network, &settings).context("generating dataset")?
    };

    std::fs::create_dir_all(paths.dir())
        .with_context(|| format!("creating {}", paths.dir().display()))?;
    generated.dataset.save(&paths).context("writing dataset")?;
    if !args.no_schedules {
        let schedules = generated.schedules()?;
        if schedules.metadata.late_arrivals > 0 {
            warn!(
                late = schedules.metadata.late_arrivals,
                "some trips could not reach their collection on time"
            );
        }
        save(&paths.schedules(), &schedules).context("writing courier schedules")?;
    }

    let m = &generated.run.metrics;
    info!(
        minutes = m.ticks,
        tickets = m.dispatches,
        suspicious = m.suspicious,
        anomalies = m.anomalies,
        pending = m.pending_no_courier,
        clamped = m.clamped_applications,
        wall_ms = m.wall_us / 1000,
        "run complete"
    );
    println!("{}", Summary::of(&generated.dataset));
    Ok(())
}

pub fn schedules(args: &SchedulesArgs) -> anyhow::Result<()> {
    let paths = args.input.paths();
    let network = args.input.network()?;
    let settings = args.input.settings()?;
    let tickets_file: TicketFile = load(&paths.tickets()).context("reading tickets")?;
    let tickets = tickets_file.to_tickets()?;

    let travel = network.travel()?;
    let file = build_schedules(&tickets, &travel, &network.depot, settings.unload_minutes);
    save(&paths.schedules(), &file).context("writing courier schedules")?;
    println!(
        "{} trips for {} couriers, {} late",
        file.metadata.total_tickets, file.metadata.total_couriers, file.metadata.late_arrivals
    );
    Ok(())
}

pub fn reassign(args: &ReassignArgs) -> anyhow::Result<()> {
    let paths = args.input.paths();
    let mut network = args.input.network()?;
    let settings = args.input.settings()?;
    let tickets: TicketFile = load(&paths.tickets()).context("reading tickets")?;

    let travel = network.travel()?;
    let options = ReassignOptions {
        couriers: args.couriers,
        unload_minutes: settings.unload_minutes,
        buffer_minutes: settings.trip_buffer_minutes,
    };
    let r = reassign_tickets(&tickets, &travel, &network.depot, &options)
        .with_context(|| format!("reassigning to {} couriers", args.couriers))?;

    let before = network.couriers.len();
    network.couriers = r.couriers.clone();
    save(&paths.tickets(), &r.tickets).context("writing tickets")?;
    let network_path = args.input.network_path();
    save(&network_path, &network)
        .with_context(|| format!("writing network {}", network_path.display()))?;
    let schedules = build_schedules(
        &r.tickets.to_tickets()?,
        &travel,
        &network.depot,
        settings.unload_minutes,
    );
    save(&paths.schedules(), &schedules).context("writing courier schedules")?;

    println!("{before} couriers -> {}", args.couriers);
    for (id, n) in r.load() {
        println!("  {id}: {n} tickets");
    }
    Ok(())
}

pub fn verify(args: &VerifyArgs) -> anyhow::Result<()> {
    let paths = args.input.paths();
    let network = args.input.network()?;
    let mut settings = args.input.settings()?;
    let recorded = Dataset::load(&paths).context("loading dataset")?;

    // Regenerate the same span in one fresh run.
    settings.start_date = recorded.history.metadata.start_date.clone();
    settings.days = recorded.history.data.len().div_ceil(1440) as u32;
    let replayed = generate_fresh(&network, &settings).context("regenerating dataset")?;

    let digest = history_digest(&recorded.history);
    match compare_histories(&recorded.history, &replayed.dataset.history) {
        None => {
            println!("ok: history digest {digest:#018x}");
            Ok(())
        }
        Some(report) => {
            println!(
                "history digest mismatch: recorded={:#018x}, regenerated={:#018x}",
                report.recorded_digest, report.replayed_digest
            );
            if report.recorded_len != report.replayed_len {
                println!(
                    "  length: recorded {} minutes, regenerated {}",
                    report.recorded_len, report.replayed_len
                );
            }
            for d in report.divergences.iter().take(10) {
                let at = recorded
                    .history
                    .data
                    .get(d.index)
                    .map_or("?", |s| s.timestamp.as_str());
                match &d.kind {
                    DivergenceKind::Level {
                        node,
                        recorded,
                        replayed,
                    } => println!("  {at} {node}: {recorded} vs {replayed}"),
                    DivergenceKind::MissingNode { node, in_recorded } => {
                        let side = if *in_recorded { "regenerated" } else { "recorded" };
                        println!("  {at} {node}: missing from {side}");
                    }
                    DivergenceKind::Timestamp { recorded, replayed } => {
                        println!("  entry {}: {recorded} vs {replayed}", d.index);
                    }
                }
            }
            bail!(
                "dataset does not match a fresh regeneration (first difference at entry {})",
                report.first_index().unwrap_or(0)
            )
        }
    }
}

pub fn summary(args: &SummaryArgs) -> anyhow::Result<()> {
    let paths = DatasetPaths::new(&args.data_dir);
    let dataset = Dataset::load(&paths).context("loading dataset")?;
    println!("{}", Summary::of(&dataset));
    Ok(())
}
