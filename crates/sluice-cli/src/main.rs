//! Sluice - synthetic liquid-collection dataset generator.
//!
//! Simulates a network of production nodes and couriers minute by minute
//! and writes the level series, transport tickets and unreported drains
//! an auditor would reconcile.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod summary;

use commands::{GenerateArgs, ReassignArgs, SchedulesArgs, SummaryArgs, VerifyArgs};

#[derive(Parser)]
#[command(
    name = "sluice",
    about = "Generate auditable synthetic collection-network datasets",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a fresh dataset, or continue the one already in the directory
    Generate(GenerateArgs),

    /// Rebuild the detailed courier schedules from existing tickets
    Schedules(SchedulesArgs),

    /// Move every ticket onto a smaller pool of couriers without shifts
    Reassign(ReassignArgs),

    /// Regenerate a dataset and compare its level series with the one on disk
    Verify(VerifyArgs),

    /// Print totals for an existing dataset
    Summary(SummaryArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Generate(args) => commands::generate(&args),
        Commands::Schedules(args) => commands::schedules(&args),
        Commands::Reassign(args) => commands::reassign(&args),
        Commands::Verify(args) => commands::verify(&args),
        Commands::Summary(args) => commands::summary(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_flags_parse() {
        let cli = Cli::try_parse_from([
            "sluice",
            "-v",
            "generate",
            "--data-dir",
            "out",
            "--seed",
            "9",
            "--days",
            "3",
            "--fresh",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.input.data_dir.to_str(), Some("out"));
                assert_eq!(args.seed, Some(9));
                assert_eq!(args.days, Some(3));
                assert!(args.fresh);
                assert!(args.input.network.is_none());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn reassign_requires_a_pool_size() {
        assert!(Cli::try_parse_from(["sluice", "reassign"]).is_err());
        let cli = Cli::try_parse_from(["sluice", "reassign", "--couriers", "3"]).unwrap();
        match cli.command {
            Commands::Reassign(args) => assert_eq!(args.couriers, 3),
            _ => panic!("expected reassign"),
        }
    }

    #[test]
    fn verbose_is_global() {
        let cli =
            Cli::try_parse_from(["sluice", "summary", "--data-dir", "d", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["sluice"]).is_err());
    }
}
