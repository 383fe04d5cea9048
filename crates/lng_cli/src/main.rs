//! lngdesk - Command Line Front End for the LNG Cargo Desk
//!
//! Batch entry point: loads a trading configuration and a market file, runs
//! the optimiser and risk layers, and prints the decision tables.
//!
//! # Commands
//!
//! - `lngdesk run --config <file> --market <file>` - Full analysis run
//! - `lngdesk check --config <file> [--market <file>]` - Validate inputs only
//! - `lngdesk demo` - Full analysis on the bundled reference data
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate only orchestrates: every
//! number it prints comes from `lng_risk::run_analysis`.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod commands;
mod error;
mod logging;
mod report;

pub use error::{CliError, Result};

/// LNG cargo trading decision model
#[derive(Parser)]
#[command(name = "lngdesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimise, value options and run risk analysis
    Run {
        /// Trading configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Market forecasts and factor model (TOML)
        #[arg(short, long)]
        market: PathBuf,

        /// Also write the full report as JSON
        #[arg(short, long)]
        json: Option<PathBuf>,

        /// Override the Monte Carlo path count
        #[arg(long)]
        paths: Option<usize>,

        /// Override the Monte Carlo seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Validate configuration and market data without pricing
    Check {
        /// Trading configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Market forecasts and factor model (TOML)
        #[arg(short, long)]
        market: Option<PathBuf>,
    },

    /// Run the analysis on the bundled reference data
    Demo {
        /// Monte Carlo path count
        #[arg(long, default_value = "2000")]
        paths: usize,

        /// Also write the full report as JSON
        #[arg(short, long)]
        json: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            market,
            json,
            paths,
            seed,
        } => commands::run::run(
            &commands::run::RunArgs {
                config: &config,
                market: &market,
                json: json.as_deref(),
                paths,
                seed,
            },
            cli.verbose,
        )
        .with_context(|| format!("run failed for {}", config.display())),
        Commands::Check { config, market } => {
            commands::check::run(&config, market.as_deref(), cli.verbose)
                .with_context(|| format!("check failed for {}", config.display()))
        }
        Commands::Demo { paths, json } => {
            commands::demo::run(paths, json.as_deref(), cli.verbose).context("demo failed")
        }
    }
}
