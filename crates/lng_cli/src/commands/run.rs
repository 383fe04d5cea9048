//! Run command implementation
//!
//! Loads configuration and market data, then runs the full analysis.

use std::path::Path;

use lng_config::TradingConfig;
use lng_pricing::MarketInput;
use lng_risk::run_analysis;
use tracing::info;

use crate::{logging, report, Result};

/// Arguments of the run command.
pub struct RunArgs<'a> {
    /// Trading configuration file
    pub config: &'a Path,
    /// Market file
    pub market: &'a Path,
    /// Optional JSON output
    pub json: Option<&'a Path>,
    /// Path count override
    pub paths: Option<usize>,
    /// Seed override
    pub seed: Option<u64>,
}

/// Run the analysis command
pub fn run(args: &RunArgs<'_>, verbose: bool) -> Result<()> {
    let mut config = TradingConfig::load_with_env_and_validate(args.config)?;
    logging::init(verbose, &config.analysis.log_level);

    if let Some(paths) = args.paths {
        config.analysis.mc_paths = paths;
    }
    if let Some(seed) = args.seed {
        config.analysis.seed = seed;
    }
    let market = MarketInput::load(args.market)?;

    info!(
        config = %args.config.display(),
        market = %args.market.display(),
        paths = config.analysis.mc_paths,
        seed = config.analysis.seed,
        "starting analysis"
    );
    execute(&config, &market, args.json)
}

/// Runs the analysis, prints the tables and optionally writes JSON.
pub(crate) fn execute(config: &TradingConfig, market: &MarketInput, json: Option<&Path>) -> Result<()> {
    let analysis = run_analysis(config, market)?;
    report::print(&analysis);
    if let Some(path) = json {
        report::write_json(&analysis, path)?;
    }
    Ok(())
}
