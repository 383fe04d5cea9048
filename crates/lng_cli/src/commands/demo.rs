//! Demo command implementation
//!
//! Runs the full analysis on the bundled reference configuration and market.

use std::path::Path;

use lng_config::reference_config;
use lng_pricing::reference_market;
use tracing::info;

use crate::{logging, Result};

/// Run the demo command
pub fn run(paths: usize, json: Option<&Path>, verbose: bool) -> Result<()> {
    let mut config = reference_config();
    logging::init(verbose, &config.analysis.log_level);
    config.analysis.mc_paths = paths;

    info!(paths, "running reference demo");
    super::run::execute(&config, &reference_market(), json)
}
