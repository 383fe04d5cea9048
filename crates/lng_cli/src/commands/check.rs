//! Check command implementation
//!
//! Validates inputs without pricing anything: configuration rules, forecast
//! coverage of the delivery schedule and the factor model.

use std::path::Path;

use lng_config::{PriceLinkage, TradingConfig};
use lng_pricing::{FactorModel, ForecastSet, MarketInput};
use tracing::{info, warn};

use crate::{logging, CliError, Result};

/// Run the check command
pub fn run(config_path: &Path, market_path: Option<&Path>, verbose: bool) -> Result<()> {
    let config = TradingConfig::load_with_env_and_validate(config_path)?;
    logging::init(verbose, &config.analysis.log_level);
    println!(
        "config ok: {} destinations, {} buyers, {} strategies",
        config.destinations.len(),
        config.buyers.len(),
        config.strategy_profiles().len()
    );

    let Some(market_path) = market_path else {
        return Ok(());
    };
    let market = MarketInput::load(market_path)?;
    let forecasts = market.forecast_set()?;
    let problems = coverage_problems(&config, &forecasts);
    if !problems.is_empty() {
        return Err(CliError::Incomplete(problems));
    }
    println!("forecasts ok: {} months", forecasts.len());

    let model = FactorModel::from_spec(&market.factor_model)?;
    if model.was_repaired() {
        warn!("factor covariance was not positive semi-definite and has been repaired");
    }
    println!(
        "factor model ok{}",
        if model.was_repaired() { " (repaired)" } else { "" }
    );
    info!("inputs valid");
    Ok(())
}

/// Lists every schedule month that cannot be priced with these forecasts.
fn coverage_problems(config: &TradingConfig, forecasts: &ForecastSet) -> Vec<String> {
    let needs_next_month = config
        .destinations
        .iter()
        .any(|d| d.linkage == PriceLinkage::JkmNextMonth);
    config
        .contract
        .schedule()
        .into_iter()
        .filter_map(|month| match forecasts.inputs(month) {
            Ok(inputs) if needs_next_month && inputs.jkm_next_month.is_none() => {
                Some(format!("{}: no JKM forecast for {}", month, month.next()))
            }
            Ok(_) => None,
            Err(e) => Some(e.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lng_config::reference_config;
    use lng_pricing::reference_market;

    #[test]
    fn test_reference_inputs_cover_schedule() {
        let forecasts = reference_market().forecast_set().unwrap();
        assert!(coverage_problems(&reference_config(), &forecasts).is_empty());
    }

    #[test]
    fn test_short_forecast_table_reported() {
        let mut market = reference_market();
        market.forecasts.truncate(4);
        let forecasts = market.forecast_set().unwrap();
        let problems = coverage_problems(&reference_config(), &forecasts);
        // two months missing, and the last covered month loses its M+1
        assert_eq!(problems.len(), 3);
    }
}
