//! End-to-end analysis run and its report.
//!
//! Order of work: optimise every profile, value embedded options against the
//! Optimal strategy, simulate all strategies (hedged and unhedged), run the
//! preset scenarios and the tornado.

use crate::error::RiskError;
use crate::hedging::HedgeSpec;
use crate::mc::{MonteCarloConfig, MonteCarloEngine, MonteCarloReport};
use crate::scenarios::{PresetScenario, ScenarioAnalyzer, ScenarioResult, TornadoReport};
use lng_config::TradingConfig;
use lng_core::types::DeliveryMonth;
use lng_optimiser::{EmbeddedOptionReport, EmbeddedOptionValuer, Strategy, StrategyOptimiser};
use lng_pricing::{FactorModel, MarketInput};
use serde::Serialize;
use tracing::{info, warn};

/// Monte Carlo results, or why they are missing.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MonteCarloOutcome {
    /// Simulation ran
    Available(MonteCarloReport),
    /// The factor model could not be built
    Unavailable {
        /// Underlying numerical failure
        reason: String,
    },
}

impl MonteCarloOutcome {
    /// The report, when available.
    pub fn report(&self) -> Option<&MonteCarloReport> {
        match self {
            Self::Available(r) => Some(r),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Headline numbers of one strategy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StrategySummary {
    /// Profile name
    pub name: String,
    /// Total P&L
    pub total_pnl: f64,
    /// Delivered months
    pub deliveries: usize,
    /// Cancelled months
    pub cancellations: usize,
}

impl From<&Strategy> for StrategySummary {
    fn from(s: &Strategy) -> Self {
        Self {
            name: s.name().to_string(),
            total_pnl: s.total_pnl(),
            deliveries: s.deliveries().count(),
            cancellations: s.cancellations(),
        }
    }
}

/// Everything a run produces.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// First delivery month
    pub delivery_start: DeliveryMonth,
    /// P&L of cancelling any month
    pub cancellation_pnl: f64,
    /// Strategy comparison
    pub summary: Vec<StrategySummary>,
    /// Itemised decisions per strategy
    pub strategies: Vec<Strategy>,
    /// Embedded option table for the Optimal strategy
    pub embedded_options: EmbeddedOptionReport,
    /// Monte Carlo metrics
    pub monte_carlo: MonteCarloOutcome,
    /// Preset scenarios
    pub scenarios: Vec<ScenarioResult>,
    /// Tornado sensitivity
    pub tornado: TornadoReport,
}

/// Runs the full analysis.
///
/// A factor model that cannot be built marks Monte Carlo unavailable; every
/// other failure aborts the run.
///
/// # Errors
///
/// - `MarketData` for an invalid forecast table
/// - `Optimiser` when a strategy cannot be priced
/// - `InvalidParameter` for out-of-range analysis settings
pub fn run_analysis(config: &TradingConfig, market: &MarketInput) -> Result<AnalysisReport, RiskError> {
    let forecasts = market.forecast_set()?;
    let settings = &config.analysis;

    let optimiser = StrategyOptimiser::new(config, &forecasts);
    let strategies = optimiser.optimise_all()?;
    let optimal = strategies
        .iter()
        .find(|s| s.name() == "Optimal")
        .or_else(|| strategies.first())
        .ok_or_else(|| RiskError::invalid("strategies", "no strategy profiles"))?;

    let embedded_options = EmbeddedOptionValuer::new(config, &forecasts).value(optimal)?;

    let mc_config = MonteCarloConfig::from_settings(settings)?;
    let hedge = settings
        .hedge
        .as_ref()
        .map(HedgeSpec::from_settings)
        .transpose()?;
    let monte_carlo = match FactorModel::from_spec(&market.factor_model) {
        Ok(model) => {
            let engine = MonteCarloEngine::new(config, &forecasts, model, mc_config);
            MonteCarloOutcome::Available(engine.run(&strategies, hedge.as_ref())?)
        }
        Err(e) => {
            warn!(error = %e, "factor model unavailable; skipping Monte Carlo");
            MonteCarloOutcome::Unavailable {
                reason: e.to_string(),
            }
        }
    };

    let analyzer = ScenarioAnalyzer::new(config, &forecasts);
    let scenarios = analyzer.run(&PresetScenario::all())?;
    let tornado = analyzer.tornado(settings.tornado_pct)?;

    info!(strategies = strategies.len(), "analysis complete");
    Ok(AnalysisReport {
        delivery_start: config.contract.delivery_start,
        cancellation_pnl: optimiser.pricer().cancellation_pnl(),
        summary: strategies.iter().map(StrategySummary::from).collect(),
        strategies,
        embedded_options,
        monte_carlo,
        scenarios,
        tornado,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lng_config::reference_config;
    use lng_pricing::{reference_market, FactorModelSpec};

    fn small_config() -> TradingConfig {
        let mut config = reference_config();
        config.analysis.mc_paths = 200;
        config
    }

    #[test]
    fn test_reference_run() {
        let report = run_analysis(&small_config(), &reference_market()).unwrap();
        assert_eq!(report.strategies.len(), 3);
        assert_eq!(report.summary.len(), 3);
        assert_eq!(report.scenarios.len(), 4);
        let mc = report.monte_carlo.report().unwrap();
        assert_eq!(mc.n_paths, 200);
        assert!(mc.strategies.iter().all(|s| s.hedged.is_some()));
    }

    #[test]
    fn test_bad_factor_model_marks_monte_carlo_unavailable() {
        let mut market = reference_market();
        market.factor_model = FactorModelSpec::Parametric {
            correlation: vec![1.0, 0.0, 0.0, 1.0],
            volatilities: vec![0.5, 0.4],
        };
        let report = run_analysis(&small_config(), &market).unwrap();
        assert!(matches!(
            report.monte_carlo,
            MonteCarloOutcome::Unavailable { .. }
        ));
        assert_eq!(report.strategies.len(), 3);
    }
}
