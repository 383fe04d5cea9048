//! Scenario re-optimisation and single-factor tornado sensitivity.

use super::shifts::{FactorShock, Scenario};
use crate::error::RiskError;
use lng_config::{StrategyProfile, TradingConfig};
use lng_core::types::{BuyerId, DeliveryMonth, DestinationId, PriceFactor};
use lng_optimiser::{MonthlyDecision, Strategy, StrategyOptimiser};
use lng_pricing::ForecastSet;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Compact row of a strategy's decision table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionRow {
    /// Delivery month
    pub month: DeliveryMonth,
    /// Destination, `None` when cancelled
    pub destination: Option<DestinationId>,
    /// Buyer, `None` when cancelled
    pub buyer: Option<BuyerId>,
    /// Volume multiplier, `None` when cancelled
    pub multiplier: Option<f64>,
    /// Net P&L of the month
    pub net_pnl: f64,
}

impl From<&MonthlyDecision> for DecisionRow {
    fn from(m: &MonthlyDecision) -> Self {
        let delivered = m.delivered();
        Self {
            month: m.month,
            destination: delivered.map(|c| c.destination().clone()),
            buyer: delivered.map(|c| c.buyer().clone()),
            multiplier: delivered.map(|c| c.multiplier),
            net_pnl: m.pnl(),
        }
    }
}

/// One profile under one scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStrategyResult {
    /// Profile name
    pub strategy: String,
    /// Total P&L under the scenario
    pub total_pnl: f64,
    /// Change versus the base case
    pub delta_vs_base: f64,
    /// Re-optimised decisions
    pub decisions: Vec<DecisionRow>,
}

/// Every profile under one scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// The scenario
    pub scenario: Scenario,
    /// Per-profile results
    pub strategies: Vec<ScenarioStrategyResult>,
}

/// Low/high P&L from bumping one factor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TornadoBar {
    /// Bumped factor
    pub factor: PriceFactor,
    /// P&L change with the factor down
    pub low_delta: f64,
    /// P&L change with the factor up
    pub high_delta: f64,
}

impl TornadoBar {
    /// `|high_delta - low_delta|`.
    pub fn swing(&self) -> f64 {
        (self.high_delta - self.low_delta).abs()
    }
}

/// Tornado chart data, widest swing first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TornadoReport {
    /// Profile analysed
    pub strategy: String,
    /// Relative bump size
    pub pct: f64,
    /// Base-case total P&L
    pub base_pnl: f64,
    /// One bar per factor
    pub bars: Vec<TornadoBar>,
}

/// Re-runs the optimiser under perturbed forecasts.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioAnalyzer<'a> {
    config: &'a TradingConfig,
    forecasts: &'a ForecastSet,
}

impl<'a> ScenarioAnalyzer<'a> {
    /// Creates an analyzer over base forecasts.
    pub fn new(config: &'a TradingConfig, forecasts: &'a ForecastSet) -> Self {
        Self { config, forecasts }
    }

    /// Re-optimises every profile under each scenario.
    ///
    /// # Errors
    ///
    /// `Optimiser` when a shocked forecast cannot be priced, for example an
    /// absolute shock that drives a price negative.
    pub fn run(&self, scenarios: &[Scenario]) -> Result<Vec<ScenarioResult>, RiskError> {
        let profiles = self.config.strategy_profiles();
        let base: Vec<f64> = profiles
            .iter()
            .map(|p| self.optimise(self.forecasts, p).map(|s| s.total_pnl()))
            .collect::<Result<_, _>>()?;

        scenarios
            .iter()
            .map(|scenario| -> Result<ScenarioResult, RiskError> {
                let shocked = scenario.apply(self.forecasts);
                let strategies = profiles
                    .iter()
                    .zip(&base)
                    .map(|(profile, base_pnl)| -> Result<ScenarioStrategyResult, RiskError> {
                        let strategy = self.optimise(&shocked, profile)?;
                        let total_pnl = strategy.total_pnl();
                        Ok(ScenarioStrategyResult {
                            strategy: profile.name.clone(),
                            total_pnl,
                            delta_vs_base: total_pnl - base_pnl,
                            decisions: strategy.months.iter().map(DecisionRow::from).collect(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                info!(scenario = %scenario.name, "scenario evaluated");
                Ok(ScenarioResult {
                    scenario: scenario.clone(),
                    strategies,
                })
            })
            .collect()
    }

    /// Bumps each factor down and up by `pct` (relative) for the Optimal
    /// profile, re-optimising each time.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` unless `0 < pct < 1`.
    pub fn tornado(&self, pct: f64) -> Result<TornadoReport, RiskError> {
        if !(pct > 0.0 && pct < 1.0) {
            return Err(RiskError::invalid(
                "tornado_pct",
                format!("must lie in (0, 1), got {}", pct),
            ));
        }
        let profile = self
            .config
            .strategy_profiles()
            .into_iter()
            .find(|p| p.name == "Optimal")
            .unwrap_or_else(StrategyProfile::optimal);
        let base_pnl = self.optimise(self.forecasts, &profile)?.total_pnl();

        let mut bars = PriceFactor::ALL
            .iter()
            .map(|&factor| -> Result<TornadoBar, RiskError> {
                let bumped = |sign: f64| -> Result<f64, RiskError> {
                    let shocked = Scenario::new(
                        factor.name(),
                        "tornado bump",
                        vec![FactorShock::relative(factor, sign * pct)],
                    )
                    .apply(self.forecasts);
                    Ok(self.optimise(&shocked, &profile)?.total_pnl() - base_pnl)
                };
                Ok(TornadoBar {
                    factor,
                    low_delta: bumped(-1.0)?,
                    high_delta: bumped(1.0)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        bars.sort_by(|a, b| b.swing().total_cmp(&a.swing()));

        Ok(TornadoReport {
            strategy: profile.name,
            pct,
            base_pnl,
            bars,
        })
    }

    fn optimise(&self, forecasts: &ForecastSet, profile: &StrategyProfile) -> Result<Strategy, RiskError> {
        Ok(StrategyOptimiser::new(self.config, forecasts).optimise(profile)?)
    }
}
