//! Monte Carlo engine: re-prices fixed strategy decisions on simulated paths.

use super::config::MonteCarloConfig;
use super::paths::PathGenerator;
use crate::error::RiskError;
use crate::hedging::{HedgeOverlay, HedgeSpec};
use crate::metrics::RiskMetrics;
use lng_config::TradingConfig;
use lng_core::types::PricingError;
use lng_optimiser::{Decision, Strategy};
use lng_pricing::{
    CargoPricer, CargoRequest, FactorModel, FactorModelSpec, ForecastSet, PriceInputs,
    SurchargeLedger,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Simulated P&L of one strategy, one entry per path in path order.
#[derive(Clone, Debug, PartialEq)]
pub struct StrategyDistribution {
    /// Strategy name
    pub name: String,
    /// Unhedged P&L
    pub unhedged: Vec<f64>,
    /// Hedged P&L, when a hedge is applied
    pub hedged: Option<Vec<f64>>,
}

/// Risk metrics of one strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyRisk {
    /// Strategy name
    pub name: String,
    /// Unhedged metrics
    pub unhedged: RiskMetrics,
    /// Hedged metrics
    pub hedged: Option<RiskMetrics>,
}

/// Monte Carlo results for every strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloReport {
    /// Paths simulated
    pub n_paths: usize,
    /// Base seed
    pub seed: u64,
    /// Whether the covariance needed PSD repair
    pub covariance_repaired: bool,
    /// Hedge applied, if any
    pub hedge: Option<HedgeSpec>,
    /// Per-strategy metrics
    pub strategies: Vec<StrategyRisk>,
}

/// Correlated Monte Carlo over the delivery schedule.
#[derive(Debug)]
pub struct MonteCarloEngine<'a> {
    pricer: CargoPricer<'a>,
    forecasts: &'a ForecastSet,
    model: FactorModel,
    config: MonteCarloConfig,
}

impl<'a> MonteCarloEngine<'a> {
    /// Creates an engine over a built factor model.
    pub fn new(
        trading: &'a TradingConfig,
        forecasts: &'a ForecastSet,
        model: FactorModel,
        config: MonteCarloConfig,
    ) -> Self {
        Self {
            pricer: CargoPricer::new(trading),
            forecasts,
            model,
            config,
        }
    }

    /// Builds the factor model from its specification, then the engine.
    ///
    /// # Errors
    ///
    /// `Numerical` when the covariance cannot be repaired or factorised.
    pub fn from_spec(
        trading: &'a TradingConfig,
        forecasts: &'a ForecastSet,
        spec: &FactorModelSpec,
        config: MonteCarloConfig,
    ) -> Result<Self, RiskError> {
        let model = FactorModel::from_spec(spec)?;
        Ok(Self::new(trading, forecasts, model, config))
    }

    /// The factor model in use.
    pub fn model(&self) -> &FactorModel {
        &self.model
    }

    /// Run configuration.
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Simulates per-path P&L of each strategy, with an optional hedge.
    ///
    /// Strategy decisions are held fixed; each path re-prices the delivered
    /// cargoes with a fresh surcharge ledger replayed in month order.
    pub fn simulate(
        &self,
        strategies: &[Strategy],
        hedge: Option<&HedgeSpec>,
    ) -> Result<Vec<StrategyDistribution>, RiskError> {
        let n_steps = strategies.iter().map(|s| s.months.len()).max().unwrap_or(0);
        let generator = PathGenerator::new(&self.model, n_steps, self.config.seed());

        let forecasts: Vec<Vec<PriceInputs>> = strategies
            .iter()
            .map(|s| {
                s.months
                    .iter()
                    .map(|m| self.forecasts.inputs(m.month))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<_, _>>()?;
        let overlays: Vec<Option<HedgeOverlay>> = strategies
            .iter()
            .map(|s| {
                hedge
                    .map(|spec| HedgeOverlay::new(*spec, &self.pricer, s, self.forecasts))
                    .transpose()
            })
            .collect::<Result<_, _>>()?;

        debug!(n_paths = self.config.n_paths(), n_steps, "simulating paths");
        let per_path: Vec<Vec<(f64, f64)>> = (0..self.config.n_paths())
            .into_par_iter()
            .map(|p| {
                let path = generator.path(p);
                strategies
                    .iter()
                    .zip(&forecasts)
                    .zip(&overlays)
                    .map(|((strategy, base), overlay)| -> Result<(f64, f64), PricingError> {
                        let pnl = replay_pnl(&self.pricer, strategy, |i| {
                            path.inputs(i as i64 + 1, &base[i])
                        })?;
                        let payoff = overlay.as_ref().map_or(0.0, |o| o.payoff(&path));
                        Ok((pnl, payoff))
                    })
                    .collect::<Result<Vec<_>, PricingError>>()
            })
            .collect::<Result<_, _>>()?;

        strategies
            .iter()
            .enumerate()
            .zip(&overlays)
            .map(|((k, strategy), overlay)| -> Result<StrategyDistribution, RiskError> {
                let unhedged: Vec<f64> = per_path.iter().map(|row| row[k].0).collect();
                let hedged = match overlay {
                    Some(o) => {
                        let payoffs: Vec<f64> = per_path.iter().map(|row| row[k].1).collect();
                        Some(o.apply(&unhedged, &payoffs)?)
                    }
                    None => None,
                };
                Ok(StrategyDistribution {
                    name: strategy.name().to_string(),
                    unhedged,
                    hedged,
                })
            })
            .collect()
    }

    /// Simulates and summarises every strategy.
    pub fn run(
        &self,
        strategies: &[Strategy],
        hedge: Option<&HedgeSpec>,
    ) -> Result<MonteCarloReport, RiskError> {
        let distributions = self.simulate(strategies, hedge)?;
        let confidence = self.config.confidence();
        let benchmark = self.config.risk_free_pnl();

        let strategies = distributions
            .iter()
            .map(|d| -> Result<StrategyRisk, RiskError> {
                let unhedged = RiskMetrics::from_pnl(&d.unhedged, confidence, benchmark)?;
                let hedged = d
                    .hedged
                    .as_deref()
                    .map(|h| RiskMetrics::from_pnl(h, confidence, benchmark))
                    .transpose()?;
                info!(
                    strategy = %d.name,
                    mean = unhedged.mean,
                    var = unhedged.var,
                    cvar = unhedged.cvar,
                    "monte carlo metrics"
                );
                Ok(StrategyRisk {
                    name: d.name.clone(),
                    unhedged,
                    hedged,
                })
            })
            .collect::<Result<Vec<_>, RiskError>>()?;

        Ok(MonteCarloReport {
            n_paths: self.config.n_paths(),
            seed: self.config.seed(),
            covariance_repaired: self.model.was_repaired(),
            hedge: hedge.copied(),
            strategies,
        })
    }
}

/// Re-prices a strategy's fixed decisions month by month.
///
/// `inputs(i)` supplies the prices of the strategy's `i`-th month. The
/// surcharge ledger starts empty and records each delivered call.
pub fn replay_pnl(
    pricer: &CargoPricer<'_>,
    strategy: &Strategy,
    inputs: impl Fn(usize) -> PriceInputs,
) -> Result<f64, PricingError> {
    let mut ledger = SurchargeLedger::new();
    let mut total = 0.0;
    for (i, month) in strategy.months.iter().enumerate() {
        total += match &month.decision {
            Decision::Cancel { pnl } => *pnl,
            Decision::Deliver(c) => {
                let request = CargoRequest {
                    month: month.month,
                    destination: c.destination().clone(),
                    buyer: c.buyer().clone(),
                    purchase_volume: c.pnl.purchase_volume,
                };
                let pnl = pricer.price(&request, &inputs(i), &ledger)?;
                let (dest, _) = pricer.resolve(&request.destination, &request.buyer)?;
                ledger.record(dest, month.month, &pricer.config().contract.vessel_flag);
                pnl.net_pnl
            }
        };
    }
    Ok(total)
}

/// Ledger state seen by each month of a strategy, before that month's call.
pub fn replay_ledgers(
    pricer: &CargoPricer<'_>,
    strategy: &Strategy,
) -> Result<Vec<SurchargeLedger>, PricingError> {
    let mut ledger = SurchargeLedger::new();
    let mut states = Vec::with_capacity(strategy.months.len());
    for month in &strategy.months {
        states.push(ledger.clone());
        if let Decision::Deliver(c) = &month.decision {
            let (dest, _) = pricer.resolve(c.destination(), c.buyer())?;
            ledger.record(dest, month.month, &pricer.config().contract.vessel_flag);
        }
    }
    Ok(states)
}
