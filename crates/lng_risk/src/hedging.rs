//! Futures hedging overlay.
//!
//! A hedge on factor `f` with ratio `h` and timing offset `k` months locks,
//! for each delivery month `m`, the price of `f` observed `k` months before
//! delivery. Per path
//!
//! ```text
//! hedged = unhedged - h * Σ_m delta_m * (S_m - lock_m)
//! ```
//!
//! where `delta_m` is the strategy's P&L sensitivity to `f` in month `m`
//! (central finite difference through the pricer at the forecast, forward
//! difference when the forecast is too close to zero to bump down), `S_m` is
//! the simulated price at delivery and `lock_m` is the forecast when the lock
//! date falls before the first simulated step, otherwise the simulated price
//! at the lock step.

use crate::error::RiskError;
use crate::mc::{replay_ledgers, FactorPath};
use lng_config::HedgeSettings;
use lng_core::types::{DeliveryMonth, PriceFactor};
use lng_optimiser::{Decision, Strategy};
use lng_pricing::{CargoPricer, CargoRequest, ForecastSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Relative bump for the finite-difference delta.
pub const DELTA_BUMP_RELATIVE: f64 = 1e-4;

/// Hedge instrument, ratio and timing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HedgeSpec {
    /// Hedged factor
    pub factor: PriceFactor,
    /// Fraction of exposure hedged
    pub ratio: f64,
    /// Months before delivery the hedge price is locked
    pub timing_offset_months: u32,
}

impl HedgeSpec {
    /// Creates a validated specification.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when the factor is not simulated (FX) or the ratio
    /// lies outside `[0, 1]`.
    pub fn new(factor: PriceFactor, ratio: f64, timing_offset_months: u32) -> Result<Self, RiskError> {
        if factor.stochastic_index().is_none() {
            return Err(RiskError::invalid(
                "hedge.factor",
                format!("{} is not simulated", factor),
            ));
        }
        if !(0.0..=1.0).contains(&ratio) {
            return Err(RiskError::invalid(
                "hedge.ratio",
                format!("must lie in [0, 1], got {}", ratio),
            ));
        }
        Ok(Self {
            factor,
            ratio,
            timing_offset_months,
        })
    }

    /// From configuration.
    pub fn from_settings(settings: &HedgeSettings) -> Result<Self, RiskError> {
        Self::new(settings.factor, settings.ratio, settings.timing_offset_months)
    }
}

/// Exposure of one delivery month to the hedged factor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthExposure {
    /// Delivery month
    pub month: DeliveryMonth,
    /// Simulation step of the month (1 for the first delivery month)
    pub step: i64,
    /// Forecast of the hedged factor
    pub forecast: f64,
    /// dP&L / dprice
    pub delta: f64,
}

/// Hedge overlay for one strategy.
#[derive(Clone, Debug, PartialEq)]
pub struct HedgeOverlay {
    spec: HedgeSpec,
    exposures: Vec<MonthExposure>,
}

impl HedgeOverlay {
    /// Measures the strategy's exposure to the hedged factor.
    ///
    /// Cancelled months carry no exposure.
    pub fn new(
        spec: HedgeSpec,
        pricer: &CargoPricer<'_>,
        strategy: &Strategy,
        forecasts: &ForecastSet,
    ) -> Result<Self, RiskError> {
        let Some(first) = strategy.months.first().map(|m| m.month) else {
            return Ok(Self {
                spec,
                exposures: Vec::new(),
            });
        };
        let ledgers = replay_ledgers(pricer, strategy)?;

        let mut exposures = Vec::with_capacity(strategy.months.len());
        for (decision, ledger) in strategy.months.iter().zip(&ledgers) {
            let inputs = forecasts.inputs(decision.month)?;
            let forecast = inputs.get(spec.factor);
            let delta = match &decision.decision {
                Decision::Cancel { .. } => 0.0,
                Decision::Deliver(c) => {
                    let request = CargoRequest {
                        month: decision.month,
                        destination: c.destination().clone(),
                        buyer: c.buyer().clone(),
                        purchase_volume: c.pnl.purchase_volume,
                    };
                    let h = (forecast * DELTA_BUMP_RELATIVE).max(1e-8);
                    let up = pricer.price(&request, &inputs.map(spec.factor, |v| v + h), ledger)?;
                    if forecast - h < 0.0 {
                        // a down bump would leave the valid price domain
                        let base = pricer.price(&request, &inputs, ledger)?;
                        (up.net_pnl - base.net_pnl) / h
                    } else {
                        let down =
                            pricer.price(&request, &inputs.map(spec.factor, |v| v - h), ledger)?;
                        (up.net_pnl - down.net_pnl) / (2.0 * h)
                    }
                }
            };
            debug!(month = %decision.month, factor = %spec.factor, delta, "hedge exposure");
            exposures.push(MonthExposure {
                month: decision.month,
                step: decision.month.months_since(&first) as i64 + 1,
                forecast,
                delta,
            });
        }
        Ok(Self { spec, exposures })
    }

    /// Hedge specification.
    pub fn spec(&self) -> &HedgeSpec {
        &self.spec
    }

    /// Per-month exposures.
    pub fn exposures(&self) -> &[MonthExposure] {
        &self.exposures
    }

    /// Unscaled hedge gain on a path: `Σ delta * (S - lock)`.
    pub fn payoff(&self, path: &FactorPath) -> f64 {
        let offset = self.spec.timing_offset_months as i64;
        self.exposures
            .iter()
            .map(|e| {
                let spot = e.forecast * path.log_shock(e.step, self.spec.factor).exp();
                let lock = e.forecast * path.log_shock(e.step - offset, self.spec.factor).exp();
                e.delta * (spot - lock)
            })
            .sum()
    }

    /// Applies the hedge to an unhedged distribution, path by path.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when the two slices differ in length.
    pub fn apply(&self, unhedged: &[f64], payoffs: &[f64]) -> Result<Vec<f64>, RiskError> {
        hedge_distribution(unhedged, payoffs, self.spec.ratio)
    }
}

/// `unhedged[p] - ratio * payoffs[p]` for every path.
///
/// # Examples
///
/// ```
/// use lng_risk::hedging::hedge_distribution;
///
/// let unhedged = [1.0, -2.0, 3.0];
/// let payoffs = [0.5, -1.0, 4.0];
/// assert_eq!(hedge_distribution(&unhedged, &payoffs, 0.0).unwrap(), unhedged);
/// assert_eq!(
///     hedge_distribution(&unhedged, &payoffs, 0.5).unwrap(),
///     vec![0.75, -1.5, 1.0]
/// );
/// ```
pub fn hedge_distribution(unhedged: &[f64], payoffs: &[f64], ratio: f64) -> Result<Vec<f64>, RiskError> {
    if unhedged.len() != payoffs.len() {
        return Err(RiskError::invalid(
            "payoffs",
            format!("{} payoffs for {} paths", payoffs.len(), unhedged.len()),
        ));
    }
    if ratio == 0.0 {
        return Ok(unhedged.to_vec());
    }
    Ok(unhedged
        .iter()
        .zip(payoffs)
        .map(|(u, h)| u - ratio * h)
        .collect())
}
