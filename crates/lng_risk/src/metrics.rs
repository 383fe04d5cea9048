//! Risk metrics of a P&L distribution.

use crate::error::RiskError;
use lng_core::math::statistics::{mean, quantile_sorted, sample_std_dev, sorted};
use serde::{Deserialize, Serialize};

/// Summary statistics of simulated strategy P&L (USD).
///
/// VaR is the empirical `(1 - confidence)` quantile of P&L, so a loss shows
/// as a negative number, and CVaR averages the outcomes at or below it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Number of paths
    pub n_paths: usize,
    /// Mean P&L
    pub mean: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Value at risk (P&L quantile)
    pub var: f64,
    /// Conditional value at risk
    pub cvar: f64,
    /// `(mean - benchmark) / std_dev`; zero for a degenerate distribution
    pub sharpe: f64,
    /// Share of paths with positive P&L
    pub probability_of_profit: f64,
    /// Confidence level
    pub confidence: f64,
}

impl RiskMetrics {
    /// Computes metrics from per-path P&L.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for an empty sample or a confidence outside (0, 1).
    ///
    /// # Examples
    ///
    /// ```
    /// use lng_risk::RiskMetrics;
    ///
    /// let pnl: Vec<f64> = (1..=100).map(|i| i as f64 - 20.0).collect();
    /// let m = RiskMetrics::from_pnl(&pnl, 0.95, 0.0).unwrap();
    /// assert_eq!(m.var, -15.0);
    /// assert!(m.cvar <= m.var);
    /// assert_eq!(m.probability_of_profit, 0.8);
    /// ```
    pub fn from_pnl(pnl: &[f64], confidence: f64, risk_free_pnl: f64) -> Result<Self, RiskError> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(RiskError::invalid(
                "confidence",
                format!("must lie in (0, 1), got {}", confidence),
            ));
        }
        let ordered = sorted(pnl);
        let var = quantile_sorted(&ordered, 1.0 - confidence)
            .ok_or_else(|| RiskError::invalid("pnl", "empty sample"))?;
        let tail: Vec<f64> = ordered.iter().copied().take_while(|v| *v <= var).collect();
        let cvar = mean(&tail);

        let mu = mean(pnl);
        let std_dev = sample_std_dev(pnl);
        let sharpe = if std_dev > 0.0 {
            (mu - risk_free_pnl) / std_dev
        } else {
            0.0
        };
        let profitable = pnl.iter().filter(|v| **v > 0.0).count();

        Ok(Self {
            n_paths: pnl.len(),
            mean: mu,
            std_dev,
            var,
            cvar,
            sharpe,
            probability_of_profit: profitable as f64 / pnl.len() as f64,
            confidence,
        })
    }
}
