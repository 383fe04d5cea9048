//! Monte Carlo run configuration.

use crate::error::RiskError;
use lng_config::{AnalysisSettings, MAX_MC_PATHS};

/// Run parameters for the Monte Carlo engine.
///
/// # Examples
///
/// ```rust
/// use lng_risk::mc::MonteCarloConfig;
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(2_000)
///     .seed(7)
///     .build()
///     .unwrap();
/// assert_eq!(config.n_paths(), 2_000);
/// assert_eq!(config.confidence(), 0.95);
///
/// assert!(MonteCarloConfig::builder().n_paths(0).build().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonteCarloConfig {
    n_paths: usize,
    seed: u64,
    confidence: f64,
    risk_free_pnl: f64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            n_paths: 10_000,
            seed: 42,
            confidence: 0.95,
            risk_free_pnl: 0.0,
        }
    }
}

impl MonteCarloConfig {
    /// Creates a new builder.
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Builds from the analysis section of a trading configuration.
    pub fn from_settings(settings: &AnalysisSettings) -> Result<Self, RiskError> {
        Self::builder()
            .n_paths(settings.mc_paths)
            .seed(settings.seed)
            .confidence(settings.confidence)
            .risk_free_pnl(settings.risk_free_pnl)
            .build()
    }

    /// Validates parameter ranges.
    pub fn validate(&self) -> Result<(), RiskError> {
        if self.n_paths == 0 || self.n_paths > MAX_MC_PATHS {
            return Err(RiskError::invalid(
                "n_paths",
                format!("must be in 1..={}, got {}", MAX_MC_PATHS, self.n_paths),
            ));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(RiskError::invalid(
                "confidence",
                format!("must lie in (0, 1), got {}", self.confidence),
            ));
        }
        if !self.risk_free_pnl.is_finite() {
            return Err(RiskError::invalid("risk_free_pnl", "must be finite"));
        }
        Ok(())
    }

    /// Number of paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Base seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// VaR/CVaR confidence level.
    #[inline]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Benchmark P&L for the Sharpe ratio.
    #[inline]
    pub fn risk_free_pnl(&self) -> f64 {
        self.risk_free_pnl
    }
}

/// Builder for [`MonteCarloConfig`].
#[derive(Debug, Default)]
pub struct MonteCarloConfigBuilder {
    n_paths: Option<usize>,
    seed: Option<u64>,
    confidence: Option<f64>,
    risk_free_pnl: Option<f64>,
}

impl MonteCarloConfigBuilder {
    /// Sets the path count (default: 10,000).
    pub fn n_paths(mut self, n: usize) -> Self {
        self.n_paths = Some(n);
        self
    }

    /// Sets the base seed (default: 42).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the confidence level (default: 0.95).
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Sets the Sharpe benchmark P&L (default: 0).
    pub fn risk_free_pnl(mut self, pnl: f64) -> Self {
        self.risk_free_pnl = Some(pnl);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when the path count is outside 1..=10,000,000 or
    /// the confidence is outside (0, 1).
    pub fn build(self) -> Result<MonteCarloConfig, RiskError> {
        let defaults = MonteCarloConfig::default();
        let config = MonteCarloConfig {
            n_paths: self.n_paths.unwrap_or(defaults.n_paths),
            seed: self.seed.unwrap_or(defaults.seed),
            confidence: self.confidence.unwrap_or(defaults.confidence),
            risk_free_pnl: self.risk_free_pnl.unwrap_or(defaults.risk_free_pnl),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_bounds() {
        assert!(MonteCarloConfig::builder().n_paths(1).build().is_ok());
        assert!(MonteCarloConfig::builder()
            .n_paths(MAX_MC_PATHS)
            .build()
            .is_ok());
        assert!(matches!(
            MonteCarloConfig::builder().n_paths(MAX_MC_PATHS + 1).build(),
            Err(RiskError::InvalidParameter { name: "n_paths", .. })
        ));
    }

    #[test]
    fn test_confidence_bounds() {
        assert!(MonteCarloConfig::builder().confidence(1.0).build().is_err());
        assert!(MonteCarloConfig::builder().confidence(0.0).build().is_err());
        assert!(MonteCarloConfig::builder().confidence(0.99).build().is_ok());
    }

    #[test]
    fn test_from_settings() {
        let settings = lng_config::reference_config().analysis;
        let config = MonteCarloConfig::from_settings(&settings).unwrap();
        assert_eq!(config.n_paths(), settings.mc_paths);
        assert_eq!(config.seed(), settings.seed);
    }
}
