//! Risk layer error types.

use lng_core::types::{NumericalError, PricingError};
use lng_optimiser::OptimiserError;
use lng_pricing::MarketDataError;
use thiserror::Error;

/// Errors raised by the Monte Carlo engine, hedging overlay and scenario
/// analyzer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// Factor model failure; Monte Carlo is unavailable
    #[error("Numerical error: {0}")]
    Numerical(#[from] NumericalError),

    /// Re-optimisation failed
    #[error("Optimiser error: {0}")]
    Optimiser(#[from] OptimiserError),

    /// Re-pricing a path or bump failed
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Market input could not be used
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    /// A run parameter is out of range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

impl RiskError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
