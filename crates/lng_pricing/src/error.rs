//! Market data loading errors.

use lng_core::types::{DeliveryMonth, NumericalError, PricingError};
use thiserror::Error;

/// Errors raised while loading a market input file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketDataError {
    /// IO error reading the file
    #[error("IO error: {0}")]
    Io(String),

    /// TOML parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// The same month appears twice in the forecast table
    #[error("Duplicate forecast row for {0}")]
    DuplicateMonth(DeliveryMonth),

    /// A forecast value is invalid
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The factor model could not be built
    #[error("Factor model error: {0}")]
    Numerical(#[from] NumericalError),
}
