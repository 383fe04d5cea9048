//! CLI error type.

use lng_config::ConfigurationError;
use lng_core::types::NumericalError;
use lng_pricing::MarketDataError;
use lng_risk::RiskError;
use thiserror::Error;

/// Errors surfaced by `lngdesk` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration failed to load or validate
    #[error(transparent)]
    Config(#[from] ConfigurationError),

    /// Market file failed to load or is inconsistent
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    /// Factor model could not be built
    #[error("Factor model error: {0}")]
    Numerical(#[from] NumericalError),

    /// Analysis run failed
    #[error(transparent)]
    Risk(#[from] RiskError),

    /// Report could not be encoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Report could not be written
    #[error("Cannot write {path}: {source}")]
    Io {
        /// Output path
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Inputs loaded but do not cover the run
    #[error("{} problem(s) found:\n  {}", .0.len(), .0.join("\n  "))]
    Incomplete(Vec<String>),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
