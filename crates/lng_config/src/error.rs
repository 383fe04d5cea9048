//! Configuration error type.

use chrono::NaiveDate;
use lng_core::types::{BuyerId, DestinationId};
use thiserror::Error;

/// Errors raised while loading or validating a [`crate::TradingConfig`].
///
/// Any of these aborts the run before pricing starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// IO error reading a config file
    #[error("IO error: {0}")]
    Io(String),

    /// TOML parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Buyer references a destination that is not configured
    #[error("Buyer {buyer} references unknown destination {destination}")]
    UnknownDestination {
        /// Buyer with the dangling reference
        buyer: BuyerId,
        /// Destination that could not be found
        destination: DestinationId,
    },

    /// Strategy profile or option list references an unknown buyer
    #[error("{context} references unknown buyer {buyer}")]
    UnknownBuyer {
        /// Where the reference was found
        context: String,
        /// Buyer that could not be found
        buyer: BuyerId,
    },

    /// Identifier declared more than once
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId {
        /// Entity kind ("destination", "buyer", "strategy")
        kind: &'static str,
        /// Repeated identifier
        id: String,
    },

    /// Surcharge window whose start is after its end
    #[error("Surcharge window '{window}' at {destination} has start {start} after end {end}")]
    InvalidWindow {
        /// Destination carrying the window
        destination: DestinationId,
        /// Window name
        window: String,
        /// Window start
        start: NaiveDate,
        /// Window end
        end: NaiveDate,
    },

    /// Rate, volume or other scalar parameter out of range
    #[error("Invalid {name}: {reason}")]
    InvalidParameter {
        /// Parameter path, e.g. `contract.boil_off_rate`
        name: String,
        /// Why it is invalid
        reason: String,
    },

    /// One or more problems found by `validate()`
    #[error("Validation errors: {}", join(.0))]
    Validation(Vec<ConfigurationError>),
}

impl ConfigurationError {
    /// Create an invalid-parameter error
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Individual problems, flattening a `Validation` list.
    pub fn problems(&self) -> Vec<&ConfigurationError> {
        match self {
            Self::Validation(list) => list.iter().flat_map(|e| e.problems()).collect(),
            other => vec![other],
        }
    }
}

fn join(errors: &[ConfigurationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
