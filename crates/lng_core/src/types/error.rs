//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors from single-cargo pricing
//! - `ConstraintViolation`: Contract or eligibility rules broken by a candidate
//! - `NumericalError`: Failures in factor-model linear algebra
//! - `DateError`: Errors from month construction and parsing
//!
//! Every variant carries enough context (month, destination, buyer, input) to
//! be actionable without re-running the computation.

use super::factor::PriceFactor;
use super::ids::{BuyerId, DestinationId};
use super::month::DeliveryMonth;
use thiserror::Error;

/// Errors raised while pricing one cargo.
///
/// These abort the enclosing strategy evaluation; the engine never substitutes
/// a default for a missing or invalid input.
///
/// # Examples
/// ```
/// use lng_core::types::{DeliveryMonth, PriceFactor, PricingError};
///
/// let err = PricingError::MissingForecast {
///     month: DeliveryMonth::new(2026, 1).unwrap(),
///     factor: PriceFactor::Jkm,
/// };
/// assert_eq!(format!("{}", err), "Missing JKM forecast for 2026-01");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// No forecast is available for a required month and factor.
    #[error("Missing {factor} forecast for {month}")]
    MissingForecast {
        /// Month the price was required for
        month: DeliveryMonth,
        /// Factor that was missing
        factor: PriceFactor,
    },

    /// A price input is negative or non-finite.
    #[error("Invalid {factor} price {value} for {month}")]
    InvalidPrice {
        /// Month of the invalid price
        month: DeliveryMonth,
        /// Offending factor
        factor: PriceFactor,
        /// Offending value
        value: f64,
    },

    /// A computed or requested volume is negative.
    #[error("Negative volume {volume} for {month} ({destination}/{buyer})")]
    NegativeVolume {
        /// Delivery month
        month: DeliveryMonth,
        /// Destination of the cargo
        destination: DestinationId,
        /// Buyer of the cargo
        buyer: BuyerId,
        /// Offending volume (MMBtu)
        volume: f64,
    },

    /// Destination is not part of the configuration.
    #[error("Unknown destination: {0}")]
    UnknownDestination(DestinationId),

    /// Buyer is not part of the configuration.
    #[error("Unknown buyer: {0}")]
    UnknownBuyer(BuyerId),

    /// Buyer was priced against a destination it is not affiliated with.
    #[error("Buyer {buyer} trades only at {affiliated}, not {destination}")]
    BuyerDestinationMismatch {
        /// Buyer requested
        buyer: BuyerId,
        /// Destination the buyer is affiliated with
        affiliated: DestinationId,
        /// Destination requested
        destination: DestinationId,
    },

    /// A contract constraint failed during pricing.
    #[error("Constraint violated: {0}")]
    Constraint(#[from] ConstraintViolation),
}

/// Contract or eligibility rules broken by a candidate cargo.
///
/// Raised while building the option universe; the offending candidate is
/// excluded from consideration rather than corrected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintViolation {
    /// Purchase volume lies outside the purchase contract bounds.
    #[error("Purchase volume {volume} outside [{min}, {max}]")]
    PurchaseVolumeOutOfBounds {
        /// Requested purchase volume
        volume: f64,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Arrival volume is below the sales contract minimum.
    #[error("Arrival volume {volume} below sales minimum {min}")]
    SalesVolumeBelowMinimum {
        /// Arrival volume
        volume: f64,
        /// Sales contract minimum
        min: f64,
    },

    /// Arrival volume exceeds the sales maximum and stranded volume is rejected.
    #[error("Stranded volume {excess} above sales maximum {max}")]
    StrandedVolume {
        /// Volume above the sales maximum
        excess: f64,
        /// Sales contract maximum
        max: f64,
    },

    /// Buyer is not affiliated with the destination.
    #[error("Buyer {buyer} is not affiliated with {destination}")]
    BuyerDestinationMismatch {
        /// Buyer
        buyer: BuyerId,
        /// Destination
        destination: DestinationId,
    },

    /// Buyer notice period cannot be met for this month.
    #[error("Buyer {buyer} needs {required} months notice, {available} available")]
    LeadTime {
        /// Buyer
        buyer: BuyerId,
        /// Months of notice the buyer requires
        required: u32,
        /// Months between the decision date and delivery
        available: i32,
    },

    /// Buyer is excluded by the strategy's eligibility filter.
    #[error("Buyer {buyer} ineligible: {reason}")]
    IneligibleBuyer {
        /// Buyer
        buyer: BuyerId,
        /// Reason for exclusion
        reason: String,
    },

    /// More embedded options exercised than the contract permits.
    #[error("Exercise count {requested} exceeds cap {cap}")]
    ExerciseCapExceeded {
        /// Number requested
        requested: usize,
        /// Contractual cap
        cap: usize,
    },
}

/// Numerical failures in the factor model.
///
/// Fatal for the Monte Carlo engine only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericalError {
    /// Input has the wrong size.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Matrix is not symmetric within tolerance.
    #[error("Matrix not symmetric at ({row}, {col})")]
    NotSymmetric {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
    },

    /// Matrix is not positive semi-definite after repair.
    #[error("Matrix not positive semi-definite (min eigenvalue {min_eigenvalue})")]
    NotPositiveSemiDefinite {
        /// Smallest eigenvalue found
        min_eigenvalue: f64,
    },

    /// Cholesky factorisation hit a negative pivot.
    #[error("Cholesky factorisation failed at pivot {pivot}")]
    CholeskyFailed {
        /// Pivot index
        pivot: usize,
    },

    /// Invalid numerical input.
    #[error("Invalid {name}: {reason}")]
    InvalidInput {
        /// Name of the input
        name: &'static str,
        /// Why it is invalid
        reason: String,
    },

    /// Not enough observations for estimation.
    #[error("Insufficient data: got {got} observations, need {need}")]
    InsufficientData {
        /// Observations available
        got: usize,
        /// Observations required
        need: usize,
    },
}

/// Month construction and parsing errors.
///
/// # Examples
/// ```
/// use lng_core::types::DateError;
///
/// let err = DateError::InvalidMonth { year: 2025, month: 13 };
/// assert_eq!(format!("{}", err), "Invalid month: 2025-13");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Month component outside 1..=12 or year out of range.
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth {
        /// Year component
        year: i32,
        /// Month component
        month: u32,
    },

    /// Failed to parse a month string.
    #[error("Month parse error: {0}")]
    ParseError(String),
}
