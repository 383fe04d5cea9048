//! Core domain types.
//!
//! This module provides:
//! - `ids`: Strongly-typed identifiers for destinations and buyers
//! - `month`: `DeliveryMonth`, a validated calendar month
//! - `factor`: `PriceFactor`, the market variables the desk is exposed to
//! - `rating`: `CreditRating` with indicative default/recovery mapping
//! - `error`: Structured error types for pricing, constraints and numerics
//!
//! # Re-exports
//!
//! Commonly used types are re-exported at this module level.

pub mod error;
pub mod factor;
pub mod ids;
pub mod month;
pub mod rating;

pub use error::{ConstraintViolation, DateError, NumericalError, PricingError};
pub use factor::PriceFactor;
pub use ids::{BuyerId, DestinationId};
pub use month::DeliveryMonth;
pub use rating::CreditRating;
