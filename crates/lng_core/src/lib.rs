//! # lng_core: Foundation Layer for the LNG Cargo Desk
//!
//! ## Layer 1 (Foundation) Role
//!
//! lng_core is the bottom layer of the workspace and provides:
//! - Identifier newtypes: `DestinationId`, `BuyerId` (`types::ids`)
//! - Calendar month arithmetic: `DeliveryMonth` (`types::month`)
//! - Market factor classification: `PriceFactor` (`types::factor`)
//! - Counterparty credit grades: `CreditRating` (`types::rating`)
//! - Error taxonomy: `PricingError`, `ConstraintViolation`, `NumericalError`,
//!   `DateError` (`types::error`)
//! - Dense symmetric linear algebra for factor models (`math::linalg`)
//! - Sample statistics used by the risk layer (`math::statistics`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other lng_* crates, with minimal external
//! dependencies:
//! - chrono: month and date arithmetic
//! - thiserror: error derives
//! - serde: serialisation support (optional, enabled by default)
//!
//! ## Usage Examples
//!
//! ```rust
//! use lng_core::types::{DeliveryMonth, PriceFactor};
//! use lng_core::math::linalg::CovarianceMatrix;
//!
//! let month: DeliveryMonth = "2025-11".parse().unwrap();
//! assert_eq!(month.next().to_string(), "2025-12");
//!
//! let cov = CovarianceMatrix::from_correlation(
//!     &[1.0, 0.5, 0.5, 1.0],
//!     &[0.4, 0.3],
//! )
//! .unwrap();
//! assert!((cov.get(0, 1) - 0.06).abs() < 1e-12);
//! assert_eq!(PriceFactor::STOCHASTIC.len(), 4);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for identifiers, months, factors
//!   and ratings

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
