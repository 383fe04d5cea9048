//! # lng_optimiser
//!
//! Monthly routing decisions and embedded option valuation.
//!
//! ## Architecture Position
//!
//! Sits on top of `lng_pricing` (L2) in the **P**ricer layer. Every decision
//! is a pure function of the configuration, the forecasts and the surcharge
//! ledger threaded through the schedule.
//!
//! ## Modules
//!
//! - `strategy`: per-month option universe, multiplier search, pair
//!   tie-breaks and the cancel-or-deliver rule
//! - `embedded`: extra-cargo options ranked by value under a cap
//!
//! ## Example
//!
//! ```
//! use lng_config::reference_config;
//! use lng_optimiser::{EmbeddedOptionValuer, StrategyOptimiser};
//! use lng_pricing::reference_market;
//!
//! let config = reference_config();
//! let forecasts = reference_market().forecast_set().unwrap();
//!
//! let strategies = StrategyOptimiser::new(&config, &forecasts)
//!     .optimise_all()
//!     .unwrap();
//! assert_eq!(strategies.len(), 3);
//!
//! let options = EmbeddedOptionValuer::new(&config, &forecasts)
//!     .value(&strategies[0])
//!     .unwrap();
//! assert!(options.exercised().count() <= config.embedded_options.cap);
//! ```

#![deny(missing_docs)]

pub mod embedded;
pub mod strategy;

mod error;

pub use embedded::{EmbeddedOption, EmbeddedOptionReport, EmbeddedOptionValuer};
pub use error::OptimiserError;
pub use strategy::{
    Candidate, Decision, Exclusion, MonthlyDecision, Strategy, StrategyOptimiser, TIE_TOLERANCE,
};
