//! # lng_pricing: Cargo Pricing (L2: Business Logic)
//!
//! Deterministic single-cargo P&L and the market inputs it consumes.
//!
//! This crate provides:
//! - [`PriceInputs`]: the per-cargo price snapshot
//! - [`ForecastSet`] and [`MarketInput`]: monthly forecasts loaded from TOML
//! - [`FactorModel`]: repaired covariance and Cholesky factor of the four
//!   stochastic factors
//! - [`SurchargeLedger`]: capped surcharge call counters
//! - [`CargoPricer`]: the itemised P&L engine
//!
//! ## Design Principles
//!
//! - **Pure pricing**: the engine borrows configuration and ledger
//!   immutably; only the optimiser mutates the ledger on commit
//! - **Typed failures**: invalid requests return [`PricingError`] rather than
//!   non-finite numbers
//!
//! ## Example
//!
//! ```
//! use lng_config::reference_config;
//! use lng_core::types::{BuyerId, DeliveryMonth, DestinationId};
//! use lng_pricing::{reference_market, CargoPricer, CargoRequest, SurchargeLedger};
//!
//! let config = reference_config();
//! let forecasts = reference_market().forecast_set().unwrap();
//! let month = DeliveryMonth::new(2025, 11).unwrap();
//!
//! let pnl = CargoPricer::new(&config)
//!     .price(
//!         &CargoRequest {
//!             month,
//!             destination: DestinationId::new("Singapore"),
//!             buyer: BuyerId::new("SG-Utility"),
//!             purchase_volume: 3_800_000.0,
//!         },
//!         &forecasts.inputs(month).unwrap(),
//!         &SurchargeLedger::new(),
//!     )
//!     .unwrap();
//! let identity = pnl.revenue - pnl.purchase_cost - pnl.freight.total() - pnl.credit_loss;
//! assert!((pnl.net_pnl - identity).abs() < 1e-6);
//! ```
//!
//! [`PricingError`]: lng_core::types::PricingError

#![deny(missing_docs)]

pub mod engine;
pub mod error;
pub mod factor_model;
pub mod inputs;
pub mod ledger;
pub mod market;

pub use engine::{arrival_volume, CargoPricer, CargoRequest, FreightBreakdown, PnlBreakdown};
pub use error::MarketDataError;
pub use factor_model::{FactorModel, N_FACTORS};
pub use inputs::PriceInputs;
pub use ledger::SurchargeLedger;
pub use market::{
    reference_market, FactorModelSpec, ForecastRow, ForecastSet, MarketInput, PriceHistory,
};
