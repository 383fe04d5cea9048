//! # lng_config: Trading Configuration (Infra Layer)
//!
//! Static inputs of a run, loaded once and borrowed immutably by the pricing,
//! optimisation and risk layers:
//!
//! - `destination`: discharge markets, price linkage, fees, carbon, surcharge windows
//! - `buyer`: counterparties and their credit terms
//! - `contract`: supply contract terms, voyage cost parameters, demand and
//!   stranded-volume policies, embedded option terms
//! - `strategy`: named strategy profiles (buyer filter + volume policy)
//! - `trading`: the aggregate [`TradingConfig`] with TOML loading,
//!   `LNGDESK_*` environment overrides and validation
//! - `reference`: an illustrative Singapore/Japan/China data set
//!
//! ## Usage
//!
//! ```
//! use lng_config::{reference_config, TradingConfig};
//!
//! let config = reference_config();
//! config.validate().unwrap();
//!
//! let text = config.to_toml_string().unwrap();
//! let reloaded = TradingConfig::from_toml_str(&text).unwrap();
//! assert_eq!(reloaded.buyers.len(), 6);
//! ```

#![warn(missing_docs)]

pub mod buyer;
pub mod contract;
pub mod destination;
pub mod error;
pub mod reference;
pub mod strategy;
pub mod trading;

pub use buyer::{Buyer, CreditTableEntry, CreditTerms};
pub use contract::{
    ContractTerms, CostParameters, DemandModel, Demurrage, EmbeddedOptionTerms,
    StrandedVolumePolicy, VolumeBounds, VOLUME_TOLERANCE,
};
pub use destination::{CarbonCharge, Destination, FeeSchedule, PriceLinkage, SurchargeWindow};
pub use error::ConfigurationError;
pub use reference::reference_config;
pub use strategy::{BuyerFilter, StrategyProfile, VolumePolicy};
pub use trading::{AnalysisSettings, HedgeSettings, TradingConfig, MAX_MC_PATHS, MAX_VOYAGE_DAYS};
