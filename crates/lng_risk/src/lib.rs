//! # lng_risk: Risk Analysis (L3)
//!
//! Consumes the pricing engine and optimiser to measure strategy risk.
//!
//! ## Modules
//!
//! - [`mc`]: correlated Monte Carlo with per-path seeding and rayon
//!   parallelism; fixed decisions are re-priced on every path
//! - [`metrics`]: mean, standard deviation, VaR, CVaR, Sharpe and
//!   probability of profit
//! - [`hedging`]: futures hedge overlay on the simulated distribution
//! - [`scenarios`]: preset shocks, re-optimisation and tornado sensitivity
//! - [`analysis`]: the end-to-end run producing an [`AnalysisReport`]
//!
//! ## Determinism
//!
//! Path `p` draws from its own `StdRng` seeded from the base seed and `p`, so
//! a run is reproducible for a fixed seed regardless of thread count.
//!
//! ## Example
//!
//! ```
//! use lng_config::reference_config;
//! use lng_optimiser::StrategyOptimiser;
//! use lng_pricing::{reference_market, FactorModel};
//! use lng_risk::mc::{MonteCarloConfig, MonteCarloEngine};
//!
//! let config = reference_config();
//! let market = reference_market();
//! let forecasts = market.forecast_set().unwrap();
//! let strategies = StrategyOptimiser::new(&config, &forecasts)
//!     .optimise_all()
//!     .unwrap();
//!
//! let model = FactorModel::from_spec(&market.factor_model).unwrap();
//! let mc = MonteCarloConfig::builder().n_paths(500).seed(1).build().unwrap();
//! let report = MonteCarloEngine::new(&config, &forecasts, model, mc)
//!     .run(&strategies, None)
//!     .unwrap();
//! for s in &report.strategies {
//!     assert!(s.unhedged.cvar <= s.unhedged.var);
//! }
//! ```

#![deny(missing_docs)]

pub mod analysis;
pub mod hedging;
pub mod mc;
pub mod metrics;
pub mod scenarios;

mod error;

pub use analysis::{run_analysis, AnalysisReport, MonteCarloOutcome, StrategySummary};
pub use error::RiskError;
pub use hedging::{HedgeOverlay, HedgeSpec};
pub use metrics::RiskMetrics;
