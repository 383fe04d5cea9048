//! Correlated Monte Carlo risk engine.
//!
//! - `config`: path count, seed, confidence and Sharpe benchmark
//! - `paths`: per-path seeded correlated log-shocks
//! - `engine`: re-pricing of fixed strategy decisions and metric extraction

mod config;
mod engine;
mod paths;

pub use config::{MonteCarloConfig, MonteCarloConfigBuilder};
pub use engine::{
    replay_ledgers, replay_pnl, MonteCarloEngine, MonteCarloReport, StrategyDistribution,
    StrategyRisk,
};
pub use paths::{path_seed, FactorPath, PathGenerator, DT};
