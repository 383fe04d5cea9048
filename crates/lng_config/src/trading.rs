//! The immutable trading configuration.
//!
//! Handles loading of [`TradingConfig`] from TOML files with environment
//! variable override support, and validation of the buyer-destination
//! relation, fee windows and rate parameters before any pricing begins.

use crate::buyer::{resolve_credit, Buyer, CreditTableEntry, CreditTerms};
use crate::contract::{
    ContractTerms, CostParameters, DemandModel, EmbeddedOptionTerms, StrandedVolumePolicy,
};
use crate::destination::Destination;
use crate::error::ConfigurationError;
use crate::strategy::{StrategyProfile, VolumePolicy};
use lng_core::types::{BuyerId, DeliveryMonth, DestinationId, PriceFactor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Upper bound on Monte Carlo paths.
pub const MAX_MC_PATHS: usize = 10_000_000;

/// Longest voyage accepted for a destination, in days.
pub const MAX_VOYAGE_DAYS: u32 = 365;

/// Futures hedge applied on top of the Monte Carlo distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HedgeSettings {
    /// Hedged factor; must be simulated
    pub factor: PriceFactor,
    /// Fraction of the exposure hedged, in [0, 1]
    pub ratio: f64,
    /// Months before delivery at which the hedge price is locked
    #[serde(default)]
    pub timing_offset_months: u32,
}

/// Run settings for the risk layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Monte Carlo path count
    #[serde(default = "default_mc_paths")]
    pub mc_paths: usize,

    /// Monte Carlo seed
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// VaR/CVaR confidence level
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// Benchmark P&L subtracted in the Sharpe ratio
    #[serde(default)]
    pub risk_free_pnl: f64,

    /// Relative bump used by the tornado analysis
    #[serde(default = "default_tornado_pct")]
    pub tornado_pct: f64,

    /// Optional hedge overlay
    #[serde(default)]
    pub hedge: Option<HedgeSettings>,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_mc_paths() -> usize {
    10_000
}

fn default_seed() -> u64 {
    42
}

fn default_confidence() -> f64 {
    0.95
}

fn default_tornado_pct() -> f64 {
    0.10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            mc_paths: default_mc_paths(),
            seed: default_seed(),
            confidence: default_confidence(),
            risk_free_pnl: 0.0,
            tornado_pct: default_tornado_pct(),
            hedge: None,
            log_level: default_log_level(),
        }
    }
}

/// Every static input of a run.
///
/// Loaded once, validated, then borrowed immutably by every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Supply contract terms
    pub contract: ContractTerms,
    /// Voyage cost parameters
    pub costs: CostParameters,
    /// Destination markets
    pub destinations: Vec<Destination>,
    /// Buyers
    pub buyers: Vec<Buyer>,
    /// Rating to credit-terms overrides
    #[serde(default)]
    pub credit_table: Vec<CreditTableEntry>,
    /// Strategy profiles; the reference set when empty
    #[serde(default)]
    pub strategies: Vec<StrategyProfile>,
    /// Embedded option terms
    #[serde(default)]
    pub embedded_options: EmbeddedOptionTerms,
    /// Demand treatment
    #[serde(default)]
    pub demand_model: DemandModel,
    /// Stranded-volume treatment
    #[serde(default)]
    pub stranded_volume_policy: StrandedVolumePolicy,
    /// Risk-layer settings
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

impl TradingConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(content).map_err(|e| ConfigurationError::Parse(e.to_string()))
    }

    /// Serialise to TOML text.
    pub fn to_toml_string(&self) -> Result<String, ConfigurationError> {
        toml::to_string_pretty(self).map_err(|e| ConfigurationError::Parse(e.to_string()))
    }

    /// Apply `LNGDESK_*` environment variable overrides.
    ///
    /// Recognised: `LNGDESK_MC_PATHS`, `LNGDESK_SEED`, `LNGDESK_LOG_LEVEL`.
    /// Unparseable numeric values are ignored with a warning.
    pub fn with_env_override(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (environment in production).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(paths) = lookup("LNGDESK_MC_PATHS") {
            match paths.parse() {
                Ok(n) => self.analysis.mc_paths = n,
                Err(_) => warn!(value = %paths, "ignoring unparseable LNGDESK_MC_PATHS"),
            }
        }

        if let Some(seed) = lookup("LNGDESK_SEED") {
            match seed.parse() {
                Ok(s) => self.analysis.seed = s,
                Err(_) => warn!(value = %seed, "ignoring unparseable LNGDESK_SEED"),
            }
        }

        if let Some(level) = lookup("LNGDESK_LOG_LEVEL") {
            self.analysis.log_level = level;
        }

        self
    }

    /// Load configuration from file and validate
    pub fn load_and_validate(path: &Path) -> Result<Self, ConfigurationError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file with environment overrides and validate
    pub fn load_with_env_and_validate(path: &Path) -> Result<Self, ConfigurationError> {
        let config = Self::load(path)?.with_env_override();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration, collecting every problem found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut errors = Vec::new();

        self.validate_relations(&mut errors);
        self.validate_contract(&mut errors);
        self.validate_costs(&mut errors);
        self.validate_destinations(&mut errors);
        self.validate_buyers(&mut errors);
        self.validate_strategies(&mut errors);
        self.validate_analysis(&mut errors);

        if errors.is_empty() {
            debug!(
                destinations = self.destinations.len(),
                buyers = self.buyers.len(),
                "configuration validated"
            );
            Ok(())
        } else {
            Err(ConfigurationError::Validation(errors))
        }
    }

    fn validate_relations(&self, errors: &mut Vec<ConfigurationError>) {
        let mut seen = HashSet::new();
        for d in &self.destinations {
            if !seen.insert(d.id.as_str()) {
                errors.push(ConfigurationError::DuplicateId {
                    kind: "destination",
                    id: d.id.to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        for b in &self.buyers {
            if !seen.insert(b.id.as_str()) {
                errors.push(ConfigurationError::DuplicateId {
                    kind: "buyer",
                    id: b.id.to_string(),
                });
            }
            if self.destination(&b.destination).is_none() {
                errors.push(ConfigurationError::UnknownDestination {
                    buyer: b.id.clone(),
                    destination: b.destination.clone(),
                });
            }
        }

        if self.destinations.is_empty() {
            errors.push(ConfigurationError::invalid(
                "destinations",
                "at least one destination is required",
            ));
        }
        if self.buyers.is_empty() {
            errors.push(ConfigurationError::invalid(
                "buyers",
                "at least one buyer is required",
            ));
        }
    }

    fn validate_contract(&self, errors: &mut Vec<ConfigurationError>) {
        let c = &self.contract;
        if !(c.nominal_volume > 0.0) {
            errors.push(ConfigurationError::invalid(
                "contract.nominal_volume",
                "must be positive",
            ));
        }
        if c.volume_multipliers.is_empty() {
            errors.push(ConfigurationError::invalid(
                "contract.volume_multipliers",
                "at least one multiplier is required",
            ));
        }
        if c.volume_multipliers.iter().any(|m| !(*m > 0.0)) {
            errors.push(ConfigurationError::invalid(
                "contract.volume_multipliers",
                "multipliers must be positive",
            ));
        }
        for (name, bounds) in [
            ("contract.purchase_bounds", c.purchase_bounds),
            ("contract.sales_bounds", c.sales_bounds),
        ] {
            if !(bounds.min >= 0.0 && bounds.min <= bounds.max) {
                errors.push(ConfigurationError::invalid(
                    name,
                    format!("require 0 <= min <= max, got [{}, {}]", bounds.min, bounds.max),
                ));
            }
        }
        if !(0.0..1.0).contains(&c.boil_off_rate) {
            errors.push(ConfigurationError::invalid(
                "contract.boil_off_rate",
                format!("{} outside [0, 1)", c.boil_off_rate),
            ));
        }
        if c.tolling_fee < 0.0 {
            errors.push(ConfigurationError::invalid(
                "contract.tolling_fee",
                "must be non-negative",
            ));
        }
        if c.delivery_months == 0 {
            errors.push(ConfigurationError::invalid(
                "contract.delivery_months",
                "must be at least 1",
            ));
        }
        if c.decision_month > c.delivery_start {
            errors.push(ConfigurationError::invalid(
                "contract.decision_month",
                format!(
                    "{} is after first delivery {}",
                    c.decision_month, c.delivery_start
                ),
            ));
        }

        let terms = &self.embedded_options;
        if !(terms.volume_multiplier > 0.0) {
            errors.push(ConfigurationError::invalid(
                "embedded_options.volume_multiplier",
                "must be positive",
            ));
        }
    }

    fn validate_costs(&self, errors: &mut Vec<ConfigurationError>) {
        let k = &self.costs;
        for (name, value) in [
            ("costs.insurance_rate", k.insurance_rate),
            ("costs.brokerage_rate", k.brokerage_rate),
            ("costs.working_capital_rate", k.working_capital_rate),
            ("costs.lc_fee", k.lc_fee),
            ("costs.demurrage.expected_delay_days", k.demurrage.expected_delay_days),
            ("costs.demurrage.daily_rate", k.demurrage.daily_rate),
        ] {
            if !(value >= 0.0) {
                errors.push(ConfigurationError::invalid(name, "must be non-negative"));
            }
        }
        if !(0.0..=1.0).contains(&k.demurrage.probability) {
            errors.push(ConfigurationError::invalid(
                "costs.demurrage.probability",
                "must lie in [0, 1]",
            ));
        }
    }

    fn validate_destinations(&self, errors: &mut Vec<ConfigurationError>) {
        for d in &self.destinations {
            if d.voyage_days == 0 || d.voyage_days > MAX_VOYAGE_DAYS {
                errors.push(ConfigurationError::invalid(
                    format!("destinations.{}.voyage_days", d.id),
                    format!("{} not in [1, {}]", d.voyage_days, MAX_VOYAGE_DAYS),
                ));
            }
            if d.fees.terminal_tariff < 0.0 || d.fees.port_fee < 0.0 {
                errors.push(ConfigurationError::invalid(
                    format!("destinations.{}.fees", d.id),
                    "charges must be non-negative",
                ));
            }
            for (i, factor) in d.seasonal_demand.iter().enumerate() {
                let upper = match self.demand_model {
                    DemandModel::PriceAdjustment => f64::INFINITY,
                    DemandModel::ProbabilityOfSale => 1.0,
                };
                if !(*factor > 0.0 && *factor <= upper) {
                    errors.push(ConfigurationError::invalid(
                        format!("destinations.{}.seasonal_demand[{}]", d.id, i),
                        format!("{} not in (0, {}]", factor, upper),
                    ));
                }
            }

            let mut names = HashSet::new();
            for w in &d.surcharges {
                if w.start > w.end {
                    errors.push(ConfigurationError::InvalidWindow {
                        destination: d.id.clone(),
                        window: w.name.clone(),
                        start: w.start,
                        end: w.end,
                    });
                }
                if !names.insert(w.name.as_str()) {
                    errors.push(ConfigurationError::DuplicateId {
                        kind: "surcharge window",
                        id: format!("{}/{}", d.id, w.name),
                    });
                }
                if w.amount_per_call < 0.0 {
                    errors.push(ConfigurationError::invalid(
                        format!("destinations.{}.surcharges.{}", d.id, w.name),
                        "amount must be non-negative",
                    ));
                }
            }
        }
    }

    fn validate_buyers(&self, errors: &mut Vec<ConfigurationError>) {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        for b in &self.buyers {
            if b.default_probability.is_some_and(|p| !in_unit(p)) {
                errors.push(ConfigurationError::invalid(
                    format!("buyers.{}.default_probability", b.id),
                    "must lie in [0, 1]",
                ));
            }
            if b.recovery_rate.is_some_and(|r| !in_unit(r)) {
                errors.push(ConfigurationError::invalid(
                    format!("buyers.{}.recovery_rate", b.id),
                    "must lie in [0, 1]",
                ));
            }
        }
        for row in &self.credit_table {
            if !in_unit(row.default_probability) || !in_unit(row.recovery_rate) {
                errors.push(ConfigurationError::invalid(
                    format!("credit_table.{}", row.rating),
                    "probabilities must lie in [0, 1]",
                ));
            }
        }
    }

    fn validate_strategies(&self, errors: &mut Vec<ConfigurationError>) {
        let mut names = HashSet::new();
        for s in &self.strategies {
            if !names.insert(s.name.as_str()) {
                errors.push(ConfigurationError::DuplicateId {
                    kind: "strategy",
                    id: s.name.clone(),
                });
            }
            if let VolumePolicy::Fixed(m) = s.volume {
                if !(m > 0.0) {
                    errors.push(ConfigurationError::invalid(
                        format!("strategies.{}.volume", s.name),
                        "fixed multiplier must be positive",
                    ));
                }
            }
            for buyer in s.filter.allowed_buyers.iter().flatten() {
                if self.buyer(buyer).is_none() {
                    errors.push(ConfigurationError::UnknownBuyer {
                        context: format!("strategy '{}'", s.name),
                        buyer: buyer.clone(),
                    });
                }
            }
        }
    }

    fn validate_analysis(&self, errors: &mut Vec<ConfigurationError>) {
        let a = &self.analysis;
        if a.mc_paths == 0 || a.mc_paths > MAX_MC_PATHS {
            errors.push(ConfigurationError::invalid(
                "analysis.mc_paths",
                format!("{} outside 1..={}", a.mc_paths, MAX_MC_PATHS),
            ));
        }
        if !(a.confidence > 0.0 && a.confidence < 1.0) {
            errors.push(ConfigurationError::invalid(
                "analysis.confidence",
                "must lie in (0, 1)",
            ));
        }
        if !(a.tornado_pct > 0.0 && a.tornado_pct < 1.0) {
            errors.push(ConfigurationError::invalid(
                "analysis.tornado_pct",
                "must lie in (0, 1)",
            ));
        }
        if let Some(hedge) = &a.hedge {
            if !(0.0..=1.0).contains(&hedge.ratio) {
                errors.push(ConfigurationError::invalid(
                    "analysis.hedge.ratio",
                    "must lie in [0, 1]",
                ));
            }
            if hedge.factor.stochastic_index().is_none() {
                errors.push(ConfigurationError::invalid(
                    "analysis.hedge.factor",
                    format!("{} is not simulated and cannot be hedged", hedge.factor),
                ));
            }
        }
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&a.log_level.to_lowercase().as_str()) {
            errors.push(ConfigurationError::invalid(
                "analysis.log_level",
                format!("'{}' not one of {:?}", a.log_level, valid_log_levels),
            ));
        }
    }

    // ====================================================================
    // Lookups
    // ====================================================================

    /// Destination by id.
    pub fn destination(&self, id: &DestinationId) -> Option<&Destination> {
        self.destinations.iter().find(|d| &d.id == id)
    }

    /// Buyer by id.
    pub fn buyer(&self, id: &BuyerId) -> Option<&Buyer> {
        self.buyers.iter().find(|b| &b.id == id)
    }

    /// Affiliated (destination, buyer) pairs in configuration order.
    pub fn affiliated_pairs(&self) -> Vec<(&Destination, &Buyer)> {
        self.destinations
            .iter()
            .flat_map(|d| {
                self.buyers
                    .iter()
                    .filter(move |b| b.destination == d.id)
                    .map(move |b| (d, b))
            })
            .collect()
    }

    /// Resolved credit terms for a buyer.
    pub fn credit_terms(&self, buyer: &Buyer) -> CreditTerms {
        resolve_credit(buyer, &self.credit_table)
    }

    /// Strategy profiles to optimise: the configured list, or the reference
    /// set (Optimal, Conservative, High exposure) when none are configured.
    pub fn strategy_profiles(&self) -> Vec<StrategyProfile> {
        if self.strategies.is_empty() {
            vec![
                StrategyProfile::optimal(),
                StrategyProfile::conservative(),
                StrategyProfile::high_exposure(self.contract.max_multiplier()),
            ]
        } else {
            self.strategies.clone()
        }
    }

    /// Months eligible for embedded options.
    pub fn embedded_option_months(&self) -> Vec<DeliveryMonth> {
        self.embedded_options
            .months
            .clone()
            .unwrap_or_else(|| self.contract.schedule())
    }
}
