//! Embedded option valuer.
//!
//! The contract grants up to `cap` extra cargoes. Each (month, affiliated
//! pair) is an option worth `max(expected P&L, 0)`, priced against the
//! surcharge ledger left by the base strategy. Options are ranked by value
//! and the top `cap` with strictly positive value are exercised.

use crate::error::OptimiserError;
use crate::strategy::{compare_pair, Candidate, Strategy, StrategyOptimiser};
use lng_config::TradingConfig;
use lng_core::types::{BuyerId, ConstraintViolation, DeliveryMonth, DestinationId};
use lng_pricing::{CargoRequest, ForecastSet};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, info};

/// One valued option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddedOption {
    /// Delivery month
    pub month: DeliveryMonth,
    /// Destination
    pub destination: DestinationId,
    /// Buyer
    pub buyer: BuyerId,
    /// Expected net P&L of the extra cargo
    pub expected_pnl: f64,
    /// Option value, `max(expected_pnl, 0)`
    pub value: f64,
    /// Set for the options chosen for exercise
    pub exercised: bool,
    #[serde(skip)]
    candidate: Candidate,
}

/// Ranked option table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddedOptionReport {
    /// Exercise cap applied
    pub cap: usize,
    /// Every valued option, best first
    pub options: Vec<EmbeddedOption>,
    /// Sum of exercised option values
    pub total_uplift: f64,
}

impl EmbeddedOptionReport {
    /// Exercised options in rank order.
    pub fn exercised(&self) -> impl Iterator<Item = &EmbeddedOption> {
        self.options.iter().filter(|o| o.exercised)
    }
}

/// Values embedded options against a base strategy.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedOptionValuer<'a> {
    config: &'a TradingConfig,
    forecasts: &'a ForecastSet,
    optimiser: StrategyOptimiser<'a>,
}

impl<'a> EmbeddedOptionValuer<'a> {
    /// Creates a valuer.
    pub fn new(config: &'a TradingConfig, forecasts: &'a ForecastSet) -> Self {
        Self {
            config,
            forecasts,
            optimiser: StrategyOptimiser::new(config, forecasts),
        }
    }

    /// Values and exercises options with the contractual cap.
    pub fn value(&self, base: &Strategy) -> Result<EmbeddedOptionReport, OptimiserError> {
        self.value_with_cap(base, self.config.embedded_options.cap)
    }

    /// Values options and exercises at most `cap` of them.
    ///
    /// # Errors
    ///
    /// - `Constraint(ExerciseCapExceeded)` when `cap` exceeds the contract cap
    /// - `Pricing` on missing or invalid forecasts
    pub fn value_with_cap(
        &self,
        base: &Strategy,
        cap: usize,
    ) -> Result<EmbeddedOptionReport, OptimiserError> {
        let terms = &self.config.embedded_options;
        if cap > terms.cap {
            return Err(ConstraintViolation::ExerciseCapExceeded {
                requested: cap,
                cap: terms.cap,
            }
            .into());
        }

        let pricer = self.optimiser.pricer();
        let volume = self.config.contract.nominal_volume * terms.volume_multiplier;
        let mut options = Vec::new();

        for month in self.config.embedded_option_months() {
            let inputs = self.forecasts.inputs(month)?;
            for (dest, buyer) in self.config.affiliated_pairs() {
                if let Err(violation) = self.optimiser.admit(&base.profile, month, dest, buyer) {
                    debug!(%month, buyer = %buyer.id, %violation, "option excluded");
                    continue;
                }
                if let Err(violation) = pricer.check_volume(volume, dest.voyage_days) {
                    debug!(%month, buyer = %buyer.id, %violation, "option volume inadmissible");
                    continue;
                }
                let request = CargoRequest {
                    month,
                    destination: dest.id.clone(),
                    buyer: buyer.id.clone(),
                    purchase_volume: volume,
                };
                let pnl = pricer.price(&request, &inputs, base.ledger())?;
                let candidate = Candidate {
                    multiplier: terms.volume_multiplier,
                    default_probability: self.config.credit_terms(buyer).default_probability,
                    voyage_days: dest.voyage_days,
                    pnl,
                };
                options.push(EmbeddedOption {
                    month,
                    destination: dest.id.clone(),
                    buyer: buyer.id.clone(),
                    expected_pnl: candidate.net_pnl(),
                    value: candidate.net_pnl().max(0.0),
                    exercised: false,
                    candidate,
                });
            }
        }

        options.sort_by(rank);
        let mut total_uplift = 0.0;
        for option in options.iter_mut().filter(|o| o.value > 0.0).take(cap) {
            option.exercised = true;
            total_uplift += option.value;
        }

        info!(
            valued = options.len(),
            exercised = options.iter().filter(|o| o.exercised).count(),
            total_uplift,
            "embedded options valued"
        );
        Ok(EmbeddedOptionReport {
            cap,
            options,
            total_uplift,
        })
    }
}

/// Best first: value, then the routing tie-break, then the earlier month.
fn rank(a: &EmbeddedOption, b: &EmbeddedOption) -> Ordering {
    b.value
        .total_cmp(&a.value)
        .then_with(|| compare_pair(&b.candidate, &a.candidate))
        .then_with(|| a.month.cmp(&b.month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lng_config::StrategyProfile;
    use lng_pricing::reference_market;

    fn setup() -> (TradingConfig, ForecastSet) {
        (
            lng_config::reference_config(),
            reference_market().forecast_set().unwrap(),
        )
    }

    #[test]
    fn test_cap_and_positivity() {
        let (config, forecasts) = setup();
        let base = StrategyOptimiser::new(&config, &forecasts)
            .optimise(&StrategyProfile::optimal())
            .unwrap();
        let report = EmbeddedOptionValuer::new(&config, &forecasts)
            .value(&base)
            .unwrap();

        assert!(report.exercised().count() <= config.embedded_options.cap);
        assert!(report.exercised().all(|o| o.value > 0.0));
        assert!(report.options.iter().all(|o| o.value >= 0.0));
        let uplift: f64 = report.exercised().map(|o| o.value).sum();
        assert!((uplift - report.total_uplift).abs() < 1e-6);
    }

    #[test]
    fn test_exercised_are_top_ranked() {
        let (config, forecasts) = setup();
        let base = StrategyOptimiser::new(&config, &forecasts)
            .optimise(&StrategyProfile::optimal())
            .unwrap();
        let report = EmbeddedOptionValuer::new(&config, &forecasts)
            .value(&base)
            .unwrap();

        let min_exercised = report
            .exercised()
            .map(|o| o.value)
            .fold(f64::INFINITY, f64::min);
        for o in report.options.iter().filter(|o| !o.exercised) {
            assert!(o.value <= min_exercised);
        }
        for pair in report.options.windows(2) {
            assert!(pair[0].value >= pair[1].value - 1e-6);
        }
    }

    #[test]
    fn test_cap_above_contract_rejected() {
        let (config, forecasts) = setup();
        let base = StrategyOptimiser::new(&config, &forecasts)
            .optimise(&StrategyProfile::optimal())
            .unwrap();
        let err = EmbeddedOptionValuer::new(&config, &forecasts)
            .value_with_cap(&base, 3)
            .unwrap_err();
        assert_eq!(
            err,
            OptimiserError::Constraint(ConstraintViolation::ExerciseCapExceeded {
                requested: 3,
                cap: 2
            })
        );
    }

    #[test]
    fn test_worthless_options_not_exercised() {
        let (mut config, forecasts) = setup();
        config.contract.henry_hub_differential = 20.0;
        let base = StrategyOptimiser::new(&config, &forecasts)
            .optimise(&StrategyProfile::optimal())
            .unwrap();
        let report = EmbeddedOptionValuer::new(&config, &forecasts)
            .value(&base)
            .unwrap();
        assert!(!report.options.is_empty());
        assert_eq!(report.exercised().count(), 0);
        assert_eq!(report.total_uplift, 0.0);
    }
}
