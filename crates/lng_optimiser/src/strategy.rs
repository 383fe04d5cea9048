//! Monthly routing optimiser.
//!
//! For each delivery month the optimiser builds the option universe of
//! affiliated (destination, buyer) pairs, prices every admissible volume
//! multiplier and commits the best cargo, or cancels when every delivery is
//! strictly worse than paying the tolling fee.
//!
//! ## Selection rules
//!
//! - Multiplier per pair: highest net P&L; ties go to the multiplier closest
//!   to 1.0, then the smaller one.
//! - Pair: highest net P&L; ties within [`TIE_TOLERANCE`] go to the lower
//!   default probability, then the shorter voyage, then the buyer id.
//! - Cancel only when no candidate is admissible or the best candidate is
//!   strictly below the cancellation P&L.
//!
//! Committing a cargo records its call in the [`SurchargeLedger`], so later
//! months see the remaining surcharge allowance.

use crate::error::OptimiserError;
use lng_config::{Buyer, Destination, StrategyProfile, TradingConfig, VolumePolicy};
use lng_core::types::{BuyerId, ConstraintViolation, DeliveryMonth, DestinationId};
use lng_pricing::{CargoPricer, CargoRequest, ForecastSet, PnlBreakdown, SurchargeLedger};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Net P&L difference (USD) under which two candidates are tied.
pub const TIE_TOLERANCE: f64 = 1e-6;

/// One priced, admissible cargo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    /// Volume multiplier of the nominal cargo
    pub multiplier: f64,
    /// Buyer default probability
    pub default_probability: f64,
    /// Voyage length (days)
    pub voyage_days: u32,
    /// Itemised P&L
    pub pnl: PnlBreakdown,
}

impl Candidate {
    /// Net P&L.
    #[inline]
    pub fn net_pnl(&self) -> f64 {
        self.pnl.net_pnl
    }

    /// Destination.
    pub fn destination(&self) -> &DestinationId {
        &self.pnl.destination
    }

    /// Buyer.
    pub fn buyer(&self) -> &BuyerId {
        &self.pnl.buyer
    }
}

/// A candidate removed from the universe and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exclusion {
    /// Destination
    pub destination: DestinationId,
    /// Buyer
    pub buyer: BuyerId,
    /// Multiplier, when the exclusion is volume-specific
    pub multiplier: Option<f64>,
    /// Violated constraint
    #[serde(serialize_with = "as_display")]
    pub violation: ConstraintViolation,
}

fn as_display<S: Serializer, T: Display>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Outcome for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Decision {
    /// Deliver the chosen cargo
    Deliver(Candidate),
    /// Cancel and pay the tolling fee
    Cancel {
        /// Cancellation P&L (negative)
        pnl: f64,
    },
}

impl Decision {
    /// Net P&L of the decision.
    pub fn pnl(&self) -> f64 {
        match self {
            Decision::Deliver(c) => c.net_pnl(),
            Decision::Cancel { pnl } => *pnl,
        }
    }
}

/// Decision plus the full candidate set it was chosen from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyDecision {
    /// Delivery month
    pub month: DeliveryMonth,
    /// Chosen action
    pub decision: Decision,
    /// Every admissible candidate priced this month
    pub candidates: Vec<Candidate>,
    /// Candidates excluded by eligibility, lead time or volume bounds
    pub exclusions: Vec<Exclusion>,
    /// P&L of cancelling this month
    pub cancellation_pnl: f64,
}

impl MonthlyDecision {
    /// Net P&L of the month.
    pub fn pnl(&self) -> f64 {
        self.decision.pnl()
    }

    /// Delivered cargo, if any.
    pub fn delivered(&self) -> Option<&Candidate> {
        match &self.decision {
            Decision::Deliver(c) => Some(c),
            Decision::Cancel { .. } => None,
        }
    }

    /// Returns whether the month was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.decision, Decision::Cancel { .. })
    }
}

/// An optimised strategy: one decision per delivery month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strategy {
    /// Profile the strategy was optimised under
    pub profile: StrategyProfile,
    /// Decisions in month order
    pub months: Vec<MonthlyDecision>,
    #[serde(skip)]
    ledger: SurchargeLedger,
}

impl Strategy {
    /// Profile name.
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Sum of monthly P&L.
    pub fn total_pnl(&self) -> f64 {
        self.months.iter().map(MonthlyDecision::pnl).sum()
    }

    /// Delivered cargoes in month order.
    pub fn deliveries(&self) -> impl Iterator<Item = (DeliveryMonth, &Candidate)> {
        self.months
            .iter()
            .filter_map(|m| m.delivered().map(|c| (m.month, c)))
    }

    /// Number of cancelled months.
    pub fn cancellations(&self) -> usize {
        self.months.iter().filter(|m| m.is_cancelled()).count()
    }

    /// Surcharge ledger after every committed cargo.
    pub fn ledger(&self) -> &SurchargeLedger {
        &self.ledger
    }
}

/// Month-by-month greedy optimiser over the contract schedule.
#[derive(Debug, Clone, Copy)]
pub struct StrategyOptimiser<'a> {
    config: &'a TradingConfig,
    pricer: CargoPricer<'a>,
    forecasts: &'a ForecastSet,
}

impl<'a> StrategyOptimiser<'a> {
    /// Creates an optimiser over the given forecasts.
    pub fn new(config: &'a TradingConfig, forecasts: &'a ForecastSet) -> Self {
        Self {
            config,
            pricer: CargoPricer::new(config),
            forecasts,
        }
    }

    /// The pricer in use.
    pub fn pricer(&self) -> &CargoPricer<'a> {
        &self.pricer
    }

    /// Optimises every configured profile.
    pub fn optimise_all(&self) -> Result<Vec<Strategy>, OptimiserError> {
        self.config
            .strategy_profiles()
            .iter()
            .map(|p| self.optimise(p))
            .collect()
    }

    /// Optimises one profile over the delivery schedule.
    ///
    /// # Errors
    ///
    /// - `EmptySchedule` when the contract has no delivery months
    /// - `Pricing` on missing or invalid forecasts; pricing errors abort the
    ///   strategy rather than excluding a candidate
    pub fn optimise(&self, profile: &StrategyProfile) -> Result<Strategy, OptimiserError> {
        let schedule = self.config.contract.schedule();
        if schedule.is_empty() {
            return Err(OptimiserError::EmptySchedule {
                profile: profile.name.clone(),
            });
        }

        let mut ledger = SurchargeLedger::new();
        let mut months = Vec::with_capacity(schedule.len());
        for month in schedule {
            let decision = self.decide_month(profile, month, &mut ledger)?;
            months.push(decision);
        }

        let strategy = Strategy {
            profile: profile.clone(),
            months,
            ledger,
        };
        info!(
            strategy = %profile.name,
            total_pnl = strategy.total_pnl(),
            cancellations = strategy.cancellations(),
            "strategy optimised"
        );
        Ok(strategy)
    }

    /// Decides one month and commits the chosen cargo to `ledger`.
    pub fn decide_month(
        &self,
        profile: &StrategyProfile,
        month: DeliveryMonth,
        ledger: &mut SurchargeLedger,
    ) -> Result<MonthlyDecision, OptimiserError> {
        let inputs = self.forecasts.inputs(month)?;
        let cancellation_pnl = self.pricer.cancellation_pnl();

        let mut candidates = Vec::new();
        let mut exclusions = Vec::new();
        let mut pair_best: Vec<Candidate> = Vec::new();

        for (dest, buyer) in self.config.affiliated_pairs() {
            if let Err(violation) = self.admit(profile, month, dest, buyer) {
                debug!(%month, destination = %dest.id, buyer = %buyer.id, %violation, "pair excluded");
                exclusions.push(Exclusion {
                    destination: dest.id.clone(),
                    buyer: buyer.id.clone(),
                    multiplier: None,
                    violation,
                });
                continue;
            }

            let default_probability = self.config.credit_terms(buyer).default_probability;
            let mut best: Option<Candidate> = None;
            for multiplier in self.multipliers(profile) {
                let volume = self.config.contract.nominal_volume * multiplier;
                if let Err(violation) = self.pricer.check_volume(volume, dest.voyage_days) {
                    debug!(%month, buyer = %buyer.id, multiplier, %violation, "volume inadmissible");
                    exclusions.push(Exclusion {
                        destination: dest.id.clone(),
                        buyer: buyer.id.clone(),
                        multiplier: Some(multiplier),
                        violation,
                    });
                    continue;
                }
                let request = CargoRequest {
                    month,
                    destination: dest.id.clone(),
                    buyer: buyer.id.clone(),
                    purchase_volume: volume,
                };
                let pnl = self.pricer.price(&request, &inputs, ledger)?;
                let candidate = Candidate {
                    multiplier,
                    default_probability,
                    voyage_days: dest.voyage_days,
                    pnl,
                };
                debug!(%month, buyer = %buyer.id, multiplier, net_pnl = candidate.net_pnl(), "candidate priced");

                if best
                    .as_ref()
                    .map_or(true, |b| compare_multiplier(&candidate, b) == Ordering::Greater)
                {
                    best = Some(candidate.clone());
                }
                candidates.push(candidate);
            }
            pair_best.extend(best);
        }

        let chosen = pair_best
            .into_iter()
            .max_by(compare_pair)
            .filter(|c| c.net_pnl() >= cancellation_pnl);

        let decision = match chosen {
            Some(candidate) => {
                let dest = self.pricer.resolve(candidate.destination(), candidate.buyer())?.0;
                ledger.record(dest, month, &self.config.contract.vessel_flag);
                info!(
                    %month,
                    destination = %candidate.destination(),
                    buyer = %candidate.buyer(),
                    multiplier = candidate.multiplier,
                    net_pnl = candidate.net_pnl(),
                    "deliver"
                );
                Decision::Deliver(candidate)
            }
            None => {
                if candidates.is_empty() {
                    warn!(%month, strategy = %profile.name, "no admissible candidate; cancelling");
                } else {
                    info!(%month, pnl = cancellation_pnl, "cancel");
                }
                Decision::Cancel {
                    pnl: cancellation_pnl,
                }
            }
        };

        Ok(MonthlyDecision {
            month,
            decision,
            candidates,
            exclusions,
            cancellation_pnl,
        })
    }

    /// Checks affiliation, the profile's buyer filter and the buyer's lead
    /// time for a delivery month.
    pub fn admit(
        &self,
        profile: &StrategyProfile,
        month: DeliveryMonth,
        dest: &Destination,
        buyer: &Buyer,
    ) -> Result<(), ConstraintViolation> {
        if buyer.destination != dest.id {
            return Err(ConstraintViolation::BuyerDestinationMismatch {
                buyer: buyer.id.clone(),
                destination: dest.id.clone(),
            });
        }
        let credit = self.config.credit_terms(buyer);
        profile
            .filter
            .check(&buyer.id, buyer.rating, &credit)
            .map_err(|reason| ConstraintViolation::IneligibleBuyer {
                buyer: buyer.id.clone(),
                reason,
            })?;
        let available = month.months_since(&self.config.contract.decision_month);
        if available < buyer.lead_time_months as i32 {
            return Err(ConstraintViolation::LeadTime {
                buyer: buyer.id.clone(),
                required: buyer.lead_time_months,
                available,
            });
        }
        Ok(())
    }

    fn multipliers(&self, profile: &StrategyProfile) -> Vec<f64> {
        match profile.volume {
            VolumePolicy::Optimise => self.config.contract.volume_multipliers.clone(),
            VolumePolicy::Fixed(m) => vec![m],
        }
    }
}

/// Orders candidates of one pair: net P&L, then closeness to 1.0, then the
/// smaller multiplier. `Greater` means preferred.
pub fn compare_multiplier(a: &Candidate, b: &Candidate) -> Ordering {
    if (a.net_pnl() - b.net_pnl()).abs() > TIE_TOLERANCE {
        return a.net_pnl().total_cmp(&b.net_pnl());
    }
    let da = (a.multiplier - 1.0).abs();
    let db = (b.multiplier - 1.0).abs();
    db.total_cmp(&da)
        .then_with(|| b.multiplier.total_cmp(&a.multiplier))
}

/// Orders candidates across pairs: net P&L, then lower default probability,
/// then shorter voyage, then buyer id. `Greater` means preferred.
pub fn compare_pair(a: &Candidate, b: &Candidate) -> Ordering {
    if (a.net_pnl() - b.net_pnl()).abs() > TIE_TOLERANCE {
        return a.net_pnl().total_cmp(&b.net_pnl());
    }
    b.default_probability
        .total_cmp(&a.default_probability)
        .then_with(|| b.voyage_days.cmp(&a.voyage_days))
        .then_with(|| b.buyer().cmp(a.buyer()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lng_config::reference_config;
    use lng_pricing::reference_market;

    fn m(y: i32, mo: u32) -> DeliveryMonth {
        DeliveryMonth::new(y, mo).unwrap()
    }

    fn candidate(buyer: &str, multiplier: f64, pd: f64, days: u32, net: f64) -> Candidate {
        Candidate {
            multiplier,
            default_probability: pd,
            voyage_days: days,
            pnl: PnlBreakdown {
                month: m(2025, 11),
                destination: DestinationId::new("X"),
                buyer: BuyerId::new(buyer),
                purchase_volume: 0.0,
                arrival_volume: 0.0,
                sold_volume: 0.0,
                stranded_volume: 0.0,
                stranded: false,
                boil_off_volume: 0.0,
                boil_off_value: 0.0,
                benchmark_price: 0.0,
                realised_price: 0.0,
                purchase_cost: 0.0,
                revenue: 0.0,
                freight: Default::default(),
                credit_loss: 0.0,
                demand_adjustment: 0.0,
                net_pnl: net,
            },
        }
    }

    // ================================================================
    // Tie-breaks
    // ================================================================

    #[test]
    fn test_multiplier_tie_prefers_closest_to_one_then_smaller() {
        let a = candidate("B", 0.95, 0.0, 30, 100.0);
        let b = candidate("B", 1.05, 0.0, 30, 100.0);
        let c = candidate("B", 1.0, 0.0, 30, 100.0);
        assert_eq!(compare_multiplier(&a, &b), Ordering::Greater);
        assert_eq!(compare_multiplier(&c, &a), Ordering::Greater);
        let richer = candidate("B", 1.1, 0.0, 30, 101.0);
        assert_eq!(compare_multiplier(&richer, &c), Ordering::Greater);
    }

    #[test]
    fn test_pair_tie_prefers_lower_pd_then_shorter_voyage_then_id() {
        let safe = candidate("Z", 1.0, 0.001, 48, 100.0);
        let risky = candidate("A", 1.0, 0.01, 30, 100.0 + 1e-7);
        assert_eq!(compare_pair(&safe, &risky), Ordering::Greater);

        let near = candidate("Z", 1.0, 0.001, 30, 100.0);
        assert_eq!(compare_pair(&near, &safe), Ordering::Greater);

        let first = candidate("A", 1.0, 0.001, 30, 100.0);
        assert_eq!(compare_pair(&first, &near), Ordering::Greater);
    }

    // ================================================================
    // Reference data
    // ================================================================

    #[test]
    fn test_chosen_candidate_dominates_month() {
        let config = reference_config();
        let forecasts = reference_market().forecast_set().unwrap();
        let optimiser = StrategyOptimiser::new(&config, &forecasts);
        let strategy = optimiser.optimise(&StrategyProfile::optimal()).unwrap();

        assert_eq!(strategy.months.len(), 6);
        for month in &strategy.months {
            let chosen = month.pnl();
            for c in &month.candidates {
                assert!(chosen >= c.net_pnl() - TIE_TOLERANCE || month.is_cancelled());
            }
            if month.is_cancelled() {
                assert!(month
                    .candidates
                    .iter()
                    .all(|c| c.net_pnl() < month.cancellation_pnl));
            }
        }
    }

    #[test]
    fn test_lead_time_excludes_japan_utility_in_first_month() {
        let config = reference_config();
        let forecasts = reference_market().forecast_set().unwrap();
        let optimiser = StrategyOptimiser::new(&config, &forecasts);
        let mut ledger = SurchargeLedger::new();
        let nov = optimiser
            .decide_month(&StrategyProfile::optimal(), m(2025, 11), &mut ledger)
            .unwrap();
        assert!(nov.exclusions.iter().any(|e| matches!(
            &e.violation,
            ConstraintViolation::LeadTime { buyer, required: 2, available: 1 }
                if buyer.as_str() == "JP-Utility"
        )));
        assert!(nov
            .candidates
            .iter()
            .all(|c| c.buyer().as_str() != "JP-Utility"));
    }

    #[test]
    fn test_conservative_profile_only_uses_a_or_better() {
        let config = reference_config();
        let forecasts = reference_market().forecast_set().unwrap();
        let optimiser = StrategyOptimiser::new(&config, &forecasts);
        let strategy = optimiser
            .optimise(&StrategyProfile::conservative())
            .unwrap();
        for (_, c) in strategy.deliveries() {
            let buyer = config.buyer(c.buyer()).unwrap();
            assert!(buyer.rating.at_least(lng_core::types::CreditRating::A));
        }
        assert!(strategy.months[0].exclusions.iter().any(|e| matches!(
            e.violation,
            ConstraintViolation::IneligibleBuyer { .. }
        )));
    }

    #[test]
    fn test_fixed_policy_uses_only_its_multiplier() {
        let config = reference_config();
        let forecasts = reference_market().forecast_set().unwrap();
        let optimiser = StrategyOptimiser::new(&config, &forecasts);
        let strategy = optimiser
            .optimise(&StrategyProfile::high_exposure(1.1))
            .unwrap();
        for month in &strategy.months {
            assert!(month.candidates.iter().all(|c| c.multiplier == 1.1));
        }
    }

    #[test]
    fn test_cancels_only_when_strictly_below_tolling() {
        let mut config = reference_config();
        // Henry Hub differential so large every cargo loses more than tolling
        config.contract.henry_hub_differential = 20.0;
        let forecasts = reference_market().forecast_set().unwrap();
        let strategy = StrategyOptimiser::new(&config, &forecasts)
            .optimise(&StrategyProfile::optimal())
            .unwrap();
        assert_eq!(strategy.cancellations(), 6);
        assert!((strategy.total_pnl() - 6.0 * -5_700_000.0).abs() < 1e-3);
        assert_eq!(strategy.ledger().total_calls(), 0);
    }

    #[test]
    fn test_no_admissible_candidate_forces_cancel() {
        let mut config = reference_config();
        config.contract.sales_bounds.min = 10_000_000.0;
        let forecasts = reference_market().forecast_set().unwrap();
        let strategy = StrategyOptimiser::new(&config, &forecasts)
            .optimise(&StrategyProfile::optimal())
            .unwrap();
        assert!(strategy.months.iter().all(|m| m.is_cancelled()));
        assert!(strategy.months.iter().all(|m| m.candidates.is_empty()));
    }

    #[test]
    fn test_missing_forecast_aborts() {
        let mut config = reference_config();
        config.contract.delivery_months = 8;
        let forecasts = reference_market().forecast_set().unwrap();
        let err = StrategyOptimiser::new(&config, &forecasts)
            .optimise(&StrategyProfile::optimal())
            .unwrap_err();
        assert!(matches!(err, OptimiserError::Pricing(_)));
    }

    #[test]
    fn test_admit_rejects_unaffiliated_pair() {
        let config = reference_config();
        let forecasts = reference_market().forecast_set().unwrap();
        let optimiser = StrategyOptimiser::new(&config, &forecasts);
        let japan = config.destination(&DestinationId::new("Japan")).unwrap();
        let sg = config.buyer(&BuyerId::new("SG-Utility")).unwrap();
        assert!(matches!(
            optimiser.admit(&StrategyProfile::optimal(), m(2026, 1), japan, sg),
            Err(ConstraintViolation::BuyerDestinationMismatch { .. })
        ));
    }
}
