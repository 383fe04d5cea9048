//! Contract terms, cost parameters and modelling policies.

use lng_core::types::DeliveryMonth;
use serde::{Deserialize, Serialize};

/// Absolute slack (MMBtu) applied at band edges.
pub const VOLUME_TOLERANCE: f64 = 1e-6;

/// Inclusive volume band (MMBtu).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeBounds {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl VolumeBounds {
    /// Returns whether `volume` lies in `[min, max]`, up to
    /// [`VOLUME_TOLERANCE`].
    #[inline]
    pub fn contains(&self, volume: f64) -> bool {
        volume >= self.min - VOLUME_TOLERANCE && volume <= self.max + VOLUME_TOLERANCE
    }
}

/// Supply contract terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractTerms {
    /// Nominal cargo size (MMBtu)
    pub nominal_volume: f64,
    /// Discrete multipliers of the nominal volume the desk may nominate
    pub volume_multipliers: Vec<f64>,
    /// Purchase contract band
    pub purchase_bounds: VolumeBounds,
    /// Sales contract band, checked against arrival volume
    pub sales_bounds: VolumeBounds,
    /// Fee per nominal MMBtu payable on cancellation
    pub tolling_fee: f64,
    /// Fixed adder to Henry Hub in the purchase formula ($/MMBtu)
    pub henry_hub_differential: f64,
    /// Daily boil-off fraction
    pub boil_off_rate: f64,
    /// First delivery month
    pub delivery_start: DeliveryMonth,
    /// Number of consecutive delivery months
    pub delivery_months: u32,
    /// Month in which routing decisions are notified
    pub decision_month: DeliveryMonth,
    /// Flag state of the chartered vessel
    #[serde(default)]
    pub vessel_flag: String,
}

impl ContractTerms {
    /// Delivery months in order.
    pub fn schedule(&self) -> Vec<DeliveryMonth> {
        self.delivery_start.sequence(self.delivery_months as usize)
    }

    /// Largest configured volume multiplier.
    pub fn max_multiplier(&self) -> f64 {
        self.volume_multipliers
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Probability-weighted demurrage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Demurrage {
    /// Probability of a delay
    pub probability: f64,
    /// Expected delay when one occurs (days)
    pub expected_delay_days: f64,
    /// Demurrage rate ($/day)
    pub daily_rate: f64,
}

impl Demurrage {
    /// Expected demurrage cost per voyage.
    #[inline]
    pub fn expected_cost(&self) -> f64 {
        self.probability * self.expected_delay_days * self.daily_rate
    }
}

/// Voyage cost parameters shared by every destination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostParameters {
    /// Insurance as a fraction of cargo value (purchase cost)
    pub insurance_rate: f64,
    /// Brokerage as a fraction of base freight
    pub brokerage_rate: f64,
    /// Annual working-capital rate applied to base freight
    pub working_capital_rate: f64,
    /// Demurrage expectation inputs
    pub demurrage: Demurrage,
    /// Letter-of-credit fee per cargo
    pub lc_fee: f64,
}

/// How seasonal demand factors enter revenue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandModel {
    /// Benchmark price is multiplied by the seasonal factor
    #[default]
    PriceAdjustment,
    /// Revenue is scaled by the factor as a probability of sale (factor <= 1)
    ProbabilityOfSale,
}

/// Treatment of arrival volume above the sales maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrandedVolumePolicy {
    /// Sell up to the maximum; the excess earns nothing and is reported
    #[default]
    Cap,
    /// Pricing fails with a constraint violation
    Reject,
}

/// Optional extra cargoes beyond the base schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedOptionTerms {
    /// Maximum number of options that may be exercised
    pub cap: usize,
    /// Eligible months; the delivery schedule when absent
    #[serde(default)]
    pub months: Option<Vec<DeliveryMonth>>,
    /// Volume multiplier of each optional cargo
    #[serde(default = "unit_multiplier")]
    pub volume_multiplier: f64,
}

fn unit_multiplier() -> f64 {
    1.0
}

impl Default for EmbeddedOptionTerms {
    fn default() -> Self {
        Self {
            cap: 0,
            months: None,
            volume_multiplier: unit_multiplier(),
        }
    }
}
