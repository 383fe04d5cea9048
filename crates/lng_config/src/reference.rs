//! Illustrative reference data set.
//!
//! Three destinations (Singapore, Japan, China) with two buyers each, a
//! six-month US Gulf supply contract and the reference strategy profiles.
//! The numbers are indicative only and exist so the engine can be exercised
//! end to end; production runs load their own TOML.

use crate::buyer::{Buyer, CreditTableEntry};
use crate::contract::{
    ContractTerms, CostParameters, DemandModel, Demurrage, EmbeddedOptionTerms,
    StrandedVolumePolicy, VolumeBounds,
};
use crate::destination::{CarbonCharge, Destination, FeeSchedule, PriceLinkage, SurchargeWindow};
use crate::strategy::StrategyProfile;
use crate::trading::{AnalysisSettings, HedgeSettings, TradingConfig};
use chrono::NaiveDate;
use lng_core::types::{BuyerId, CreditRating, DeliveryMonth, DestinationId, PriceFactor};

/// Reference configuration.
pub fn reference_config() -> TradingConfig {
    TradingConfig {
        contract: reference_contract(),
        costs: CostParameters {
            insurance_rate: 0.0015,
            brokerage_rate: 0.0125,
            working_capital_rate: 0.06,
            demurrage: Demurrage {
                probability: 0.15,
                expected_delay_days: 2.0,
                daily_rate: 75_000.0,
            },
            lc_fee: 25_000.0,
        },
        destinations: vec![singapore(), japan(), china()],
        buyers: vec![
            buyer("SG-Utility", "Singapore", 0.6, CreditRating::AA, 1),
            buyer("SG-Trader", "Singapore", 1.1, CreditRating::BBB, 0),
            buyer("JP-Utility", "Japan", 0.3, CreditRating::AA, 2),
            Buyer {
                default_probability: Some(0.015),
                recovery_rate: Some(0.3),
                ..buyer("JP-Trader", "Japan", 0.8, CreditRating::BB, 0)
            },
            buyer("CN-Major", "China", 0.5, CreditRating::A, 1),
            buyer("CN-Regional", "China", 1.0, CreditRating::BBB, 0),
        ],
        credit_table: vec![
            CreditTableEntry {
                rating: CreditRating::BBB,
                default_probability: 0.003,
                recovery_rate: 0.35,
            },
            CreditTableEntry {
                rating: CreditRating::BB,
                default_probability: 0.012,
                recovery_rate: 0.3,
            },
        ],
        strategies: vec![
            StrategyProfile::optimal(),
            StrategyProfile::conservative(),
            StrategyProfile::high_exposure(1.1),
        ],
        embedded_options: EmbeddedOptionTerms {
            cap: 2,
            months: None,
            volume_multiplier: 1.0,
        },
        demand_model: DemandModel::PriceAdjustment,
        stranded_volume_policy: StrandedVolumePolicy::Cap,
        analysis: AnalysisSettings {
            hedge: Some(HedgeSettings {
                factor: PriceFactor::HenryHub,
                ratio: 0.5,
                timing_offset_months: 1,
            }),
            ..AnalysisSettings::default()
        },
    }
}

fn month(year: i32, m: u32) -> DeliveryMonth {
    DeliveryMonth::new(year, m).unwrap_or_default()
}

fn reference_contract() -> ContractTerms {
    ContractTerms {
        nominal_volume: 3_800_000.0,
        volume_multipliers: vec![0.9, 0.95, 1.0, 1.05, 1.1],
        purchase_bounds: VolumeBounds {
            min: 3_420_000.0,
            max: 4_180_000.0,
        },
        sales_bounds: VolumeBounds {
            min: 3_200_000.0,
            max: 4_100_000.0,
        },
        tolling_fee: 1.5,
        henry_hub_differential: 2.5,
        boil_off_rate: 0.0005,
        delivery_start: month(2025, 11),
        delivery_months: 6,
        decision_month: month(2025, 10),
        vessel_flag: "US".to_string(),
    }
}

fn singapore() -> Destination {
    Destination {
        id: DestinationId::new("Singapore"),
        voyage_days: 48,
        linkage: PriceLinkage::Brent {
            slope: 0.128,
            constant: 0.5,
        },
        fees: FeeSchedule {
            terminal_tariff: 0.45,
            port_fee: 150_000.0,
            quoted_in_local_currency: false,
        },
        carbon: CarbonCharge::PerDay { rate: 2_500.0 },
        payment_delay_days: 30,
        seasonal_demand: [
            1.0, 1.0, 0.98, 0.97, 0.98, 1.0, 1.02, 1.02, 1.0, 0.99, 1.0, 1.01,
        ],
        surcharges: Vec::new(),
    }
}

fn japan() -> Destination {
    Destination {
        id: DestinationId::new("Japan"),
        voyage_days: 30,
        linkage: PriceLinkage::JkmNextMonth,
        fees: FeeSchedule {
            terminal_tariff: 60.0,
            port_fee: 22_500_000.0,
            quoted_in_local_currency: true,
        },
        carbon: CarbonCharge::PerTonne {
            price: 85.0,
            tonnes_per_day: 110.0,
        },
        payment_delay_days: 20,
        seasonal_demand: [
            1.06, 1.05, 1.0, 0.96, 0.95, 0.97, 1.0, 1.01, 0.98, 1.0, 1.03, 1.05,
        ],
        surcharges: Vec::new(),
    }
}

fn china() -> Destination {
    Destination {
        id: DestinationId::new("China"),
        voyage_days: 34,
        linkage: PriceLinkage::Brent {
            slope: 0.135,
            constant: 0.2,
        },
        fees: FeeSchedule {
            terminal_tariff: 0.38,
            port_fee: 120_000.0,
            quoted_in_local_currency: false,
        },
        carbon: CarbonCharge::PerDay { rate: 2_000.0 },
        payment_delay_days: 30,
        seasonal_demand: [
            1.05, 1.03, 0.98, 0.96, 0.96, 0.98, 1.0, 1.0, 0.98, 1.0, 1.02, 1.04,
        ],
        surcharges: vec![SurchargeWindow {
            name: "us-vessel-port-fee".to_string(),
            start: NaiveDate::from_ymd_opt(2025, 10, 14).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap_or_default(),
            amount_per_call: 1_000_000.0,
            max_calls_per_year: 5,
            vessel_flags: vec!["US".to_string()],
        }],
    }
}

fn buyer(id: &str, destination: &str, premium: f64, rating: CreditRating, lead: u32) -> Buyer {
    Buyer {
        id: BuyerId::new(id),
        destination: DestinationId::new(destination),
        premium,
        rating,
        default_probability: None,
        recovery_rate: None,
        lead_time_months: lead,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_buyer_has_a_destination() {
        let config = reference_config();
        for b in &config.buyers {
            assert!(config.destination(&b.destination).is_some());
        }
    }

    #[test]
    fn test_reference_schedule() {
        let config = reference_config();
        assert_eq!(config.contract.schedule().len(), 6);
        assert_eq!(config.embedded_option_months().len(), 6);
    }
}
