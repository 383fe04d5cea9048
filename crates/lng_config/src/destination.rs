//! Destination markets and their fee schedules.

use chrono::NaiveDate;
use lng_core::types::{DeliveryMonth, DestinationId};
use serde::{Deserialize, Serialize};

/// How a destination's sale price is linked to a benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PriceLinkage {
    /// Oil-indexed: `slope * Brent + constant` ($/MMBtu)
    Brent {
        /// Brent slope (fraction of $/bbl)
        slope: f64,
        /// Constant ($/MMBtu)
        constant: f64,
    },
    /// JKM settled one month after delivery
    JkmNextMonth,
}

impl PriceLinkage {
    /// Short label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            PriceLinkage::Brent { .. } => "Brent",
            PriceLinkage::JkmNextMonth => "JKM M+1",
        }
    }
}

/// Terminal and port charges at a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Regasification tariff per MMBtu sold
    pub terminal_tariff: f64,
    /// Fixed charge per port call
    pub port_fee: f64,
    /// When set, both charges are quoted in local currency and converted at
    /// the month's FX rate (local units per USD)
    #[serde(default)]
    pub quoted_in_local_currency: bool,
}

impl FeeSchedule {
    /// Converts a charge to USD.
    pub fn to_usd(&self, amount: f64, fx: f64) -> f64 {
        if self.quoted_in_local_currency {
            amount / fx
        } else {
            amount
        }
    }
}

/// Carbon cost accrued over the voyage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CarbonCharge {
    /// Flat $/day
    PerDay {
        /// USD per voyage day
        rate: f64,
    },
    /// Emissions priced per tonne of CO2
    PerTonne {
        /// USD per tonne CO2
        price: f64,
        /// Tonnes CO2 emitted per voyage day
        tonnes_per_day: f64,
    },
}

impl CarbonCharge {
    /// Carbon cost for a voyage of `voyage_days`.
    pub fn cost(&self, voyage_days: f64) -> f64 {
        match *self {
            CarbonCharge::PerDay { rate } => rate * voyage_days,
            CarbonCharge::PerTonne {
                price,
                tonnes_per_day,
            } => price * tonnes_per_day * voyage_days,
        }
    }
}

impl Default for CarbonCharge {
    fn default() -> Self {
        CarbonCharge::PerDay { rate: 0.0 }
    }
}

/// A destination-only charge active inside a date window, capped per year.
///
/// Applies to a call when the delivery month's first day lies in
/// `[start, end]` and the vessel flag is listed. An empty flag list matches
/// every vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurchargeWindow {
    /// Window name, unique per destination
    pub name: String,
    /// First day the charge applies (inclusive)
    pub start: NaiveDate,
    /// Last day the charge applies (inclusive)
    pub end: NaiveDate,
    /// USD charged per call
    pub amount_per_call: f64,
    /// Maximum chargeable calls per calendar year
    pub max_calls_per_year: u32,
    /// Vessel flags the charge targets
    #[serde(default)]
    pub vessel_flags: Vec<String>,
}

impl SurchargeWindow {
    /// Returns whether the window covers a call in `month` by a vessel
    /// flying `flag`.
    pub fn applies(&self, month: DeliveryMonth, flag: &str) -> bool {
        let flag_matches =
            self.vessel_flags.is_empty() || self.vessel_flags.iter().any(|f| f == flag);
        flag_matches
            && month
                .first_day()
                .is_some_and(|day| day >= self.start && day <= self.end)
    }
}

/// A discharge market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    /// Identifier
    pub id: DestinationId,
    /// Voyage duration from the loading port
    pub voyage_days: u32,
    /// Sale price linkage
    pub linkage: PriceLinkage,
    /// Terminal and port charges
    pub fees: FeeSchedule,
    /// Voyage carbon cost
    #[serde(default)]
    pub carbon: CarbonCharge,
    /// Days between delivery and payment
    #[serde(default)]
    pub payment_delay_days: u32,
    /// Seasonal demand factor by calendar month (January first)
    #[serde(default = "flat_seasonality")]
    pub seasonal_demand: [f64; 12],
    /// Date-windowed surcharges
    #[serde(default)]
    pub surcharges: Vec<SurchargeWindow>,
}

fn flat_seasonality() -> [f64; 12] {
    [1.0; 12]
}

impl Destination {
    /// Seasonal demand factor for the calendar month of `month`.
    pub fn seasonal_factor(&self, month: DeliveryMonth) -> f64 {
        self.seasonal_demand[month.month_index()]
    }
}
