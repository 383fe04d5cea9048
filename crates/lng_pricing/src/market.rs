//! Market inputs: monthly forecasts and the factor-model specification.
//!
//! Forecasts are produced upstream and consumed as-is. The TOML layout is
//!
//! ```toml
//! [[forecasts]]
//! month = "2025-11"
//! henry_hub = 3.6
//! jkm = 11.8
//! brent = 78.0
//! freight_rate = 65000.0
//! fx = 150.0
//!
//! [factor_model]
//! correlation = [1.0, 0.35, 0.25, 0.1, 0.35, 1.0, 0.55, 0.3, 0.25, 0.55, 1.0, 0.2, 0.1, 0.3, 0.2, 1.0]
//! volatilities = [0.55, 0.45, 0.3, 0.6]
//! ```
//!
//! `jkm_next_month` may be given per row; otherwise the following row's JKM
//! is used.

use crate::error::MarketDataError;
use crate::inputs::PriceInputs;
use lng_core::types::{DeliveryMonth, PriceFactor, PricingError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One month of forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    /// Forecast month
    pub month: DeliveryMonth,
    /// Henry Hub ($/MMBtu)
    pub henry_hub: f64,
    /// JKM ($/MMBtu)
    pub jkm: f64,
    /// Explicit JKM for the following month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jkm_next_month: Option<f64>,
    /// Brent ($/bbl)
    pub brent: f64,
    /// Charter rate ($/day)
    pub freight_rate: f64,
    /// Local currency units per USD
    pub fx: f64,
}

impl ForecastRow {
    fn map(&self, factor: PriceFactor, f: &impl Fn(f64) -> f64) -> Self {
        let mut out = *self;
        match factor {
            PriceFactor::HenryHub => out.henry_hub = f(self.henry_hub),
            PriceFactor::Jkm => {
                out.jkm = f(self.jkm);
                out.jkm_next_month = self.jkm_next_month.map(f);
            }
            PriceFactor::Brent => out.brent = f(self.brent),
            PriceFactor::Freight => out.freight_rate = f(self.freight_rate),
            PriceFactor::Fx => out.fx = f(self.fx),
        }
        out
    }
}

/// Forecasts indexed by month.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastSet {
    rows: BTreeMap<DeliveryMonth, ForecastRow>,
}

impl ForecastSet {
    /// Build from rows, rejecting duplicate months and invalid prices.
    pub fn new(rows: impl IntoIterator<Item = ForecastRow>) -> Result<Self, MarketDataError> {
        let mut map = BTreeMap::new();
        for row in rows {
            let month = row.month;
            if map.insert(month, row).is_some() {
                return Err(MarketDataError::DuplicateMonth(month));
            }
        }
        let set = Self { rows: map };
        for month in set.rows.keys() {
            set.raw_inputs(*month)?.check(*month)?;
        }
        Ok(set)
    }

    /// Months covered, ascending.
    pub fn months(&self) -> impl Iterator<Item = DeliveryMonth> + '_ {
        self.rows.keys().copied()
    }

    /// Row for `month`.
    pub fn row(&self, month: DeliveryMonth) -> Option<&ForecastRow> {
        self.rows.get(&month)
    }

    /// Number of months.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Price snapshot for a delivery month.
    ///
    /// # Errors
    ///
    /// `MissingForecast` when the month has no row, `InvalidPrice` when a
    /// value is negative or non-finite. A missing JKM M+1 is not an error
    /// here; it surfaces only when a JKM-linked destination is priced.
    pub fn inputs(&self, month: DeliveryMonth) -> Result<PriceInputs, PricingError> {
        let inputs = self.raw_inputs(month)?;
        inputs.check(month)?;
        Ok(inputs)
    }

    fn raw_inputs(&self, month: DeliveryMonth) -> Result<PriceInputs, PricingError> {
        let row = self.rows.get(&month).ok_or(PricingError::MissingForecast {
            month,
            factor: PriceFactor::HenryHub,
        })?;
        let jkm_next_month = row
            .jkm_next_month
            .or_else(|| self.rows.get(&month.next()).map(|r| r.jkm));
        Ok(PriceInputs {
            henry_hub: row.henry_hub,
            jkm: row.jkm,
            jkm_next_month,
            brent: row.brent,
            freight_rate: row.freight_rate,
            fx: row.fx,
        })
    }

    /// Returns a copy with `f` applied to `factor` in every month.
    ///
    /// Results are not re-validated; pricing reports any invalid value.
    pub fn map_factor(&self, factor: PriceFactor, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self
                .rows
                .iter()
                .map(|(m, r)| (*m, r.map(factor, &f)))
                .collect(),
        }
    }
}

/// Historical price series for covariance estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Monthly Henry Hub observations, oldest first
    pub henry_hub: Vec<f64>,
    /// Monthly JKM observations
    pub jkm: Vec<f64>,
    /// Monthly Brent observations
    pub brent: Vec<f64>,
    /// Monthly charter rate observations
    pub freight: Vec<f64>,
    /// Winsorise returns at this many standard deviations
    #[serde(default)]
    pub clip_std: Option<f64>,
}

/// How the covariance of the stochastic factors is specified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactorModelSpec {
    /// Correlation (row-major 4x4) and annualised volatilities, in
    /// Henry Hub, JKM, Brent, freight order
    Parametric {
        /// Row-major correlation matrix
        correlation: Vec<f64>,
        /// Annualised volatilities
        volatilities: Vec<f64>,
    },
    /// Estimated from overlapping monthly histories
    Historical {
        /// Price histories
        history: PriceHistory,
    },
}

/// A market input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInput {
    /// Monthly forecast rows
    pub forecasts: Vec<ForecastRow>,
    /// Factor model
    pub factor_model: FactorModelSpec,
}

impl MarketInput {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, MarketDataError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MarketDataError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, MarketDataError> {
        toml::from_str(content).map_err(|e| MarketDataError::Parse(e.to_string()))
    }

    /// Validated forecast set.
    pub fn forecast_set(&self) -> Result<ForecastSet, MarketDataError> {
        ForecastSet::new(self.forecasts.iter().copied())
    }
}

/// Illustrative six-month market matching the reference configuration.
pub fn reference_market() -> MarketInput {
    let rows = [
        ((2025, 11), 3.60, 11.80, None, 78.0, 65_000.0, 150.0),
        ((2025, 12), 4.10, 12.60, None, 79.0, 80_000.0, 151.0),
        ((2026, 1), 4.40, 13.20, None, 80.0, 85_000.0, 152.0),
        ((2026, 2), 4.00, 12.40, None, 79.0, 70_000.0, 150.0),
        ((2026, 3), 3.50, 11.50, None, 77.0, 60_000.0, 149.0),
        ((2026, 4), 3.30, 11.00, Some(10.80), 76.0, 55_000.0, 148.0),
    ];
    MarketInput {
        forecasts: rows
            .into_iter()
            .map(
                |((y, m), henry_hub, jkm, jkm_next_month, brent, freight_rate, fx)| ForecastRow {
                    month: DeliveryMonth::new(y, m).unwrap_or_default(),
                    henry_hub,
                    jkm,
                    jkm_next_month,
                    brent,
                    freight_rate,
                    fx,
                },
            )
            .collect(),
        factor_model: FactorModelSpec::Parametric {
            correlation: vec![
                1.00, 0.35, 0.25, 0.10, //
                0.35, 1.00, 0.55, 0.30, //
                0.25, 0.55, 1.00, 0.20, //
                0.10, 0.30, 0.20, 1.00,
            ],
            volatilities: vec![0.55, 0.45, 0.30, 0.60],
        },
    }
}
