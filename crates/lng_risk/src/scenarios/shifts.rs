//! Factor shocks and named scenarios.

use lng_core::types::PriceFactor;
use lng_pricing::ForecastSet;
use serde::{Deserialize, Serialize};

/// How a shock moves a price.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    /// Add a fixed amount in the factor's unit
    Absolute(f64),
    /// Scale by `1 + x`
    Relative(f64),
}

impl ShiftType {
    /// Applies the shift to a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use lng_risk::scenarios::ShiftType;
    ///
    /// assert_eq!(ShiftType::Absolute(0.5).apply(4.0), 4.5);
    /// assert_eq!(ShiftType::Relative(-0.25).apply(12.0), 9.0);
    /// ```
    #[inline]
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            ShiftType::Absolute(amount) => value + amount,
            ShiftType::Relative(pct) => value * (1.0 + pct),
        }
    }
}

/// A shift applied to one factor in every forecast month.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactorShock {
    /// Shocked factor
    pub factor: PriceFactor,
    /// Shift
    pub shift: ShiftType,
}

impl FactorShock {
    /// Relative shock.
    pub fn relative(factor: PriceFactor, pct: f64) -> Self {
        Self {
            factor,
            shift: ShiftType::Relative(pct),
        }
    }

    /// Absolute shock.
    pub fn absolute(factor: PriceFactor, amount: f64) -> Self {
        Self {
            factor,
            shift: ShiftType::Absolute(amount),
        }
    }
}

/// A named set of shocks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Shocks applied together
    pub shocks: Vec<FactorShock>,
}

impl Scenario {
    /// Creates a scenario.
    pub fn new(name: impl Into<String>, description: impl Into<String>, shocks: Vec<FactorShock>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            shocks,
        }
    }

    /// Shocked copy of the forecasts.
    pub fn apply(&self, forecasts: &ForecastSet) -> ForecastSet {
        self.shocks.iter().fold(forecasts.clone(), |acc, shock| {
            acc.map_factor(shock.factor, |v| shock.shift.apply(v))
        })
    }
}
