//! Market price factors.
//!
//! The desk is exposed to five market variables. Four of them (Henry Hub,
//! JKM, Brent, freight) are stochastic in the Monte Carlo engine and share a
//! fitted covariance matrix; FX only enters destination fees quoted in local
//! currency and is held at forecast during simulation, but can still be
//! shocked in scenarios and sensitivities.

use std::fmt;

/// A market variable the cargo P&L depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PriceFactor {
    /// Henry Hub gas price ($/MMBtu), the purchase benchmark.
    HenryHub,
    /// Japan-Korea Marker spot LNG price ($/MMBtu).
    Jkm,
    /// Brent crude price ($/bbl), used by oil-linked sales formulas.
    Brent,
    /// Vessel charter rate ($/day).
    Freight,
    /// FX rate (local currency units per USD).
    Fx,
}

impl PriceFactor {
    /// Factors simulated by the Monte Carlo engine, in covariance-matrix order.
    pub const STOCHASTIC: [PriceFactor; 4] = [
        PriceFactor::HenryHub,
        PriceFactor::Jkm,
        PriceFactor::Brent,
        PriceFactor::Freight,
    ];

    /// Every factor, in reporting order.
    pub const ALL: [PriceFactor; 5] = [
        PriceFactor::HenryHub,
        PriceFactor::Jkm,
        PriceFactor::Brent,
        PriceFactor::Freight,
        PriceFactor::Fx,
    ];

    /// Returns the row/column of this factor in the covariance matrix, if it
    /// is simulated.
    #[inline]
    pub fn stochastic_index(&self) -> Option<usize> {
        match self {
            PriceFactor::HenryHub => Some(0),
            PriceFactor::Jkm => Some(1),
            PriceFactor::Brent => Some(2),
            PriceFactor::Freight => Some(3),
            PriceFactor::Fx => None,
        }
    }

    /// Get the display name of this factor.
    pub fn name(&self) -> &'static str {
        match self {
            PriceFactor::HenryHub => "Henry Hub",
            PriceFactor::Jkm => "JKM",
            PriceFactor::Brent => "Brent",
            PriceFactor::Freight => "Freight",
            PriceFactor::Fx => "FX",
        }
    }

    /// Get the quotation unit of this factor.
    pub fn unit(&self) -> &'static str {
        match self {
            PriceFactor::HenryHub | PriceFactor::Jkm => "$/MMBtu",
            PriceFactor::Brent => "$/bbl",
            PriceFactor::Freight => "$/day",
            PriceFactor::Fx => "LCY/USD",
        }
    }
}

impl fmt::Display for PriceFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
