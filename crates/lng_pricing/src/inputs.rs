//! Per-cargo price snapshot.

use lng_core::types::{DeliveryMonth, PriceFactor, PricingError};
use serde::{Deserialize, Serialize};

/// Market prices needed to price one cargo.
///
/// `jkm_next_month` is only required by destinations settling on JKM M+1;
/// it is `None` when the forecast horizon stops at the delivery month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceInputs {
    /// Henry Hub ($/MMBtu)
    pub henry_hub: f64,
    /// JKM for the delivery month ($/MMBtu)
    pub jkm: f64,
    /// JKM for the month after delivery ($/MMBtu)
    pub jkm_next_month: Option<f64>,
    /// Brent ($/bbl)
    pub brent: f64,
    /// Charter rate ($/day)
    pub freight_rate: f64,
    /// Local currency units per USD
    pub fx: f64,
}

impl PriceInputs {
    /// Value of `factor`. JKM returns the delivery-month price.
    pub fn get(&self, factor: PriceFactor) -> f64 {
        match factor {
            PriceFactor::HenryHub => self.henry_hub,
            PriceFactor::Jkm => self.jkm,
            PriceFactor::Brent => self.brent,
            PriceFactor::Freight => self.freight_rate,
            PriceFactor::Fx => self.fx,
        }
    }

    /// Returns a copy with `f` applied to `factor`.
    ///
    /// A JKM shock moves both the delivery-month and next-month prices.
    pub fn map(&self, factor: PriceFactor, f: impl Fn(f64) -> f64) -> Self {
        let mut out = *self;
        match factor {
            PriceFactor::HenryHub => out.henry_hub = f(self.henry_hub),
            PriceFactor::Jkm => {
                out.jkm = f(self.jkm);
                out.jkm_next_month = self.jkm_next_month.map(&f);
            }
            PriceFactor::Brent => out.brent = f(self.brent),
            PriceFactor::Freight => out.freight_rate = f(self.freight_rate),
            PriceFactor::Fx => out.fx = f(self.fx),
        }
        out
    }

    /// Checks every price is finite and non-negative (FX strictly positive).
    pub fn check(&self, month: DeliveryMonth) -> Result<(), PricingError> {
        let values = [
            (PriceFactor::HenryHub, Some(self.henry_hub)),
            (PriceFactor::Jkm, Some(self.jkm)),
            (PriceFactor::Jkm, self.jkm_next_month),
            (PriceFactor::Brent, Some(self.brent)),
            (PriceFactor::Freight, Some(self.freight_rate)),
        ];
        for (factor, value) in values {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(PricingError::InvalidPrice {
                        month,
                        factor,
                        value,
                    });
                }
            }
        }
        if !self.fx.is_finite() || self.fx <= 0.0 {
            return Err(PricingError::InvalidPrice {
                month,
                factor: PriceFactor::Fx,
                value: self.fx,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> PriceInputs {
        PriceInputs {
            henry_hub: 3.5,
            jkm: 12.0,
            jkm_next_month: Some(12.5),
            brent: 80.0,
            freight_rate: 60_000.0,
            fx: 150.0,
        }
    }

    #[test]
    fn test_jkm_map_moves_both_months() {
        let shocked = inputs().map(PriceFactor::Jkm, |v| v * 2.0);
        assert_eq!(shocked.jkm, 24.0);
        assert_eq!(shocked.jkm_next_month, Some(25.0));
        assert_eq!(shocked.brent, 80.0);
    }

    #[test]
    fn test_check_rejects_negative_and_zero_fx() {
        let month = DeliveryMonth::new(2025, 11).unwrap();
        assert!(inputs().check(month).is_ok());

        let negative = inputs().map(PriceFactor::Brent, |_| -1.0);
        assert!(matches!(
            negative.check(month),
            Err(PricingError::InvalidPrice {
                factor: PriceFactor::Brent,
                ..
            })
        ));

        let zero_fx = inputs().map(PriceFactor::Fx, |_| 0.0);
        assert!(zero_fx.check(month).is_err());

        let nan = inputs().map(PriceFactor::HenryHub, |_| f64::NAN);
        assert!(nan.check(month).is_err());
    }
}
