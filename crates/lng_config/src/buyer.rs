//! Buyers and credit terms.

use lng_core::types::{BuyerId, CreditRating, DestinationId};
use serde::{Deserialize, Serialize};

/// An offtake counterparty, affiliated with exactly one destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buyer {
    /// Identifier
    pub id: BuyerId,
    /// The only destination this buyer takes delivery at
    pub destination: DestinationId,
    /// Premium (or discount if negative) over the linked benchmark, $/MMBtu
    #[serde(default)]
    pub premium: f64,
    /// Credit rating
    pub rating: CreditRating,
    /// Explicit per-cargo default probability, overriding the rating table
    #[serde(default)]
    pub default_probability: Option<f64>,
    /// Explicit recovery rate, overriding the rating table
    #[serde(default)]
    pub recovery_rate: Option<f64>,
    /// Months of notice required before delivery
    #[serde(default)]
    pub lead_time_months: u32,
}

/// Default probability and recovery applied to a buyer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditTerms {
    /// Probability the buyer defaults on this cargo
    pub default_probability: f64,
    /// Fraction of revenue recovered on default
    pub recovery_rate: f64,
}

impl CreditTerms {
    /// Expected loss as a fraction of revenue: `PD * (1 - R)`.
    #[inline]
    pub fn loss_fraction(&self) -> f64 {
        self.default_probability * (1.0 - self.recovery_rate)
    }
}

/// Rating-table row mapping a rating to credit terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditTableEntry {
    /// Rating the row applies to
    pub rating: CreditRating,
    /// Per-cargo default probability
    pub default_probability: f64,
    /// Recovery rate
    pub recovery_rate: f64,
}

/// Resolves a buyer's credit terms.
///
/// Buyer overrides win, then the configured table, then the indicative
/// mapping on [`CreditRating`].
pub fn resolve_credit(buyer: &Buyer, table: &[CreditTableEntry]) -> CreditTerms {
    let row = table.iter().find(|e| e.rating == buyer.rating);
    let default_probability = buyer
        .default_probability
        .or(row.map(|r| r.default_probability))
        .unwrap_or_else(|| buyer.rating.indicative_default_probability());
    let recovery_rate = buyer
        .recovery_rate
        .or(row.map(|r| r.recovery_rate))
        .unwrap_or_else(|| buyer.rating.indicative_recovery_rate());
    CreditTerms {
        default_probability,
        recovery_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn buyer(rating: CreditRating) -> Buyer {
        Buyer {
            id: BuyerId::new("B"),
            destination: DestinationId::new("D"),
            premium: 0.0,
            rating,
            default_probability: None,
            recovery_rate: None,
            lead_time_months: 0,
        }
    }

    #[test]
    fn test_resolution_order() {
        let table = [CreditTableEntry {
            rating: CreditRating::BBB,
            default_probability: 0.02,
            recovery_rate: 0.5,
        }];

        let from_table = resolve_credit(&buyer(CreditRating::BBB), &table);
        assert_eq!(from_table.default_probability, 0.02);

        let mut overridden = buyer(CreditRating::BBB);
        overridden.default_probability = Some(0.05);
        let terms = resolve_credit(&overridden, &table);
        assert_eq!(terms.default_probability, 0.05);
        assert_eq!(terms.recovery_rate, 0.5);

        let indicative = resolve_credit(&buyer(CreditRating::AA), &table);
        assert_eq!(
            indicative.default_probability,
            CreditRating::AA.indicative_default_probability()
        );
    }

    #[test]
    fn test_loss_fraction() {
        let terms = CreditTerms {
            default_probability: 0.02,
            recovery_rate: 0.4,
        };
        assert_relative_eq!(terms.loss_fraction(), 0.012, epsilon = 1e-15);
    }
}
