//! Strategy profiles: buyer eligibility filters and volume policies.

use crate::buyer::CreditTerms;
use lng_core::types::{BuyerId, CreditRating};
use serde::{Deserialize, Serialize};

/// How a profile chooses cargo volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumePolicy {
    /// Search all configured multipliers
    #[default]
    Optimise,
    /// Always nominate this multiplier
    Fixed(f64),
}

/// Buyer eligibility filter. Empty filter admits every buyer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuyerFilter {
    /// Worst acceptable rating
    #[serde(default)]
    pub min_rating: Option<CreditRating>,
    /// Highest acceptable default probability
    #[serde(default)]
    pub max_default_probability: Option<f64>,
    /// Explicit allow-list
    #[serde(default)]
    pub allowed_buyers: Option<Vec<BuyerId>>,
}

impl BuyerFilter {
    /// Checks a buyer against the filter, returning the rejection reason.
    pub fn check(
        &self,
        buyer: &BuyerId,
        rating: CreditRating,
        credit: &CreditTerms,
    ) -> Result<(), String> {
        if let Some(floor) = self.min_rating {
            if !rating.at_least(floor) {
                return Err(format!("rating {} below {}", rating, floor));
            }
        }
        if let Some(max_pd) = self.max_default_probability {
            if credit.default_probability > max_pd {
                return Err(format!(
                    "default probability {} above {}",
                    credit.default_probability, max_pd
                ));
            }
        }
        if let Some(allowed) = &self.allowed_buyers {
            if !allowed.contains(buyer) {
                return Err("not on allow-list".to_string());
            }
        }
        Ok(())
    }
}

/// A named strategy: eligibility filter plus volume policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyProfile {
    /// Display name
    pub name: String,
    /// Buyer eligibility
    #[serde(default)]
    pub filter: BuyerFilter,
    /// Volume policy
    #[serde(default)]
    pub volume: VolumePolicy,
}

impl StrategyProfile {
    /// Unrestricted profile.
    pub fn optimal() -> Self {
        Self {
            name: "Optimal".to_string(),
            filter: BuyerFilter::default(),
            volume: VolumePolicy::Optimise,
        }
    }

    /// Buyers rated A or better.
    pub fn conservative() -> Self {
        Self {
            name: "Conservative".to_string(),
            filter: BuyerFilter {
                min_rating: Some(CreditRating::A),
                ..BuyerFilter::default()
            },
            volume: VolumePolicy::Optimise,
        }
    }

    /// All buyers at the given (maximum) multiplier.
    pub fn high_exposure(max_multiplier: f64) -> Self {
        Self {
            name: "High exposure".to_string(),
            filter: BuyerFilter::default(),
            volume: VolumePolicy::Fixed(max_multiplier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TERMS: CreditTerms = CreditTerms {
        default_probability: 0.01,
        recovery_rate: 0.4,
    };

    #[test]
    fn test_conservative_rejects_bbb() {
        let profile = StrategyProfile::conservative();
        let id = BuyerId::new("X");
        assert!(profile.filter.check(&id, CreditRating::AA, &TERMS).is_ok());
        let err = profile
            .filter
            .check(&id, CreditRating::BBB, &TERMS)
            .unwrap_err();
        assert!(err.contains("BBB"));
    }

    #[test]
    fn test_pd_and_allow_list() {
        let filter = BuyerFilter {
            min_rating: None,
            max_default_probability: Some(0.005),
            allowed_buyers: Some(vec![BuyerId::new("A")]),
        };
        assert!(filter
            .check(&BuyerId::new("A"), CreditRating::AA, &TERMS)
            .is_err());
        let safe = CreditTerms {
            default_probability: 0.001,
            recovery_rate: 0.4,
        };
        assert!(filter.check(&BuyerId::new("A"), CreditRating::AA, &safe).is_ok());
        assert!(filter.check(&BuyerId::new("B"), CreditRating::AA, &safe).is_err());
    }
}
