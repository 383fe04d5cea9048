//! Buyer credit ratings.

use std::fmt;

/// Credit rating following the standard agency scale.
///
/// Ratings range from AAA (highest quality) to D (default). Ordering follows
/// credit quality: `AAA < AA < ... < D`, so "better than" is `<`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreditRating {
    /// Highest quality (prime)
    AAA,
    /// High quality
    AA,
    /// Upper medium grade
    A,
    /// Lower medium grade (investment grade threshold)
    BBB,
    /// Non-investment grade speculative
    BB,
    /// Highly speculative
    B,
    /// Substantial risks
    CCC,
    /// Extremely speculative
    CC,
    /// In default with little prospect for recovery
    C,
    /// In default
    D,
}

impl CreditRating {
    /// Returns whether this rating is investment grade (BBB or better).
    #[inline]
    pub fn is_investment_grade(&self) -> bool {
        *self <= CreditRating::BBB
    }

    /// Returns whether this rating is at least as good as `floor`.
    #[inline]
    pub fn at_least(&self, floor: CreditRating) -> bool {
        *self <= floor
    }

    /// Returns an indicative per-cargo default probability for this rating.
    ///
    /// Used when neither the buyer nor the configuration credit table supplies
    /// a figure. Values are indicative only.
    pub fn indicative_default_probability(&self) -> f64 {
        match self {
            CreditRating::AAA => 0.0001,
            CreditRating::AA => 0.0005,
            CreditRating::A => 0.001,
            CreditRating::BBB => 0.002,
            CreditRating::BB => 0.01,
            CreditRating::B => 0.03,
            CreditRating::CCC => 0.10,
            CreditRating::CC => 0.20,
            CreditRating::C => 0.40,
            CreditRating::D => 1.0,
        }
    }

    /// Returns an indicative recovery rate for this rating.
    pub fn indicative_recovery_rate(&self) -> f64 {
        match self {
            CreditRating::AAA | CreditRating::AA | CreditRating::A => 0.4,
            CreditRating::BBB | CreditRating::BB => 0.35,
            CreditRating::B | CreditRating::CCC => 0.3,
            CreditRating::CC | CreditRating::C | CreditRating::D => 0.2,
        }
    }

    /// Get the agency code of this rating.
    pub fn code(&self) -> &'static str {
        match self {
            CreditRating::AAA => "AAA",
            CreditRating::AA => "AA",
            CreditRating::A => "A",
            CreditRating::BBB => "BBB",
            CreditRating::BB => "BB",
            CreditRating::B => "B",
            CreditRating::CCC => "CCC",
            CreditRating::CC => "CC",
            CreditRating::C => "C",
            CreditRating::D => "D",
        }
    }
}

impl fmt::Display for CreditRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_investment_grade_threshold() {
        assert!(CreditRating::BBB.is_investment_grade());
        assert!(!CreditRating::BB.is_investment_grade());
    }

    #[test]
    fn test_at_least() {
        assert!(CreditRating::AA.at_least(CreditRating::A));
        assert!(CreditRating::A.at_least(CreditRating::A));
        assert!(!CreditRating::BBB.at_least(CreditRating::A));
    }

    #[test]
    fn test_default_probability_increases_down_the_scale() {
        let ratings = [
            CreditRating::AAA,
            CreditRating::AA,
            CreditRating::A,
            CreditRating::BBB,
            CreditRating::BB,
            CreditRating::B,
        ];
        for pair in ratings.windows(2) {
            assert!(
                pair[0].indicative_default_probability() < pair[1].indicative_default_probability()
            );
        }
    }
}
