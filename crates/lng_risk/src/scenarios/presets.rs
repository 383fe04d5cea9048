//! Preset market scenarios.

use super::shifts::{FactorShock, Scenario};
use lng_core::types::PriceFactor;
use serde::{Deserialize, Serialize};

/// Preset scenario kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetScenario {
    /// Asian demand rally: JKM +20%, Brent +10%
    Bull,
    /// Asian demand slump with firm US gas: JKM -20%, Brent -15%, Henry Hub +10%
    Bear,
    /// Regasification outage at a major importer: JKM -30%, Brent -10%,
    /// charter rates +25%
    StressTerminalOutage,
    /// Canal transit restrictions: charter rates +60%, Henry Hub -$0.50
    StressCanalDelay,
}

impl PresetScenario {
    /// Every preset in report order.
    pub const ALL: [PresetScenario; 4] = [
        Self::Bull,
        Self::Bear,
        Self::StressTerminalOutage,
        Self::StressCanalDelay,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bull => "Bull",
            Self::Bear => "Bear",
            Self::StressTerminalOutage => "Stress: terminal outage",
            Self::StressCanalDelay => "Stress: canal delay",
        }
    }

    /// Materialised scenario.
    pub fn scenario(&self) -> Scenario {
        let (description, shocks) = match self {
            Self::Bull => (
                "Asian demand rally",
                vec![
                    FactorShock::relative(PriceFactor::Jkm, 0.20),
                    FactorShock::relative(PriceFactor::Brent, 0.10),
                ],
            ),
            Self::Bear => (
                "Asian demand slump with firm US gas",
                vec![
                    FactorShock::relative(PriceFactor::Jkm, -0.20),
                    FactorShock::relative(PriceFactor::Brent, -0.15),
                    FactorShock::relative(PriceFactor::HenryHub, 0.10),
                ],
            ),
            Self::StressTerminalOutage => (
                "Regasification outage at a major importer",
                vec![
                    FactorShock::relative(PriceFactor::Jkm, -0.30),
                    FactorShock::relative(PriceFactor::Brent, -0.10),
                    FactorShock::relative(PriceFactor::Freight, 0.25),
                ],
            ),
            Self::StressCanalDelay => (
                "Canal transit restrictions lengthen the fleet's routing",
                vec![
                    FactorShock::relative(PriceFactor::Freight, 0.60),
                    FactorShock::absolute(PriceFactor::HenryHub, -0.50),
                ],
            ),
        };
        Scenario::new(self.name(), description, shocks)
    }

    /// Every preset, materialised.
    pub fn all() -> Vec<Scenario> {
        Self::ALL.iter().map(|p| p.scenario()).collect()
    }
}
