//! Scenario and sensitivity analysis.
//!
//! - [`ShiftType`], [`FactorShock`], [`Scenario`]: shock definitions applied
//!   to every forecast month
//! - [`PresetScenario`]: bull, bear and two stress presets
//! - [`ScenarioAnalyzer`]: re-optimises every profile per scenario and builds
//!   the single-factor tornado

mod analyzer;
mod presets;
mod shifts;

pub use analyzer::{
    DecisionRow, ScenarioAnalyzer, ScenarioResult, ScenarioStrategyResult, TornadoBar,
    TornadoReport,
};
pub use presets::PresetScenario;
pub use shifts::{FactorShock, Scenario, ShiftType};
