//! Surcharge call ledger.
//!
//! Tracks charged calls per (destination, window, calendar year) so capped
//! surcharges stop applying once the yearly allowance is used. Pricing only
//! reads the ledger; the optimiser records a call when it commits a cargo.

use lng_config::Destination;
use lng_core::types::{DeliveryMonth, DestinationId};
use std::collections::HashMap;

/// Charged-call counters threaded through a strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurchargeLedger {
    calls: HashMap<(DestinationId, String, i32), u32>,
}

impl SurchargeLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls already charged under a window in a year.
    pub fn calls(&self, destination: &DestinationId, window: &str, year: i32) -> u32 {
        self.calls
            .get(&(destination.clone(), window.to_string(), year))
            .copied()
            .unwrap_or(0)
    }

    /// Surcharge a call at `destination` in `month` would pay now.
    pub fn quote(&self, destination: &Destination, month: DeliveryMonth, vessel_flag: &str) -> f64 {
        destination
            .surcharges
            .iter()
            .filter(|w| w.applies(month, vessel_flag))
            .filter(|w| self.calls(&destination.id, &w.name, month.year()) < w.max_calls_per_year)
            .map(|w| w.amount_per_call)
            .sum()
    }

    /// Records a committed call, consuming one allowance in every window that
    /// charged it. Returns the amount charged.
    pub fn record(
        &mut self,
        destination: &Destination,
        month: DeliveryMonth,
        vessel_flag: &str,
    ) -> f64 {
        let mut charged = 0.0;
        for w in destination.surcharges.iter().filter(|w| w.applies(month, vessel_flag)) {
            let counter = self
                .calls
                .entry((destination.id.clone(), w.name.clone(), month.year()))
                .or_insert(0);
            if *counter < w.max_calls_per_year {
                *counter += 1;
                charged += w.amount_per_call;
            }
        }
        charged
    }

    /// Total charged calls across every window.
    pub fn total_calls(&self) -> u32 {
        self.calls.values().sum()
    }
}
