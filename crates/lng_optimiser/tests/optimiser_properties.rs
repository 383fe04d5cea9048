//! Optimiser properties over perturbed reference forecasts.

use approx::assert_relative_eq;
use lng_config::{reference_config, StrategyProfile};
use lng_core::types::PriceFactor;
use lng_optimiser::{Decision, EmbeddedOptionValuer, StrategyOptimiser, TIE_TOLERANCE};
use lng_pricing::reference_market;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_decisions_are_optimal_and_affiliated(
        hh in 0.5..2.0f64,
        jkm in 0.5..2.0f64,
        brent in 0.5..2.0f64,
        freight in 0.5..2.0f64,
    ) {
        let config = reference_config();
        let forecasts = reference_market()
            .forecast_set()
            .unwrap()
            .map_factor(PriceFactor::HenryHub, |v| v * hh)
            .map_factor(PriceFactor::Jkm, |v| v * jkm)
            .map_factor(PriceFactor::Brent, |v| v * brent)
            .map_factor(PriceFactor::Freight, |v| v * freight);

        let optimiser = StrategyOptimiser::new(&config, &forecasts);
        for strategy in optimiser.optimise_all().unwrap() {
            for month in &strategy.months {
                let best_candidate = month
                    .candidates
                    .iter()
                    .map(|c| c.net_pnl())
                    .fold(f64::NEG_INFINITY, f64::max);
                match &month.decision {
                    Decision::Deliver(chosen) => {
                        prop_assert!(chosen.net_pnl() >= best_candidate - TIE_TOLERANCE);
                        prop_assert!(chosen.net_pnl() >= month.cancellation_pnl);
                        let buyer = config.buyer(chosen.buyer()).unwrap();
                        prop_assert_eq!(&buyer.destination, chosen.destination());
                    }
                    Decision::Cancel { pnl } => {
                        prop_assert!(best_candidate < *pnl);
                    }
                }
                for c in &month.candidates {
                    prop_assert!(config.contract.purchase_bounds.contains(c.pnl.purchase_volume));
                }
            }
        }
    }

    #[test]
    fn test_embedded_options_respect_cap(hh in 0.3..1.5f64) {
        let config = reference_config();
        let forecasts = reference_market()
            .forecast_set()
            .unwrap()
            .map_factor(PriceFactor::HenryHub, |v| v * hh);
        let base = StrategyOptimiser::new(&config, &forecasts)
            .optimise(&StrategyProfile::optimal())
            .unwrap();
        let report = EmbeddedOptionValuer::new(&config, &forecasts)
            .value(&base)
            .unwrap();
        prop_assert!(report.exercised().count() <= config.embedded_options.cap);
        prop_assert!(report.options.iter().all(|o| o.value >= 0.0));
        let positive = report.options.iter().filter(|o| o.value > 0.0).count();
        prop_assert_eq!(
            report.exercised().count(),
            positive.min(config.embedded_options.cap)
        );
    }
}

#[test]
fn test_surcharge_ledger_threads_through_schedule() {
    let config = reference_config();
    let forecasts = reference_market().forecast_set().unwrap();
    let strategy = StrategyOptimiser::new(&config, &forecasts)
        .optimise(&StrategyProfile::optimal())
        .unwrap();
    let china_calls = strategy
        .deliveries()
        .filter(|(_, c)| c.destination().as_str() == "China")
        .count() as u32;
    assert_eq!(strategy.ledger().total_calls(), china_calls);
}

#[test]
fn test_strategy_total_is_sum_of_months() {
    let config = reference_config();
    let forecasts = reference_market().forecast_set().unwrap();
    let optimiser = StrategyOptimiser::new(&config, &forecasts);
    let cancellation_pnl = optimiser.pricer().cancellation_pnl();
    for strategy in optimiser.optimise_all().unwrap() {
        let summed: f64 = strategy.months.iter().map(|m| m.pnl()).sum();
        assert_relative_eq!(strategy.total_pnl(), summed, max_relative = 1e-12);
        for month in &strategy.months {
            assert_relative_eq!(month.cancellation_pnl, cancellation_pnl);
        }
    }
}
