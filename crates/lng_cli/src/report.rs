//! Plain-text tables for an [`AnalysisReport`].

use std::path::Path;

use lng_optimiser::{Decision, Strategy};
use lng_risk::metrics::RiskMetrics;
use lng_risk::{AnalysisReport, MonteCarloOutcome};
use tracing::info;

use crate::{CliError, Result};

/// Formats dollars as millions, e.g. `-5.70m`.
pub fn millions(value: f64) -> String {
    format!("{:.2}m", value / 1e6)
}

fn rule(width: usize) {
    println!("{}", "─".repeat(width));
}

fn heading(title: &str) {
    println!("\n{}", title);
    rule(title.chars().count().max(72));
}

/// Prints every table of the report to stdout.
pub fn print(report: &AnalysisReport) {
    println!(
        "Delivery from {}; cancellation P&L {}",
        report.delivery_start,
        millions(report.cancellation_pnl)
    );
    print_summary(report);
    for strategy in &report.strategies {
        print_decisions(strategy);
    }
    print_embedded(report);
    print_monte_carlo(&report.monte_carlo);
    print_scenarios(report);
    print_tornado(report);
}

fn print_summary(report: &AnalysisReport) {
    heading("Strategy comparison");
    println!("{:<16} {:>14} {:>10} {:>8}", "Strategy", "Total P&L", "Delivered", "Cancel");
    for s in &report.summary {
        println!(
            "{:<16} {:>14} {:>10} {:>8}",
            s.name,
            millions(s.total_pnl),
            s.deliveries,
            s.cancellations
        );
    }
}

fn print_decisions(strategy: &Strategy) {
    heading(&format!("Decisions: {}", strategy.name()));
    println!(
        "{:<9} {:<8} {:<12} {:<16} {:>6} {:>12} {:>9}",
        "Month", "Action", "Destination", "Buyer", "Mult", "Net P&L", "Excluded"
    );
    for m in &strategy.months {
        let excluded = m.exclusions.len();
        match &m.decision {
            Decision::Deliver(c) => println!(
                "{:<9} {:<8} {:<12} {:<16} {:>6.2} {:>12} {:>9}",
                m.month.to_string(),
                "deliver",
                c.destination().to_string(),
                c.buyer().to_string(),
                c.multiplier,
                millions(c.net_pnl()),
                excluded
            ),
            Decision::Cancel { pnl } => println!(
                "{:<9} {:<8} {:<12} {:<16} {:>6} {:>12} {:>9}",
                m.month.to_string(),
                "cancel",
                "-",
                "-",
                "-",
                millions(*pnl),
                excluded
            ),
        }
    }
}

fn print_embedded(report: &AnalysisReport) {
    let table = &report.embedded_options;
    heading(&format!("Embedded options (cap {})", table.cap));
    println!(
        "{:<9} {:<12} {:<16} {:>12} {:>12} {:>9}",
        "Month", "Destination", "Buyer", "Expected", "Value", "Exercise"
    );
    for o in &table.options {
        println!(
            "{:<9} {:<12} {:<16} {:>12} {:>12} {:>9}",
            o.month.to_string(),
            o.destination.to_string(),
            o.buyer.to_string(),
            millions(o.expected_pnl),
            millions(o.value),
            if o.exercised { "yes" } else { "no" }
        );
    }
    println!("Total uplift: {}", millions(table.total_uplift));
}

fn metrics_row(label: &str, m: &RiskMetrics) {
    println!(
        "{:<24} {:>10} {:>10} {:>10} {:>10} {:>8.2} {:>8.1}%",
        label,
        millions(m.mean),
        millions(m.std_dev),
        millions(m.var),
        millions(m.cvar),
        m.sharpe,
        m.probability_of_profit * 100.0
    );
}

fn print_monte_carlo(outcome: &MonteCarloOutcome) {
    heading("Monte Carlo");
    let report = match outcome {
        MonteCarloOutcome::Available(report) => report,
        MonteCarloOutcome::Unavailable { reason } => {
            println!("unavailable: {}", reason);
            return;
        }
    };
    println!(
        "{} paths, seed {}{}",
        report.n_paths,
        report.seed,
        if report.covariance_repaired {
            ", covariance repaired"
        } else {
            ""
        }
    );
    if let Some(hedge) = &report.hedge {
        println!(
            "hedge: {} at ratio {:.2}, locked {} month(s) ahead",
            hedge.factor, hedge.ratio, hedge.timing_offset_months
        );
    }
    println!(
        "{:<24} {:>10} {:>10} {:>10} {:>10} {:>8} {:>9}",
        "Strategy", "Mean", "Std", "VaR", "CVaR", "Sharpe", "P(>0)"
    );
    for s in &report.strategies {
        metrics_row(&s.name, &s.unhedged);
        if let Some(hedged) = &s.hedged {
            metrics_row(&format!("{} (hedged)", s.name), hedged);
        }
    }
}

fn print_scenarios(report: &AnalysisReport) {
    heading("Scenarios");
    println!("{:<24} {:<16} {:>12} {:>12}", "Scenario", "Strategy", "Total", "vs base");
    for result in &report.scenarios {
        for s in &result.strategies {
            println!(
                "{:<24} {:<16} {:>12} {:>12}",
                result.scenario.name,
                s.strategy,
                millions(s.total_pnl),
                millions(s.delta_vs_base)
            );
        }
    }
}

fn print_tornado(report: &AnalysisReport) {
    let tornado = &report.tornado;
    heading(&format!(
        "Tornado: {} at ±{:.0}% (base {})",
        tornado.strategy,
        tornado.pct * 100.0,
        millions(tornado.base_pnl)
    ));
    println!("{:<12} {:>12} {:>12} {:>12}", "Factor", "Down", "Up", "Swing");
    for bar in &tornado.bars {
        println!(
            "{:<12} {:>12} {:>12} {:>12}",
            bar.factor.to_string(),
            millions(bar.low_delta),
            millions(bar.high_delta),
            millions(bar.swing())
        );
    }
}

/// Writes the report as pretty-printed JSON.
pub fn write_json(report: &AnalysisReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), "report written");
    Ok(())
}
