//! Subscriber set-up.
//!
//! `RUST_LOG` wins when set. Otherwise every workspace crate logs at the
//! configured `analysis.log_level`, or at debug with `-v`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const TARGETS: [&str; 5] = ["lngdesk", "lng_config", "lng_pricing", "lng_optimiser", "lng_risk"];

/// Filter directives used when `RUST_LOG` is unset.
pub fn default_directives(verbose: bool, configured: &str) -> String {
    let level = if verbose {
        "debug".to_string()
    } else {
        configured.to_lowercase()
    };
    TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the global subscriber, writing to stderr so stdout stays clean
/// for tables.
pub fn init(verbose: bool, configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, configured)));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
