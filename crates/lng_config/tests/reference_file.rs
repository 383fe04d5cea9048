//! Integration tests for the bundled TOML configuration.

use lng_config::{reference_config, ConfigurationError, TradingConfig};
use std::path::PathBuf;

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../data")
        .join(name)
}

#[test]
fn test_bundled_file_matches_reference_preset() {
    let loaded = TradingConfig::load_and_validate(&data_path("reference_config.toml")).unwrap();
    assert_eq!(loaded, reference_config());
}

#[test]
fn test_missing_file_is_io_error() {
    let err = TradingConfig::load(&data_path("does_not_exist.toml")).unwrap_err();
    assert!(matches!(err, ConfigurationError::Io(_)));
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let err = TradingConfig::from_toml_str("contract = 3").unwrap_err();
    assert!(matches!(err, ConfigurationError::Parse(_)));
}

#[test]
fn test_buyer_with_unknown_destination_fails_before_pricing() {
    let text = std::fs::read_to_string(data_path("reference_config.toml"))
        .unwrap()
        .replace("destination = \"China\"", "destination = \"Korea\"");
    let config = TradingConfig::from_toml_str(&text).unwrap();
    let err = config.validate().unwrap_err();
    let unknown = err
        .problems()
        .into_iter()
        .filter(|e| matches!(e, ConfigurationError::UnknownDestination { .. }))
        .count();
    assert_eq!(unknown, 2);
}
