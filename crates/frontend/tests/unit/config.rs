//! # Configuration Tests
//!
//! Verifies defaults and JSON parsing of the frontend configuration.

use ftbsim_core::common::FrontendError;
use ftbsim_core::config::{FetchConfig, FrontendConfig, FtbConfig};

#[test]
fn defaults_match_hardware_constants() {
    let config = FrontendConfig::default();
    assert_eq!(config.ftb.max_block_span, 34);
    assert_eq!(config.fetch.fetch_block_bytes, 32);
    assert_eq!(FtbConfig::default().max_block_span, 34);
    assert_eq!(FetchConfig::default().fetch_block_bytes, 32);
}

#[test]
fn empty_document_uses_defaults() {
    let config = FrontendConfig::from_json("{}").unwrap();
    assert_eq!(config.ftb.max_block_span, 34);
    assert_eq!(config.fetch.fetch_block_bytes, 32);
}

#[test]
fn partial_sections_fill_missing_fields() {
    let config = FrontendConfig::from_json(r#"{ "ftb": {} , "fetch": { "fetch_block_bytes": 16 } }"#)
        .unwrap();
    assert_eq!(config.ftb.max_block_span, 34);
    assert_eq!(config.fetch.fetch_block_bytes, 16);
}

#[test]
fn wrong_type_is_a_config_error() {
    let err = FrontendConfig::from_json(r#"{ "ftb": { "max_block_span": "wide" } }"#).unwrap_err();
    assert!(matches!(err, FrontendError::Config(_)), "got {err:?}");
}

#[test]
fn malformed_json_is_a_config_error() {
    assert!(matches!(
        FrontendConfig::from_json("{ ftb"),
        Err(FrontendError::Config(_))
    ));
}
