//! Tests for configuration module

use super::*;
use crate::error::{Error, Result};
use std::io::Write;
use tempfile::NamedTempFile;

fn create_temp_config_file(content: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .map_err(|e| Error::config(format!("Failed to create temp file: {e}")))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::config(format!("Failed to write temp file: {e}")))?;
    file.flush()
        .map_err(|e| Error::config(format!("Failed to flush temp file: {e}")))?;
    Ok(file)
}

fn with_env_var<F, T>(key: &str, value: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    std::env::set_var(key, value);
    let result = f();
    std::env::remove_var(key);
    result
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.backend.base_url, "http://127.0.0.1:8081");
    assert_eq!(config.backend.timeout_secs, 30);
    assert_eq!(config.search.debounce_ms, 300);
    assert_eq!(config.search.default_entity_kind, EntityKind::Subscription);
    assert_eq!(config.agent.name, "query_agent");
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_toml_str_valid() {
    let toml = r#"
        [backend]
        base_url = "https://search.example.net"
        timeout_secs = 5

        [search]
        debounce_ms = 500
        default_entity_kind = "WORKFLOW"
    "#;

    let config = Config::from_toml_str(toml).expect("Failed to parse valid TOML");
    assert_eq!(config.backend.base_url, "https://search.example.net");
    assert_eq!(config.backend.timeout_secs, 5);
    assert_eq!(config.search.debounce_duration().as_millis(), 500);
    assert_eq!(config.search.default_entity_kind, EntityKind::Workflow);
    assert_eq!(config.agent.name, "query_agent");
}

#[test]
fn test_from_toml_str_empty_uses_defaults() {
    let config = Config::from_toml_str("").expect("Failed to parse empty TOML");
    assert_eq!(config, Config::default());
}

#[test]
fn test_from_toml_str_invalid_kind() {
    let toml = r#"
        [search]
        default_entity_kind = "INVOICE"
    "#;
    assert!(Config::from_toml_str(toml).is_err());
}

#[test]
fn test_from_file_reads_values() {
    let file = create_temp_config_file(
        r#"
        [backend]
        base_url = "http://orchestrator.local:8080"
        "#,
    )
    .expect("temp file");

    let config = Config::from_file(file.path()).expect("Failed to load config");
    assert_eq!(config.backend.base_url, "http://orchestrator.local:8080");
    assert_eq!(config.backend.timeout_secs, 30);
}

#[test]
fn test_from_file_missing_file_uses_defaults() {
    let config = Config::from_file(std::path::Path::new("/nonexistent/wfo-search.toml"))
        .expect("Missing file should fall back to defaults");
    assert_eq!(config.backend.timeout_secs, 30);
}

#[test]
fn test_env_override() {
    let config = with_env_var("WFO_SEARCH_AGENT__NAME", "staging_agent", || {
        Config::from_file(std::path::Path::new("/nonexistent/wfo-search.toml"))
    })
    .expect("Failed to load config");
    assert_eq!(config.agent.name, "staging_agent");
}

#[test]
fn test_load_layered_explicit_missing_file_errors() {
    let result = Config::load_layered(Some(std::path::Path::new("/nonexistent/wfo.toml")));
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Config file not found"));
}

#[test]
fn test_load_layered_reports_explicit_source() {
    let file = create_temp_config_file(
        r#"
        [backend]
        timeout_secs = 12
        "#,
    )
    .expect("temp file");

    let (config, sources) = Config::load_layered(Some(file.path())).expect("load");
    assert_eq!(config.backend.timeout_secs, 12);
    assert!(sources.iter().any(|p| p == file.path()));
}

#[test]
fn test_validate_rejects_bad_url() {
    let mut config = Config::default();
    config.backend.base_url = "ftp://search".to_string();
    let result = config.validate();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Invalid backend.base_url"));

    config.backend.base_url = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_zero_timeout() {
    let mut config = Config::default();
    config.backend.timeout_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_debounce_range() {
    let mut config = Config::default();

    config.search.debounce_ms = 1;
    assert!(config.validate().is_ok());

    config.search.debounce_ms = 10_000;
    assert!(config.validate().is_ok());

    config.search.debounce_ms = 0;
    assert!(config.validate().is_err());

    config.search.debounce_ms = 10_001;
    let result = config.validate();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("debounce_ms"));
}

#[test]
fn test_toml_round_trip() {
    let config = Config::default();
    let text = config.to_toml_string().expect("serialize");
    assert!(text.contains("[backend]"));
    assert_eq!(Config::from_toml_str(&text).expect("parse"), config);
}
