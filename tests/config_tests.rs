//! Configuration loading tests
//!
//! Run with: cargo test --test config_tests

use accountd::config::{load_config_from_path, load_or_default, Config, StoreBackend};
use accountd::error::Error;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.max_body_bytes, 5000);
    assert_eq!(config.database.backend, StoreBackend::Postgres);
    assert_eq!(config.auth.node_id, 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("accountd.toml");
    fs::write(
        &path,
        r#"
[server]
port = 9000

[database]
backend = "memory"
"#,
    )
    .unwrap();

    let config = load_config_from_path(&path).expect("load config");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.max_body_bytes, 5000);
    assert_eq!(config.database.backend, StoreBackend::Memory);
    assert_eq!(config.auth.session_ttl_secs, 1800);
}

#[test]
fn test_env_interpolation_in_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("accountd.toml");
    std::env::set_var("ACCOUNTD_CONFIG_TEST_DB", "db.internal");
    fs::write(
        &path,
        r#"
[database]
host = "${ACCOUNTD_CONFIG_TEST_DB}"
user = "${ACCOUNTD_CONFIG_TEST_MISSING:-svc}"
"#,
    )
    .unwrap();

    let config = load_config_from_path(&path).expect("load config");
    assert_eq!(config.database.host, "db.internal");
    assert_eq!(config.database.user, "svc");
    std::env::remove_var("ACCOUNTD_CONFIG_TEST_DB");
}

#[test]
fn test_invalid_values_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("accountd.toml");
    fs::write(&path, "[auth]\nnode_id = 4096\n").unwrap();

    let result = load_config_from_path(&path);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_invalid_toml_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("accountd.toml");
    fs::write(&path, "this is [ not valid toml").unwrap();

    let result = load_config_from_path(&path);
    assert!(matches!(result, Err(Error::TomlParse(_))));
}

#[test]
fn test_missing_explicit_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");

    let result = load_or_default(Some(path.as_path()));
    assert!(matches!(result, Err(Error::ConfigNotFound)));
}

#[test]
fn test_unreadable_config_is_not_treated_as_missing() {
    let dir = TempDir::new().unwrap();

    // A directory exists but cannot be read as a file
    let result = load_or_default(Some(dir.path()));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_round_trip_through_toml() {
    let config = Config::default();
    let text = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.database.dbname, config.database.dbname);
    assert_eq!(parsed.auth.bcrypt_cost, config.auth.bcrypt_cost);
}
