//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "accountd.toml";

/// Load configuration from accountd.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::ConfigNotFound,
        _ => Error::Io(e),
    })?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load from an explicit path, or search for accountd.toml and fall back to
/// defaults when none exists
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config_from_path(path),
        None => match load_config() {
            Ok(config) => Ok(config),
            Err(Error::ConfigNotFound) => {
                tracing::info!("No {} found, using defaults", CONFIG_FILENAME);
                Ok(Config::default())
            }
            Err(e) => Err(e),
        },
    }
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# accountd configuration

[server]
host = "0.0.0.0"
port = 8080
max_body_bytes = 5000

[database]
backend = "postgres"  # or "memory" for a throwaway in-process store
host = "${ACCOUNTD_DB_HOST:-localhost}"
port = 5432
user = "${ACCOUNTD_DB_USER:-postgres}"
password = "${ACCOUNTD_DB_PASSWORD:-postgres}"
dbname = "accountd"
timeout_ms = 5000
lookup_retries = 2
retry_backoff_ms = 50

[auth]
session_ttl_secs = 1800
cleanup_interval_secs = 60
bcrypt_cost = 12
node_id = 1
"#
}
