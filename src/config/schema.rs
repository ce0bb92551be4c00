//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Requests with a larger body are rejected with 413
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Which account store implementation backs the service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default = "default_db_host")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_db_user")]
    pub user: String,

    #[serde(default = "default_db_password")]
    pub password: String,

    #[serde(default = "default_db_name")]
    pub dbname: String,

    /// Upper bound on every single store call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Extra attempts for lookups that failed transiently. Inserts never retry.
    #[serde(default = "default_lookup_retries")]
    pub lookup_retries: u32,

    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_password() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "accountd".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_lookup_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    50
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: default_db_password(),
            dbname: default_db_name(),
            timeout_ms: default_timeout_ms(),
            lookup_retries: default_lookup_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl DatabaseConfig {
    /// libpq-style connection string for tokio-postgres
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, self.password, self.dbname
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Authentication and session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Idle lifetime of a session token
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Node bits of generated account ids (0..=1023)
    #[serde(default = "default_node_id")]
    pub node_id: u16,
}

fn default_session_ttl_secs() -> u64 {
    1800
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_node_id() -> u16 {
    1
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: default_session_ttl_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
            bcrypt_cost: default_bcrypt_cost(),
            node_id: default_node_id(),
        }
    }
}

impl AuthConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl Config {
    /// Reject values that would only fail later at runtime
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::Error;

        if self.server.max_body_bytes == 0 {
            return Err(Error::Config("server.max_body_bytes must be positive".into()));
        }
        if self.auth.node_id > crate::auth::issuer::MAX_NODE_ID {
            return Err(Error::Config(format!(
                "auth.node_id must be at most {}",
                crate::auth::issuer::MAX_NODE_ID
            )));
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(Error::Config(
                "auth.bcrypt_cost must be between 4 and 31".into(),
            ));
        }
        if self.auth.session_ttl_secs == 0 {
            return Err(Error::Config("auth.session_ttl_secs must be positive".into()));
        }
        if self.auth.cleanup_interval_secs == 0 {
            return Err(Error::Config(
                "auth.cleanup_interval_secs must be positive".into(),
            ));
        }
        if self.database.timeout_ms == 0 {
            return Err(Error::Config("database.timeout_ms must be positive".into()));
        }
        Ok(())
    }
}
