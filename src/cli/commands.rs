//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::cli::{error, info, success, warn};
use crate::config::{self, loader::CONFIG_FILENAME, StoreBackend};
use crate::store::PostgresStore;

/// Initialize a new accountd.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Edit the database section, then run 'accountd migrate' and 'accountd serve'");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = config::load_or_default(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let host = config.server.host.clone();
    let port = config.server.port;
    info(&format!("Starting server at http://{}:{}", host, port));

    crate::api::run_server(config, &host, port).await?;
    Ok(())
}

/// Create the accounts table
pub async fn migrate(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_or_default(config_path)?;

    if config.database.backend == StoreBackend::Memory {
        warn("database.backend is 'memory'; nothing to migrate");
        return Ok(());
    }

    let store = match PostgresStore::connect(&config.database).await {
        Ok(store) => store,
        Err(e) => {
            error(&format!("Failed to connect to database: {}", e));
            return Err(e.into());
        }
    };
    store.migrate().await?;

    success("Account schema is up to date");
    Ok(())
}

/// Validate and print the effective configuration
pub async fn check_config(config_path: Option<&Path>) -> Result<()> {
    let mut config = config::load_or_default(config_path)?;
    config.database.password = "********".to_string();

    println!("{}", toml::to_string_pretty(&config)?);
    success("Configuration is valid");
    Ok(())
}
