//! CLI interface for accountd

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "accountd")]
#[command(version)]
#[command(about = "User-account service: login, registration and profile viewing", long_about = None)]
pub struct Cli {
    /// Path to accountd.toml (searched upward from the working directory if omitted)
    #[arg(short, long, global = true, env = "ACCOUNTD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default accountd.toml into the current directory
    Init,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create the accounts table in the configured database
    Migrate,

    /// Load and validate the configuration, then print it
    CheckConfig,
}
