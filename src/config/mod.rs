//! Configuration management for accountd

pub mod loader;
mod schema;

pub use loader::{load_config, load_config_from_path, load_or_default};
pub use schema::*;
