//! accountd - minimal user-account service
//!
//! Login, registration and profile viewing over HTTP, backed by a
//! relational store. The library exposes the service, its store adapters
//! and the axum router so they can be embedded or tested directly.

pub mod account;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;

pub use account::{Account, AccountService, Profile};
pub use config::Config;
pub use error::Error;
