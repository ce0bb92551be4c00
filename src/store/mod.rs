//! Account persistence
//!
//! The service only talks to storage through [`AccountStore`]. Uniqueness of
//! usernames and emails is the store's job; implementations report a
//! violation as [`Error::Conflict`](crate::error::Error::Conflict).

pub mod memory;
pub mod postgres;
pub mod retry;

use async_trait::async_trait;
use std::sync::Arc;

use crate::account::Account;
use crate::config::{DatabaseConfig, StoreBackend};
use crate::error::Result;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use retry::RetryPolicy;

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch an account by login name
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>>;

    /// Fetch an account by its identifier
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>>;

    /// Persist a new account
    async fn insert(&self, account: &Account) -> Result<()>;
}

/// Build the store selected in configuration. Called once at startup.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn AccountStore>> {
    match config.backend {
        StoreBackend::Postgres => {
            let store = PostgresStore::connect(config).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory account store; accounts are lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
