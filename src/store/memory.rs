//! In-process account store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::AccountStore;
use crate::account::Account;
use crate::error::{Error, Result};

/// HashMap-backed store with the same unique constraints as the SQL schema
#[derive(Clone, Default)]
pub struct MemoryStore {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.username == username).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn insert(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(&account.id) {
            return Err(Error::Conflict(format!("id '{}' already exists", account.id)));
        }
        if accounts.values().any(|a| a.username == account.username) {
            return Err(Error::Conflict(format!(
                "username '{}' already exists",
                account.username
            )));
        }
        if accounts.values().any(|a| a.email == account.email) {
            return Err(Error::Conflict(format!(
                "email '{}' already exists",
                account.email
            )));
        }

        accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str, username: &str, email: &str) -> Account {
        Account {
            id: id.to_string(),
            email: email.to_string(),
            msisdn: "123".to_string(),
            username: username.to_string(),
            password_hash: "digest".to_string(),
            status: 0,
            role: 0,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryStore::new();
        store.insert(&account("1", "alice", "a@b.com")).await.unwrap();

        let by_name = store.find_by_username("alice").await.unwrap();
        assert_eq!(by_name.map(|a| a.id), Some("1".to_string()));

        let by_id = store.find_by_id("1").await.unwrap();
        assert_eq!(by_id.map(|a| a.username), Some("alice".to_string()));

        assert!(store.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_username() {
        let store = MemoryStore::new();
        store.insert(&account("1", "alice", "a@b.com")).await.unwrap();

        let result = store.insert(&account("2", "alice", "other@b.com")).await;
        assert!(matches!(result, Err(Error::Conflict(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unique_email() {
        let store = MemoryStore::new();
        store.insert(&account("1", "alice", "a@b.com")).await.unwrap();

        let result = store.insert(&account("2", "bob", "a@b.com")).await;
        assert!(matches!(result, Err(Error::Conflict(_))));
    }
}
