//! Account models

use serde::{Deserialize, Serialize};

/// Marker returned in place of credential material
pub const REDACTED_PASSWORD: &str = "*";

/// Lifecycle status assigned to every new account
pub const STATUS_ACTIVE_UNVERIFIED: i32 = 0;

/// A persisted account record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique identifier, assigned at creation
    pub id: String,
    pub email: String,
    /// Phone number
    pub msisdn: String,
    pub username: String,
    /// Salted one-way digest, never the raw secret
    pub password_hash: String,
    pub status: i32,
    pub role: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Account {
    /// Public view of the account with credentials redacted
    pub fn profile(&self) -> Profile {
        Profile::from(self)
    }
}

/// Caller-supplied fields for a new account
#[derive(Debug, Clone, Default)]
pub struct AccountDraft {
    pub email: String,
    pub msisdn: String,
    pub username: String,
    pub password: String,
}

/// Account as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub msisdn: String,
    pub username: String,
    /// Always [`REDACTED_PASSWORD`]
    pub password: String,
    pub status: i32,
    pub role: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Account> for Profile {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            email: account.email.clone(),
            msisdn: account.msisdn.clone(),
            username: account.username.clone(),
            password: REDACTED_PASSWORD.to_string(),
            status: account.status,
            role: account.role,
            created_at: account.created_at,
        }
    }
}
