//! Login, registration and profile lookup

use std::sync::Arc;

use crate::account::models::{Account, AccountDraft, Profile, STATUS_ACTIVE_UNVERIFIED};
use crate::auth::{PasswordHasher, SessionManager, TokenIssuer};
use crate::error::{Error, Result};
use crate::store::{AccountStore, RetryPolicy};

/// Orchestrates the account store, password hasher, token issuer and
/// session store. Cheap to clone; every handle is shared.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<TokenIssuer>,
    sessions: SessionManager,
    retry: RetryPolicy,
    /// Digest checked against when the username is unknown, so every failed
    /// login pays the same hashing cost
    decoy_digest: Arc<str>,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<TokenIssuer>,
        sessions: SessionManager,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let decoy_digest = hasher.hash(&issuer.issue_session_token())?.into();
        Ok(Self {
            store,
            hasher,
            issuer,
            sessions,
            retry,
            decoy_digest,
        })
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Authenticate and open a session.
    ///
    /// Unknown username, wrong password and role mismatch all yield
    /// `Ok(None)` so callers cannot tell them apart. Only store or hashing
    /// failures are errors.
    pub async fn login(&self, username: &str, password: &str, role: i32) -> Result<Option<String>> {
        let account = self
            .retry
            .lookup("find_by_username", || self.store.find_by_username(username))
            .await?;

        let Some(account) = account else {
            self.verify_password(password, &self.decoy_digest).await?;
            tracing::info!("Login rejected");
            return Ok(None);
        };

        let matches = self.verify_password(password, &account.password_hash).await?;
        if !matches || account.role != role {
            tracing::info!("Login rejected");
            return Ok(None);
        }

        let token = self.issuer.issue_session_token();
        self.sessions
            .create_session(token.clone(), account.id.clone(), account.role)
            .await;

        tracing::info!("Account {} logged in", account.id);
        Ok(Some(token))
    }

    /// Create a new account. Uniqueness is left to the store; a duplicate
    /// surfaces as [`Error::Conflict`].
    pub async fn register(&self, draft: AccountDraft, role: i32) -> Result<Account> {
        validate_draft(&draft)?;

        let password_hash = self.hash_password(draft.password).await?;

        let account = Account {
            id: self.issuer.next_account_id(),
            email: draft.email,
            msisdn: draft.msisdn,
            username: draft.username,
            password_hash,
            status: STATUS_ACTIVE_UNVERIFIED,
            role,
            created_at: chrono::Utc::now(),
        };

        // Inserts have no deduplication guard, so they are never retried
        self.retry
            .once("insert", self.store.insert(&account))
            .await
            .inspect_err(|e| tracing::warn!("Registration failed: {}", e))?;

        tracing::info!("Registered account {}", account.id);
        Ok(account)
    }

    /// Resolve a session token to the caller's profile, password redacted
    pub async fn view_profile(&self, token: &str) -> Result<Profile> {
        let session = self
            .sessions
            .get_session(token)
            .await
            .ok_or_else(|| Error::Unauthorized("invalid or expired session".to_string()))?;

        let account = self
            .retry
            .lookup("find_by_id", || self.store.find_by_id(&session.account_id))
            .await?;

        match account {
            Some(account) => {
                tracing::debug!(
                    "Profile served for account {} (role {})",
                    account.id,
                    session.role
                );
                Ok(account.profile())
            }
            None => {
                // Account vanished underneath a live session
                self.sessions.delete_session(token).await;
                Err(Error::Unauthorized("invalid or expired session".to_string()))
            }
        }
    }

    async fn hash_password(&self, password: String) -> Result<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password)).await?
    }

    async fn verify_password(&self, password: &str, digest: &str) -> Result<bool> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let digest = digest.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest)).await?
    }
}

fn validate_draft(draft: &AccountDraft) -> Result<()> {
    if draft.username.trim().is_empty() {
        return Err(Error::InvalidRequest("username must not be empty".to_string()));
    }
    if draft.email.trim().is_empty() {
        return Err(Error::InvalidRequest("email must not be empty".to_string()));
    }
    if draft.password.is_empty() {
        return Err(Error::InvalidRequest("password must not be empty".to_string()));
    }
    Ok(())
}
