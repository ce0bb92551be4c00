//! Credential hashing

use crate::error::Result;

/// One-way credential digest used to store and verify account passwords.
///
/// Implementations are CPU-bound; callers on the async runtime should run
/// them through `tokio::task::spawn_blocking`.
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted digest for storage
    fn hash(&self, password: &str) -> Result<String>;

    /// Check a candidate password against a stored digest
    fn verify(&self, password: &str, digest: &str) -> Result<bool>;
}

/// bcrypt with a configurable work factor
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool> {
        Ok(bcrypt::verify(password, digest)?)
    }
}
