//! Accounts and the service operating on them

pub mod models;
pub mod service;

pub use models::{Account, AccountDraft, Profile, REDACTED_PASSWORD};
pub use service::AccountService;
