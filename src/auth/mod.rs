//! Authentication: credential hashing, token issuance and session management

pub mod issuer;
pub mod middleware;
pub mod password;
pub mod session;

pub use issuer::TokenIssuer;
pub use middleware::{extract_session_token, SessionToken, TOKEN_HEADER};
pub use password::{BcryptHasher, PasswordHasher};
pub use session::{Session, SessionManager};
