//! Error types for accountd

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Store operation '{0}' timed out")]
    Timeout(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Config file not found. Run 'accountd init' first.")]
    ConfigNotFound,

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Other(format!("background task failed: {}", err))
    }
}

impl Error {
    /// HTTP status the boundary layer answers with for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidRequest(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Error::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether a failed idempotent store call may be attempted again
    pub fn is_transient(&self) -> bool {
        use tokio_postgres::error::SqlState;

        match self {
            Error::Timeout(_) => true,
            Error::Database(e) => {
                if e.is_closed() {
                    return true;
                }
                matches!(
                    e.code(),
                    Some(code) if *code == SqlState::CONNECTION_EXCEPTION
                        || *code == SqlState::CONNECTION_FAILURE
                        || *code == SqlState::CONNECTION_DOES_NOT_EXIST
                        || *code == SqlState::T_R_SERIALIZATION_FAILURE
                        || *code == SqlState::T_R_DEADLOCK_DETECTED
                        || *code == SqlState::ADMIN_SHUTDOWN
                )
            }
            _ => false,
        }
    }

    /// Message safe to hand to clients; internal details stay in the logs
    pub fn client_message(&self) -> String {
        match self {
            Error::InvalidRequest(msg) => msg.clone(),
            Error::Json(_) => "malformed JSON body".to_string(),
            Error::PayloadTooLarge => "payload too large".to_string(),
            Error::Unauthorized(msg) => msg.clone(),
            Error::Conflict(_) => "conflict".to_string(),
            Error::Timeout(_) => "upstream timeout".to_string(),
            Error::Database(_) => "service unavailable".to_string(),
            _ => "internal server error".to_string(),
        }
    }
}

/// JSON body shared by every handler response that carries only a message
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }
        let body = MessageBody {
            message: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
