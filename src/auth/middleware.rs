//! Session token extraction from requests

use crate::error::{Error, Result};
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

/// Header carrying the session token, both on login responses and on
/// authenticated requests
pub const TOKEN_HEADER: &str = "token";

/// Pull the session token out of the `token` header, falling back to
/// `Authorization: Bearer <token>`
pub fn extract_session_token(headers: &HeaderMap) -> Result<String> {
    if let Some(value) = headers.get(TOKEN_HEADER) {
        if let Ok(token) = value.to_str() {
            let token = token.trim();
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
    }

    if let Some(auth_header) = headers.get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                let token = token.trim();
                if !token.is_empty() {
                    return Ok(token.to_string());
                }
            }
        }
    }

    Err(Error::Unauthorized("missing session token".to_string()))
}

/// Extractor for handlers that need the caller's session token
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        extract_session_token(&parts.headers).map(SessionToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_no_token() {
        let headers = HeaderMap::new();
        assert!(extract_session_token(&headers).is_err());
    }

    #[test]
    fn test_extract_token_header() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("abc123"));
        assert_eq!(extract_session_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn test_extract_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer xyz"));
        assert_eq!(extract_session_token(&headers).unwrap(), "xyz");
    }

    #[test]
    fn test_blank_token_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("   "));
        assert!(extract_session_token(&headers).is_err());
    }
}
