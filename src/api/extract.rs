//! Request body extraction

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection},
        FromRequest, Request,
    },
    http::StatusCode,
    Json,
};

use crate::error::Error;

/// `Json<T>` whose rejections are rendered through [`Error`], so malformed
/// or oversized bodies get the same `{message}` shape as every other error
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

/// Body of an endpoint that reads nothing from it. Empty or well-formed JSON
/// passes and is discarded; malformed JSON and oversized bodies are rejected
/// like they are everywhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoredBody;

impl<S> FromRequest<S> for IgnoredBody
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(IgnoredBody);
        }
        serde_json::from_slice::<serde_json::Value>(&bytes)
            .map_err(|e| Error::InvalidRequest(format!("malformed JSON body: {}", e)))?;
        Ok(IgnoredBody)
    }
}

impl From<BytesRejection> for Error {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Error::PayloadTooLarge;
        }
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Error::PayloadTooLarge;
        }
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                Error::InvalidRequest("expected Content-Type: application/json".to_string())
            }
            other => Error::InvalidRequest(format!("malformed JSON body: {}", other.body_text())),
        }
    }
}
