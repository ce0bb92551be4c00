//! API route handlers

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::extract::{ApiJson, IgnoredBody};
use super::server::SharedState;
use crate::account::{AccountDraft, Profile};
use crate::auth::{SessionToken, TOKEN_HEADER};
use crate::error::{Error, MessageBody, Result};

pub const LOGIN_SUCCESS: &str = "Login Success";
pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTER_SUCCESS: &str = "Register success";
pub const REGISTER_FAILED: &str = "Register failed";

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: i32,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub msisdn: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: i32,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

fn message(status: StatusCode, text: &str) -> Response {
    (
        status,
        Json(MessageBody {
            message: text.to_string(),
        }),
    )
        .into_response()
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

// Account routes

pub async fn login(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Response> {
    let token = state
        .service
        .login(&req.username, &req.password, req.role)
        .await?;

    let Some(token) = token else {
        return Ok(message(StatusCode::UNAUTHORIZED, LOGIN_FAILED));
    };

    let mut response = message(StatusCode::OK, LOGIN_SUCCESS);
    let value = HeaderValue::from_str(&token)
        .map_err(|e| Error::Other(format!("unencodable token: {}", e)))?;
    response.headers_mut().insert(TOKEN_HEADER, value);
    Ok(response)
}

pub async fn register(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Response {
    let draft = AccountDraft {
        email: req.email,
        msisdn: req.msisdn,
        username: req.username,
        password: req.password,
    };

    match state.service.register(draft, req.role).await {
        Ok(_) => message(StatusCode::OK, REGISTER_SUCCESS),
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                tracing::error!("Register failed: {}", e);
            }
            message(status, REGISTER_FAILED)
        }
    }
}

pub async fn view_profile(
    State(state): State<SharedState>,
    SessionToken(token): SessionToken,
    _body: IgnoredBody,
) -> Result<Json<Profile>> {
    let profile = state.service.view_profile(&token).await?;
    Ok(Json(profile))
}
