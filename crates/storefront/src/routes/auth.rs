//! Phone + OTP login.
//!
//! Both routes sit behind the auth rate limiter. The code itself is fixed by
//! configuration; "sending" it only writes a log line.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use yadukul_core::{Phone, Role, UserId};

use super::Message;
use crate::config::RateLimitConfig;
use crate::error::{Result, add_breadcrumb};
use crate::extract::ApiJson;
use crate::middleware::auth_rate_limiter;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Build the login router.
pub fn router(limits: &RateLimitConfig) -> Router<AppState> {
    Router::new()
        .route("/otp", post(request_otp))
        .route("/login", post(login))
        .route_layer(auth_rate_limiter(limits))
}

/// Body of `POST /api/users/otp`.
#[derive(Debug, Deserialize)]
pub struct OtpRequest {
    pub phone: String,
}

/// Body of `POST /api/users/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub role: Role,
    pub otp: String,
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub phone: Phone,
    pub role: Role,
    pub token: String,
}

/// Validate the phone number and "send" the login code.
#[instrument(skip_all)]
pub async fn request_otp(ApiJson(body): ApiJson<OtpRequest>) -> Result<Json<Message>> {
    AuthService::request_otp(&body.phone)?;
    Ok(Json(Message::new("OTP sent successfully")))
}

/// Check the code, find or create the user, and issue a bearer token.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let service = AuthService::new(state.pool(), &state.config().auth.otp_code);
    let user = service.login(&body.phone, body.role, &body.otp).await?;

    let token = state
        .tokens()
        .issue(user.id, user.role)
        .map_err(AuthError::from)?;

    let role = user.role.to_string();
    add_breadcrumb("auth", "User logged in", Some(&[("role", role.as_str())]));

    Ok(Json(LoginResponse {
        id: user.id,
        name: user.name,
        phone: user.phone,
        role: user.role,
        token,
    }))
}
