// SPDX-License-Identifier: MIT

//! Passwordless email-code authentication routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::{
    create_session_token, session_from_jar, SESSION_COOKIE, SESSION_MAX_AGE_SECS,
};
use crate::models::user::{normalize_email, SessionUser};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/send-code", post(send_code))
        .route("/api/auth/verify-code", post(verify_code))
        .route("/api/auth/session", get(get_session).delete(logout))
}

/// Uniform random 6-digit verification code.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

#[derive(Deserialize)]
pub struct SendCodeRequest {
    #[serde(default)]
    email: String,
}

#[derive(Serialize)]
pub struct SendCodeResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(rename = "devMode", skip_serializing_if = "Option::is_none")]
    pub dev_mode: Option<bool>,
    /// Disclosed only when the dev-mode sender is active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Issue a one-time code for an institutional email address.
async fn send_code(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendCodeRequest>,
) -> Result<Json<SendCodeResponse>> {
    if req.email.is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }

    let email = normalize_email(&req.email);
    let domain_suffix = format!("@{}", state.config.allowed_email_domain);
    if !email.ends_with(&domain_suffix) {
        return Err(AppError::Validation(format!(
            "Please use your {domain_suffix} email address"
        )));
    }

    let code = generate_code();
    state.db.store_code(&email, &code).await?;

    let delivery = state.mailer.send_code(&email, &code).await?;

    tracing::info!(email = %email, dev_mode = delivery.dev_mode, "Verification code issued");

    Ok(Json(SendCodeResponse {
        success: true,
        message: "Verification code sent",
        dev_mode: delivery.dev_mode.then_some(true),
        code: delivery.dev_mode.then_some(code),
    }))
}

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    code: String,
}

#[derive(Serialize)]
pub struct VerifyCodeResponse {
    pub success: bool,
    pub user: SessionUser,
}

/// Exchange a one-time code for a session cookie. The code is consumed on
/// success; every failure mode reads the same to the caller.
async fn verify_code(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<VerifyCodeRequest>,
) -> Result<(CookieJar, Json<VerifyCodeResponse>)> {
    if req.email.is_empty() || req.code.is_empty() {
        return Err(AppError::Validation(
            "Email and code are required".to_string(),
        ));
    }

    let email = normalize_email(&req.email);

    if !state.db.verify_code(&email, &req.code).await? {
        return Err(AppError::CodeInvalid);
    }

    let user = SessionUser::from_email(&email);
    let token = create_session_token(&user, &state.config.auth_secret)?;
    let cookie = session_cookie(token, state.config.production);

    tracing::info!(user_id = %user.id, "Session created");

    Ok((
        jar.add(cookie),
        Json(VerifyCodeResponse {
            success: true,
            user,
        }),
    ))
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(SESSION_MAX_AGE_SECS))
        .build()
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: Option<SessionUser>,
}

/// Report the current session. Never an error: an invalid or expired token
/// is the same as no session.
async fn get_session(State(state): State<Arc<AppState>>, jar: CookieJar) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: session_from_jar(&jar, &state.config.auth_secret),
    })
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Clear the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(removal), Json(LogoutResponse { success: true }))
}
