// SPDX-License-Identifier: MIT

//! Session token middleware and the owner/admin gate.

use crate::config::Config;
use crate::error::AppError;
use crate::models::listing::Listing;
use crate::models::user::SessionUser;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "auth-token";

/// Session lifetime in seconds (30 days).
pub const SESSION_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (deterministic user id)
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

/// Create a signed session token for a verified identity.
pub fn create_session_token(user: &SessionUser, signing_key: &[u8]) -> anyhow::Result<String> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        iat: now,
        exp: now + SESSION_MAX_AGE_SECS as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Validate a session token. Missing, mis-signed and expired tokens all
/// come back as `None`; callers cannot tell the cases apart.
pub fn verify_session_token(token: &str, signing_key: &[u8]) -> Option<SessionUser> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let data = decode::<Claims>(token, &key, &validation).ok()?;

    Some(SessionUser {
        id: data.claims.sub,
        email: data.claims.email,
        name: data.claims.name,
    })
}

/// Pull the session from the cookie jar, if present and valid.
pub fn session_from_jar(jar: &CookieJar, signing_key: &[u8]) -> Option<SessionUser> {
    let cookie = jar.get(SESSION_COOKIE)?;
    verify_session_token(cookie.value(), signing_key)
}

/// Middleware that requires a valid session.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Try cookie first, then header
    let user = match session_from_jar(&jar, &state.config.auth_secret) {
        Some(user) => user,
        None => {
            let bearer = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "));

            match bearer.and_then(|t| verify_session_token(t, &state.config.auth_secret)) {
                Some(user) => user,
                None => return Err(AppError::Unauthenticated),
            }
        }
    };

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Mutating a listing is allowed for its owner and for configured admin
/// identities only.
pub fn ensure_owner_or_admin(
    listing: &Listing,
    user: &SessionUser,
    config: &Config,
) -> Result<(), AppError> {
    if listing.user_id == user.id || config.is_admin(&user.email) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Admin-only surfaces check the configured allow-list directly.
pub fn ensure_admin(user: &SessionUser, config: &Config) -> Result<(), AppError> {
    if config.is_admin(&user.email) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
