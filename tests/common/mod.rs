// SPDX-License-Identifier: MIT

use clutch_api::config::Config;
use clutch_api::db::Db;
use clutch_api::middleware::auth::create_session_token;
use clutch_api::models::user::SessionUser;
use clutch_api::routes::create_router;
use clutch_api::services::Mailer;
use clutch_api::AppState;
use std::sync::Arc;

/// Create a test app backed by the in-process store and console sender.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let state = Arc::new(AppState {
        config,
        db: Db::in_memory(),
        mailer: Mailer::Console,
    });

    (create_router(state.clone()), state)
}

/// Create a session token for the given email, signed with the test key.
#[allow(dead_code)]
pub fn session_token_for(state: &AppState, email: &str) -> String {
    let user = SessionUser::from_email(email);
    create_session_token(&user, &state.config.auth_secret).expect("Failed to create token")
}

/// Cookie header value carrying a session for the given email.
#[allow(dead_code)]
pub fn session_cookie_for(state: &AppState, email: &str) -> String {
    format!("auth-token={}", session_token_for(state, email))
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body was not valid JSON")
}
