// SPDX-License-Identifier: MIT

//! Administrative listing routes.
//!
//! All handlers here require an identity on the configured admin
//! allow-list on top of the session middleware.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::ensure_admin;
use crate::models::listing::{Listing, ListingDraft};
use crate::models::user::{normalize_email, user_id_for_email, SessionUser};
use crate::routes::listings::{sort_newest_first, DeleteResponse, ListingResponse, ListingsResponse};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/listings", get(list_all).post(create_for_user))
        .route("/api/admin/listings/{id}", delete(delete_any))
}

#[derive(Deserialize)]
struct AdminListQuery {
    /// Substring search that also matches poster name and email
    q: Option<String>,
}

/// All listings, newest first.
async fn list_all(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Query(params): Query<AdminListQuery>,
) -> Result<Json<ListingsResponse>> {
    ensure_admin(&user, &state.config)?;

    let mut listings = state.db.get_all_listings().await?;

    if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let needle = q.to_lowercase();
        listings.retain(|l| l.matches_query(&needle, true));
    }

    sort_newest_first(&mut listings);

    Ok(Json(ListingsResponse {
        success: true,
        listings,
    }))
}

#[derive(Deserialize)]
pub struct AdminCreateRequest {
    #[serde(flatten)]
    draft: ListingDraft,
    #[serde(rename = "userEmail", default)]
    user_email: String,
    #[serde(rename = "userName", default)]
    user_name: String,
}

/// Create a listing on behalf of any user. The owner id is derived from
/// the given email the same way a real session would derive it.
async fn create_for_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(req): Json<AdminCreateRequest>,
) -> Result<Json<ListingResponse>> {
    ensure_admin(&user, &state.config)?;

    if req.user_email.trim().is_empty() || req.user_name.trim().is_empty() {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }

    let owner_email = normalize_email(&req.user_email);
    let listing = Listing::from_draft(
        req.draft,
        user_id_for_email(&owner_email),
        req.user_name.trim().to_string(),
        owner_email,
    )?;
    let listing = state.db.create_listing(listing).await?;

    tracing::info!(
        listing_id = %listing.id,
        admin = %user.email,
        "Listing created on behalf of user"
    );

    Ok(Json(ListingResponse {
        success: true,
        listing,
    }))
}

/// Delete any listing.
async fn delete_any(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    ensure_admin(&user, &state.config)?;

    if !state.db.delete_listing(&id).await? {
        return Err(AppError::NotFound("Listing".to_string()));
    }

    tracing::info!(listing_id = %id, admin = %user.email, "Listing deleted by admin");

    Ok(Json(DeleteResponse { success: true }))
}
