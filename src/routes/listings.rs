// SPDX-License-Identifier: MIT

//! Listing browse and lifecycle routes.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::ensure_owner_or_admin;
use crate::models::listing::{Category, Listing, ListingDraft, ListingType};
use crate::models::user::SessionUser;
use crate::AppState;

/// Browse routes, no session required.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/listings", get(list_listings))
        .route("/api/listings/{id}", get(get_listing))
}

/// Mutation routes; the auth middleware is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/listings", post(create_listing))
        .route("/api/listings/{id}", delete(delete_listing))
}

#[derive(Deserialize)]
struct ListQuery {
    /// "offer" or "request"
    #[serde(rename = "type")]
    listing_type: Option<String>,
    /// "skill", "item" or "need"
    category: Option<String>,
    #[serde(rename = "userId")]
    user_id: Option<String>,
    /// Case-insensitive substring over title, description and tags
    q: Option<String>,
}

#[derive(Serialize)]
pub struct ListingsResponse {
    pub success: bool,
    pub listings: Vec<Listing>,
}

#[derive(Serialize)]
pub struct ListingResponse {
    pub success: bool,
    pub listing: Listing,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Browse listings with optional filters, newest first.
async fn list_listings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ListingsResponse>> {
    let mut listings = state.db.get_all_listings().await?;

    match params.listing_type.as_deref() {
        Some("offer") => listings.retain(|l| l.listing_type == ListingType::Offer),
        // Requests are filed under the "need" category
        Some("request") => listings.retain(|l| l.category == Category::Need),
        _ => {}
    }

    if let Some(raw) = params.category.as_deref() {
        let category = Category::parse(raw)
            .ok_or_else(|| AppError::Validation("Invalid category".to_string()))?;
        listings.retain(|l| l.category == category);
    }

    if let Some(user_id) = &params.user_id {
        listings.retain(|l| &l.user_id == user_id);
    }

    if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let needle = q.to_lowercase();
        listings.retain(|l| l.matches_query(&needle, false));
    }

    sort_newest_first(&mut listings);

    Ok(Json(ListingsResponse {
        success: true,
        listings,
    }))
}

/// Order by creation time descending. The store itself makes no ordering
/// guarantee, so callers sort after fetch.
pub fn sort_newest_first(listings: &mut [Listing]) {
    listings.sort_by(|a, b| {
        b.created_at_ts()
            .cmp(&a.created_at_ts())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

async fn get_listing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ListingResponse>> {
    let listing = state
        .db
        .get_listing(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Listing".to_string()))?;

    Ok(Json(ListingResponse {
        success: true,
        listing,
    }))
}

/// Create a listing owned by the session user.
async fn create_listing(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(draft): Json<ListingDraft>,
) -> Result<Json<ListingResponse>> {
    let listing = Listing::from_draft(draft, user.id, user.name, user.email)?;
    let listing = state.db.create_listing(listing).await?;

    tracing::info!(listing_id = %listing.id, "Listing created");

    Ok(Json(ListingResponse {
        success: true,
        listing,
    }))
}

/// Delete a listing; owner or admin only.
async fn delete_listing(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let listing = state
        .db
        .get_listing(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Listing".to_string()))?;

    ensure_owner_or_admin(&listing, &user, &state.config)?;

    state.db.delete_listing(&id).await?;

    tracing::info!(listing_id = %id, user_id = %user.id, "Listing deleted");

    Ok(Json(DeleteResponse { success: true }))
}
