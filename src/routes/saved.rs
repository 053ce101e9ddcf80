// SPDX-License-Identifier: MIT

//! Saved-listing (bookmark) routes.

use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::listing::Listing;
use crate::models::user::SessionUser;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/saved", get(get_saved).post(toggle_saved))
}

#[derive(Serialize)]
pub struct SavedResponse {
    pub success: bool,
    #[serde(rename = "savedListings")]
    pub saved_listings: Vec<Listing>,
    #[serde(rename = "savedIds")]
    pub saved_ids: Vec<String>,
}

/// List the session user's saved listings. Ids whose listing has since
/// been deleted stay in the set and are filtered out here.
async fn get_saved(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<SavedResponse>> {
    let saved_ids = state.db.get_saved_ids(&user.id).await?;
    let all_listings = state.db.get_all_listings().await?;

    let saved_listings: Vec<Listing> = all_listings
        .into_iter()
        .filter(|l| saved_ids.contains(&l.id))
        .collect();

    Ok(Json(SavedResponse {
        success: true,
        saved_listings,
        saved_ids,
    }))
}

#[derive(Deserialize)]
pub struct ToggleSavedRequest {
    #[serde(rename = "listingId", default)]
    listing_id: String,
}

#[derive(Serialize)]
pub struct ToggleSavedResponse {
    pub success: bool,
    pub saved: bool,
    pub message: &'static str,
}

/// Flip saved-state for a listing and report the new membership.
async fn toggle_saved(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(req): Json<ToggleSavedRequest>,
) -> Result<Json<ToggleSavedResponse>> {
    if req.listing_id.is_empty() {
        return Err(AppError::Validation("Listing ID is required".to_string()));
    }

    let saved = state.db.toggle_saved(&user.id, &req.listing_id).await?;

    Ok(Json(ToggleSavedResponse {
        success: true,
        saved,
        message: if saved {
            "Listing saved"
        } else {
            "Listing removed from saved"
        },
    }))
}
