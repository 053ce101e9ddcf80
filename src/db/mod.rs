// SPDX-License-Identifier: MIT

//! Storage layer: durable key-value engine with an in-process fallback.
//!
//! Every operation first tries the engine when one is configured; an
//! engine error is logged and the operation is re-attempted against the
//! fallback instead of surfacing to the caller. Single-process callers see
//! identical behavior in both modes.

pub mod memory;
pub mod redis;
pub mod seed;

use std::sync::Arc;

use chrono::Utc;

use self::memory::{MemoryStore, StoredCode};
use self::redis::{CodeEntry, RedisEngine};
use crate::error::AppError;
use crate::models::listing::Listing;

/// Key layout in the durable engine.
pub mod keys {
    /// Set of all listing ids, used for enumeration.
    pub const LISTING_IDS: &str = "listing_ids";
    /// Verification code TTL, seconds.
    pub const CODE_TTL_SECS: u64 = 600;

    pub fn listing(id: &str) -> String {
        format!("listing:{id}")
    }

    pub fn saved(user_id: &str) -> String {
        format!("saved:{user_id}")
    }

    pub fn verify(email: &str) -> String {
        format!("verify:{email}")
    }
}

/// Verification codes live for ten minutes.
pub const CODE_TTL_MILLIS: i64 = 10 * 60 * 1000;

/// The application store: listings, saved sets and verification codes.
#[derive(Clone)]
pub struct Db {
    engine: Option<RedisEngine>,
    fallback: Arc<MemoryStore>,
}

impl Db {
    /// Store backed by the durable engine, with the fallback behind it.
    pub fn new(engine: RedisEngine) -> Self {
        Self {
            engine: Some(engine),
            fallback: Arc::new(MemoryStore::new()),
        }
    }

    /// In-process store only (no engine configured).
    pub fn in_memory() -> Self {
        Self {
            engine: None,
            fallback: Arc::new(MemoryStore::new()),
        }
    }

    // ─── Listings ────────────────────────────────────────────────

    pub async fn get_all_listings(&self) -> Result<Vec<Listing>, AppError> {
        if let Some(engine) = &self.engine {
            match self.engine_all_listings(engine).await {
                Ok(listings) => return Ok(listings),
                Err(e) => {
                    tracing::error!(error = %e, "Engine listing enumeration failed, using fallback")
                }
            }
        }
        Ok(self.fallback.all_listings())
    }

    /// Engine path for enumeration. An empty index seeds the bootstrap set;
    /// a non-empty index makes reseeding a no-op.
    async fn engine_all_listings(&self, engine: &RedisEngine) -> Result<Vec<Listing>, AppError> {
        let ids = engine.listing_ids().await?;
        if ids.is_empty() {
            let listings = seed::seed_listings();
            for listing in &listings {
                engine.put_listing(listing).await?;
            }
            tracing::info!(count = listings.len(), "Seeded empty listing store");
            return Ok(listings);
        }
        engine.get_listings(&ids).await
    }

    pub async fn get_listing(&self, id: &str) -> Result<Option<Listing>, AppError> {
        if let Some(engine) = &self.engine {
            match engine.get_listing(id).await {
                Ok(listing) => return Ok(listing),
                Err(e) => tracing::error!(error = %e, "Engine listing read failed, using fallback"),
            }
        }
        Ok(self.fallback.get_listing(id))
    }

    pub async fn create_listing(&self, listing: Listing) -> Result<Listing, AppError> {
        if let Some(engine) = &self.engine {
            match engine.put_listing(&listing).await {
                Ok(()) => return Ok(listing),
                Err(e) => tracing::error!(
                    error = %e,
                    listing_id = %listing.id,
                    "Engine listing write failed, using fallback"
                ),
            }
        }
        self.fallback.insert_listing(listing.clone());
        Ok(listing)
    }

    /// Idempotent: deleting an unknown id returns `false`, not an error.
    pub async fn delete_listing(&self, id: &str) -> Result<bool, AppError> {
        if let Some(engine) = &self.engine {
            match engine.delete_listing(id).await {
                Ok(removed) => return Ok(removed),
                Err(e) => {
                    tracing::error!(error = %e, "Engine listing delete failed, using fallback")
                }
            }
        }
        Ok(self.fallback.remove_listing(id))
    }

    // ─── Saved sets ──────────────────────────────────────────────

    pub async fn get_saved_ids(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        if let Some(engine) = &self.engine {
            match engine.saved_ids(user_id).await {
                Ok(ids) => return Ok(ids),
                Err(e) => tracing::error!(error = %e, "Engine saved-set read failed, using fallback"),
            }
        }
        Ok(self.fallback.saved_ids(user_id))
    }

    /// Flip saved-state and return the new membership.
    pub async fn toggle_saved(&self, user_id: &str, listing_id: &str) -> Result<bool, AppError> {
        if let Some(engine) = &self.engine {
            match engine.toggle_saved(user_id, listing_id).await {
                Ok(saved) => return Ok(saved),
                Err(e) => {
                    tracing::error!(error = %e, "Engine saved-set toggle failed, using fallback")
                }
            }
        }
        Ok(self.fallback.toggle_saved(user_id, listing_id))
    }

    // ─── Verification codes ──────────────────────────────────────

    /// Store a code for ten minutes, overwriting any live entry.
    pub async fn store_code(&self, email: &str, code: &str) -> Result<(), AppError> {
        let expires = Utc::now().timestamp_millis() + CODE_TTL_MILLIS;
        self.store_code_with_expiry(email, code, expires).await
    }

    /// Store a code with an explicit expiry (exposed for testing expiry
    /// behavior without waiting out the TTL).
    pub async fn store_code_with_expiry(
        &self,
        email: &str,
        code: &str,
        expires: i64,
    ) -> Result<(), AppError> {
        if let Some(engine) = &self.engine {
            let entry = CodeEntry {
                code: code.to_string(),
                expires,
            };
            match engine.put_code(email, &entry).await {
                Ok(()) => return Ok(()),
                Err(e) => tracing::error!(error = %e, "Engine code write failed, using fallback"),
            }
        }
        self.fallback.put_code(
            email,
            StoredCode {
                code: code.to_string(),
                expires,
            },
        );
        Ok(())
    }

    /// Fails closed: missing, expired and mismatched codes are all plain
    /// `false`. A successful match consumes the entry before returning, so
    /// the same code never verifies twice.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<bool, AppError> {
        let now = Utc::now().timestamp_millis();
        if let Some(engine) = &self.engine {
            match engine.take_code(email, code, now).await {
                Ok(ok) => return Ok(ok),
                Err(e) => tracing::error!(error = %e, "Engine code verify failed, using fallback"),
            }
        }
        Ok(self.fallback.take_code(email, code, now))
    }
}
