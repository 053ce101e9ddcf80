// SPDX-License-Identifier: MIT

//! Redis-backed durable engine.
//!
//! Thin wrapper over a multiplexed connection manager with typed
//! operations for the key layout in [`crate::db::keys`]. Every engine
//! error maps to [`AppError::Storage`]; the composed store decides whether
//! to fall back.

use std::collections::HashMap;

use futures_util::{stream, StreamExt};
use redis::{aio::ConnectionManager, AsyncCommands};
use serde::{Deserialize, Serialize};

use crate::db::keys;
use crate::error::AppError;
use crate::models::listing::Listing;

const MAX_CONCURRENT_FETCHES: usize = 16;

/// Verification code entry as stored under `verify:<email>`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CodeEntry {
    pub code: String,
    /// Expiry as epoch milliseconds
    pub expires: i64,
}

/// Durable key-value engine client.
#[derive(Clone)]
pub struct RedisEngine {
    conn: ConnectionManager,
}

impl RedisEngine {
    /// Connect to the engine. The connection manager reconnects on its own
    /// after transient failures.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let client = redis::Client::open(url).map_err(storage_err)?;
        let conn = ConnectionManager::new(client).await.map_err(storage_err)?;
        tracing::info!("Connected to redis");
        Ok(Self { conn })
    }

    // ─── Listings ────────────────────────────────────────────────

    /// All registered listing ids (unordered).
    pub async fn listing_ids(&self) -> Result<Vec<String>, AppError> {
        let mut conn = self.conn.clone();
        conn.smembers(keys::LISTING_IDS).await.map_err(storage_err)
    }

    pub async fn get_listing(&self, id: &str) -> Result<Option<Listing>, AppError> {
        let mut conn = self.conn.clone();
        let map: HashMap<String, String> =
            conn.hgetall(keys::listing(id)).await.map_err(storage_err)?;
        if map.is_empty() {
            return Ok(None);
        }
        Ok(Listing::from_redis_map(&map))
    }

    /// Fetch listing bodies concurrently, dropping ids whose hash is gone.
    pub async fn get_listings(&self, ids: &[String]) -> Result<Vec<Listing>, AppError> {
        let results: Vec<Result<Option<Listing>, AppError>> = stream::iter(ids.to_vec())
            .map(|id| {
                let engine = self.clone();
                async move { engine.get_listing(&id).await }
            })
            .buffer_unordered(MAX_CONCURRENT_FETCHES)
            .collect()
            .await;

        let mut listings = Vec::with_capacity(results.len());
        for result in results {
            if let Some(listing) = result? {
                listings.push(listing);
            }
        }
        Ok(listings)
    }

    /// Store the body hash, then register the id in the enumeration set.
    /// Registration is a set-add, so concurrent creates cannot clobber
    /// each other's index entries.
    pub async fn put_listing(&self, listing: &Listing) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let fields = listing.to_redis_fields();
        let _: () = conn
            .hset_multiple(keys::listing(&listing.id), &fields)
            .await
            .map_err(storage_err)?;
        // The body is durable at this point; a failed SADD leaves the
        // listing stored but unlisted, which the error message calls out.
        let _: () = conn
            .sadd(keys::LISTING_IDS, &listing.id)
            .await
            .map_err(|e| {
                AppError::Storage(format!(
                    "listing {} stored but not indexed: {}",
                    listing.id, e
                ))
            })?;
        Ok(())
    }

    /// Remove a listing and unregister its id. Unknown ids return `false`.
    pub async fn delete_listing(&self, id: &str) -> Result<bool, AppError> {
        let mut conn = self.conn.clone();
        let removed: u32 = conn.del(keys::listing(id)).await.map_err(storage_err)?;
        let _: () = conn
            .srem(keys::LISTING_IDS, id)
            .await
            .map_err(storage_err)?;
        Ok(removed > 0)
    }

    // ─── Saved sets ──────────────────────────────────────────────

    pub async fn saved_ids(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let mut conn = self.conn.clone();
        conn.smembers(keys::saved(user_id)).await.map_err(storage_err)
    }

    /// Flip membership; last writer wins under concurrent toggles.
    pub async fn toggle_saved(&self, user_id: &str, listing_id: &str) -> Result<bool, AppError> {
        let mut conn = self.conn.clone();
        let key = keys::saved(user_id);
        let is_saved: bool = conn.sismember(&key, listing_id).await.map_err(storage_err)?;
        if is_saved {
            let _: () = conn.srem(&key, listing_id).await.map_err(storage_err)?;
            Ok(false)
        } else {
            let _: () = conn.sadd(&key, listing_id).await.map_err(storage_err)?;
            Ok(true)
        }
    }

    // ─── Verification codes ──────────────────────────────────────

    /// Store a code with a TTL, overwriting any live entry for the email.
    pub async fn put_code(&self, email: &str, entry: &CodeEntry) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let value = serde_json::to_string(entry).map_err(|e| AppError::Storage(e.to_string()))?;
        let _: () = conn
            .set_ex(keys::verify(email), value, keys::CODE_TTL_SECS)
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    /// Check-and-consume a verification code. The entry is deleted only on
    /// a successful match, so a wrong guess does not burn the code.
    pub async fn take_code(
        &self,
        email: &str,
        code: &str,
        now_millis: i64,
    ) -> Result<bool, AppError> {
        let mut conn = self.conn.clone();
        let key = keys::verify(email);

        let raw: Option<String> = conn.get(&key).await.map_err(storage_err)?;
        let Some(raw) = raw else {
            return Ok(false);
        };
        let Ok(entry) = serde_json::from_str::<CodeEntry>(&raw) else {
            // Unreadable entries are dropped, never matched.
            let _: () = conn.del(&key).await.map_err(storage_err)?;
            return Ok(false);
        };

        if now_millis > entry.expires || entry.code != code {
            return Ok(false);
        }

        let _: () = conn.del(&key).await.map_err(storage_err)?;
        Ok(true)
    }
}

fn storage_err(e: redis::RedisError) -> AppError {
    AppError::Storage(e.to_string())
}
