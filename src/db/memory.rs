// SPDX-License-Identifier: MIT

//! In-process fallback store.
//!
//! Used when no redis URL is configured, and as the landing spot when the
//! durable engine errors mid-request. Collections are concurrent maps and
//! every mutation is a single atomic per-key operation, so concurrent
//! requests cannot interleave a partial update.

use std::collections::HashSet;
use std::sync::Once;

use dashmap::DashMap;

use crate::db::seed::seed_listings;
use crate::models::listing::Listing;

/// Stored verification code entry.
#[derive(Debug, Clone)]
pub struct StoredCode {
    pub code: String,
    /// Expiry as epoch milliseconds
    pub expires: i64,
}

/// Process-wide fallback collections.
pub struct MemoryStore {
    listings: DashMap<String, Listing>,
    saved: DashMap<String, HashSet<String>>,
    codes: DashMap<String, StoredCode>,
    seed_once: Once,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            listings: DashMap::new(),
            saved: DashMap::new(),
            codes: DashMap::new(),
            seed_once: Once::new(),
        }
    }

    /// Seed the listing collection on first use; later calls are no-ops.
    fn ensure_seeded(&self) {
        self.seed_once.call_once(|| {
            for listing in seed_listings() {
                self.listings.insert(listing.id.clone(), listing);
            }
        });
    }

    // ─── Listings ────────────────────────────────────────────────

    pub fn all_listings(&self) -> Vec<Listing> {
        self.ensure_seeded();
        self.listings.iter().map(|e| e.value().clone()).collect()
    }

    pub fn get_listing(&self, id: &str) -> Option<Listing> {
        self.ensure_seeded();
        self.listings.get(id).map(|e| e.value().clone())
    }

    pub fn insert_listing(&self, listing: Listing) {
        self.ensure_seeded();
        self.listings.insert(listing.id.clone(), listing);
    }

    pub fn remove_listing(&self, id: &str) -> bool {
        self.ensure_seeded();
        self.listings.remove(id).is_some()
    }

    // ─── Saved sets ──────────────────────────────────────────────

    pub fn saved_ids(&self, user_id: &str) -> Vec<String> {
        self.saved
            .get(user_id)
            .map(|e| e.value().iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Flip membership for the (user, listing) pair; returns the new state.
    pub fn toggle_saved(&self, user_id: &str, listing_id: &str) -> bool {
        let mut entry = self.saved.entry(user_id.to_string()).or_default();
        if entry.insert(listing_id.to_string()) {
            true
        } else {
            entry.remove(listing_id);
            false
        }
    }

    // ─── Verification codes ──────────────────────────────────────

    /// Store a code, overwriting any live entry for the email.
    pub fn put_code(&self, email: &str, entry: StoredCode) {
        self.codes.insert(email.to_string(), entry);
    }

    /// Atomic check-and-consume: the entry is removed only when the code
    /// matches and has not expired, so a matching code verifies once.
    pub fn take_code(&self, email: &str, code: &str, now_millis: i64) -> bool {
        self.codes
            .remove_if(email, |_, stored| {
                stored.code == code && now_millis <= stored.expires
            })
            .is_some()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeding_happens_once() {
        let store = MemoryStore::new();
        let first = store.all_listings().len();
        assert!(first > 0);
        assert_eq!(store.all_listings().len(), first);
    }

    #[test]
    fn test_toggle_saved_round_trip() {
        let store = MemoryStore::new();
        assert!(store.toggle_saved("user-a", "seed-1"));
        assert_eq!(store.saved_ids("user-a"), vec!["seed-1"]);
        assert!(!store.toggle_saved("user-a", "seed-1"));
        assert!(store.saved_ids("user-a").is_empty());
    }

    #[test]
    fn test_code_is_single_use() {
        let store = MemoryStore::new();
        store.put_code(
            "ab12345@essex.ac.uk",
            StoredCode {
                code: "123456".to_string(),
                expires: i64::MAX,
            },
        );
        assert!(store.take_code("ab12345@essex.ac.uk", "123456", 0));
        assert!(!store.take_code("ab12345@essex.ac.uk", "123456", 0));
    }

    #[test]
    fn test_expired_code_is_rejected() {
        let store = MemoryStore::new();
        store.put_code(
            "ab12345@essex.ac.uk",
            StoredCode {
                code: "123456".to_string(),
                expires: 1_000,
            },
        );
        assert!(!store.take_code("ab12345@essex.ac.uk", "123456", 2_000));
    }

    #[test]
    fn test_wrong_code_does_not_consume_entry() {
        let store = MemoryStore::new();
        store.put_code(
            "ab12345@essex.ac.uk",
            StoredCode {
                code: "123456".to_string(),
                expires: i64::MAX,
            },
        );
        assert!(!store.take_code("ab12345@essex.ac.uk", "000000", 0));
        assert!(store.take_code("ab12345@essex.ac.uk", "123456", 0));
    }
}
