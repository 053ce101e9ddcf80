// SPDX-License-Identifier: MIT

//! Listing model for storage and API.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const TITLE_MAX_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 200;
pub const TAGS_MAX: usize = 5;

/// Listing category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Skill,
    Item,
    Need,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Skill => "skill",
            Category::Item => "item",
            Category::Need => "need",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "skill" => Some(Category::Skill),
            "item" => Some(Category::Item),
            "need" => Some(Category::Need),
            _ => None,
        }
    }
}

/// Whether the poster is offering or asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Offer,
    Request,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Offer => "offer",
            ListingType::Request => "request",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "offer" => Some(ListingType::Offer),
            "request" => Some(ListingType::Request),
            _ => None,
        }
    }
}

/// Stored listing record. Immutable once created, except for deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Unique id, `listing-<millis>-<suffix>` for user-created listings
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    /// Lowercased, at most [`TAGS_MAX`]
    pub tags: Vec<String>,
    /// RFC3339 creation timestamp
    pub created_at: String,
    /// Owner id (deterministic encoding of the owner email)
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
}

/// Client-submitted listing fields, before validation.
#[derive(Debug, Deserialize)]
pub struct ListingDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub listing_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Listing {
    /// Validate a draft and build the stored record for the given owner.
    ///
    /// Field bounds are enforced here, server-side; the submitted category
    /// is not trusted: a request is always filed under `need`.
    pub fn from_draft(
        draft: ListingDraft,
        user_id: String,
        user_name: String,
        user_email: String,
    ) -> Result<Self, AppError> {
        let title = draft.title.trim();
        let description = draft.description.trim();

        if title.is_empty()
            || description.is_empty()
            || draft.category.is_empty()
            || draft.listing_type.is_empty()
        {
            return Err(AppError::Validation("Missing required fields".to_string()));
        }
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(AppError::Validation(format!(
                "Title must be {TITLE_MAX_CHARS} characters or fewer"
            )));
        }
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(AppError::Validation(format!(
                "Description must be {DESCRIPTION_MAX_CHARS} characters or fewer"
            )));
        }

        let listing_type = ListingType::parse(&draft.listing_type)
            .ok_or_else(|| AppError::Validation("Invalid listing type".to_string()))?;
        let category = Category::parse(&draft.category)
            .ok_or_else(|| AppError::Validation("Invalid category".to_string()))?;
        let category = if listing_type == ListingType::Request {
            Category::Need
        } else {
            category
        };

        Ok(Self {
            id: generate_listing_id(),
            title: title.to_string(),
            description: description.to_string(),
            category,
            listing_type,
            tags: normalize_tags(draft.tags)?,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            user_id,
            user_name,
            user_email,
        })
    }

    /// Parsed creation time, for sorting. `None` for unparsable records.
    pub fn created_at_ts(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Case-insensitive substring match over title, description and tags.
    /// `include_poster` extends the match to poster name and email (the
    /// administrative search).
    pub fn matches_query(&self, needle: &str, include_poster: bool) -> bool {
        if self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
        {
            return true;
        }
        include_poster
            && (self.user_name.to_lowercase().contains(needle)
                || self.user_email.to_lowercase().contains(needle))
    }

    // ─── Key-value hash mapping ──────────────────────────────────

    /// Field pairs for the `listing:<id>` hash. Tags are stored as a JSON
    /// array in a single field.
    pub fn to_redis_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.clone()),
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("category", self.category.as_str().to_string()),
            ("type", self.listing_type.as_str().to_string()),
            (
                "tags",
                serde_json::to_string(&self.tags).unwrap_or_else(|_| "[]".to_string()),
            ),
            ("createdAt", self.created_at.clone()),
            ("userId", self.user_id.clone()),
            ("userName", self.user_name.clone()),
            ("userEmail", self.user_email.clone()),
        ]
    }

    /// Rebuild a listing from a `listing:<id>` hash. Returns `None` for
    /// hashes missing required fields (treated as vanished records).
    pub fn from_redis_map(map: &HashMap<String, String>) -> Option<Self> {
        Some(Self {
            id: map.get("id")?.clone(),
            title: map.get("title")?.clone(),
            description: map.get("description")?.clone(),
            category: Category::parse(map.get("category")?)?,
            listing_type: ListingType::parse(map.get("type")?)?,
            tags: map
                .get("tags")
                .and_then(|raw| serde_json::from_str(raw).ok())
                .unwrap_or_default(),
            created_at: map.get("createdAt")?.clone(),
            user_id: map.get("userId")?.clone(),
            user_name: map.get("userName")?.clone(),
            user_email: map.get("userEmail")?.clone(),
        })
    }
}

/// Tags are trimmed, lowercased and capped at [`TAGS_MAX`]; empty entries
/// are dropped. The same rule applies to user and admin submissions.
fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>, AppError> {
    let tags: Vec<String> = tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.len() > TAGS_MAX {
        return Err(AppError::Validation(format!("Up to {TAGS_MAX} tags allowed")));
    }
    Ok(tags)
}

/// Collision-resistant listing id: millisecond timestamp plus a random
/// alphanumeric suffix.
pub fn generate_listing_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!(
        "listing-{}-{}",
        Utc::now().timestamp_millis(),
        suffix.to_lowercase()
    )
}
