// SPDX-License-Identifier: MIT

//! Deterministic bootstrap listings for an empty store.
//!
//! Ids are fixed (`seed-1` .. `seed-7`) so reseeding an empty store always
//! produces the same records; timestamps are relative offsets so the demo
//! data looks recent.

use chrono::{Duration, SecondsFormat, Utc};

use crate::models::listing::{Category, Listing, ListingType};

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    title: &str,
    description: &str,
    category: Category,
    listing_type: ListingType,
    tags: &[&str],
    minutes_ago: i64,
    user_id: &str,
    user_name: &str,
    user_email: &str,
) -> Listing {
    Listing {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        listing_type,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at: (Utc::now() - Duration::minutes(minutes_ago))
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
        user_email: user_email.to_string(),
    }
}

/// The fixed bootstrap set.
pub fn seed_listings() -> Vec<Listing> {
    vec![
        seed(
            "seed-1",
            "Guitar Lessons",
            "Been playing for 5 years. Can teach basics to intermediate. \
             Looking for Spanish conversation practice or baked goods!",
            Category::Skill,
            ListingType::Offer,
            &["music", "guitar", "teaching"],
            30,
            "user-1",
            "Sarah C.",
            "sc21234@essex.ac.uk",
        ),
        seed(
            "seed-2",
            "Homemade Indian Snacks",
            "My mom sent me too many samosas and pakoras! Happy to share. \
             Would love help with physics homework.",
            Category::Item,
            ListingType::Offer,
            &["food", "snacks", "indian"],
            60,
            "user-2",
            "Alex K.",
            "ak19876@essex.ac.uk",
        ),
        seed(
            "seed-3",
            "Need French Tutor",
            "Struggling with French 101. Can offer graphic design help or \
             bake you something sweet!",
            Category::Need,
            ListingType::Request,
            &["french", "language", "tutoring"],
            2 * 60,
            "user-3",
            "Emma W.",
            "ew20987@essex.ac.uk",
        ),
        seed(
            "seed-4",
            "Car Rides to Campus",
            "I drive to campus every morning around 8am from downtown. \
             Happy to give rides for coffee or study notes!",
            Category::Skill,
            ListingType::Offer,
            &["transportation", "rides", "morning"],
            3 * 60,
            "user-4",
            "Marcus B.",
            "mb22345@essex.ac.uk",
        ),
        seed(
            "seed-5",
            "Extra Textbooks",
            "Have extra ECON 101 and PSYCH 100 textbooks from last semester. \
             Looking for computer science textbooks or snacks!",
            Category::Item,
            ListingType::Offer,
            &["textbooks", "books", "economics"],
            5 * 60,
            "user-5",
            "Lily Z.",
            "lz21456@essex.ac.uk",
        ),
        seed(
            "seed-6",
            "Photography for Events",
            "Can take photos for your events or portraits. Would love help \
             with chemistry or some homemade food!",
            Category::Skill,
            ListingType::Offer,
            &["photography", "events", "portraits"],
            24 * 60,
            "user-6",
            "David P.",
            "dp23567@essex.ac.uk",
        ),
        seed(
            "seed-7",
            "Need Laptop Charger (HP)",
            "Lost my HP laptop charger. Can borrow for a day? Will return \
             with cookies or help with your homework!",
            Category::Need,
            ListingType::Request,
            &["electronics", "urgent", "laptop"],
            6 * 60,
            "user-7",
            "Sophie T.",
            "st20678@essex.ac.uk",
        ),
    ]
}
