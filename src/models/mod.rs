// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod listing;
pub mod user;

pub use listing::Listing;
pub use user::SessionUser;
