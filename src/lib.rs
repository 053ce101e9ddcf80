// SPDX-License-Identifier: MIT

//! Clutch: campus marketplace where students trade skills and items.
//!
//! This crate provides the backend API: passwordless email-code
//! authentication, listing storage over a key-value engine with an
//! in-process fallback, and per-user saved-listing sets.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use services::Mailer;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub mailer: Mailer,
}
