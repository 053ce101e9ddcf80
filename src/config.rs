//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup. Optional backends (redis, the email
//! provider) are selected here, not branched on per request.

use std::env;

const DEFAULT_ADMIN_EMAIL: &str = "vs22222@essex.ac.uk";
const DEFAULT_AUTH_SECRET: &str = "default-secret-change-in-production";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Session token signing key (raw bytes)
    pub auth_secret: Vec<u8>,
    /// Redis connection URL; unset runs on the in-process store alone
    pub redis_url: Option<String>,
    /// Resend API key; unset selects the console (dev mode) sender
    pub resend_api_key: Option<String>,
    /// From address for verification emails
    pub email_from: String,
    /// Email domain students must sign up with (no leading `@`)
    pub allowed_email_domain: String,
    /// Privileged identities, lowercase
    pub admin_emails: Vec<String>,
    /// Marks session cookies `Secure`
    pub production: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let production = env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        let auth_secret = match env::var("AUTH_SECRET") {
            Ok(secret) if !secret.is_empty() => secret.into_bytes(),
            _ if production => return Err(ConfigError::Missing("AUTH_SECRET")),
            _ => DEFAULT_AUTH_SECRET.as_bytes().to_vec(),
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            auth_secret,
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
            resend_api_key: env::var("RESEND_API_KEY").ok().filter(|v| !v.is_empty()),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "Clutch <noreply@clutch-skillshare.app>".to_string()),
            allowed_email_domain: env::var("ALLOWED_EMAIL_DOMAIN")
                .unwrap_or_else(|_| "essex.ac.uk".to_string()),
            admin_emails: parse_admin_emails(
                &env::var("ADMIN_EMAILS").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string()),
            ),
            production,
        })
    }

    /// Whether an email belongs to a privileged identity.
    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }

    /// Fixed config for tests: memory store, console sender, known secret.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:3000".to_string(),
            auth_secret: b"test_auth_secret_32_bytes_long!!".to_vec(),
            redis_url: None,
            resend_api_key: None,
            email_from: "Clutch <noreply@clutch.test>".to_string(),
            allowed_email_domain: "essex.ac.uk".to_string(),
            admin_emails: vec![DEFAULT_ADMIN_EMAIL.to_string()],
            production: false,
        }
    }
}

/// Comma-separated allow-list, normalized to lowercase.
fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
