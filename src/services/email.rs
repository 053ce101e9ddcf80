// SPDX-License-Identifier: MIT

//! Outbound verification email capability.
//!
//! Two senders exist: the Resend HTTP API for real delivery and a console
//! sender that logs the code for local development. The choice is made
//! once at startup from configuration, not per call.

use serde::Serialize;

use crate::config::Config;
use crate::error::AppError;

/// Outcome of a delivery attempt.
#[derive(Debug, Clone, Copy)]
pub struct Delivery {
    /// True when no real provider handled the message; only then may the
    /// code be disclosed to the requesting client.
    pub dev_mode: bool,
}

/// Email capability, selected at startup.
pub enum Mailer {
    Resend(ResendMailer),
    /// Logs codes instead of sending.
    Console,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Self {
        match &config.resend_api_key {
            Some(key) => Mailer::Resend(ResendMailer::new(key.clone(), config.email_from.clone())),
            None => {
                tracing::warn!("RESEND_API_KEY not set, verification codes will be logged");
                Mailer::Console
            }
        }
    }

    /// Deliver a verification code to an address.
    pub async fn send_code(&self, email: &str, code: &str) -> Result<Delivery, AppError> {
        match self {
            Mailer::Resend(resend) => resend.send_code(email, code).await,
            Mailer::Console => {
                println!();
                println!("========================================");
                println!("  VERIFICATION CODE FOR: {}", email);
                println!("  CODE: {}", code);
                println!("========================================");
                println!();

                tracing::info!(email = %email, "Dev mode verification code logged");
                Ok(Delivery { dev_mode: true })
            }
        }
    }
}

/// Resend HTTP API client.
pub struct ResendMailer {
    http: reqwest::Client,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
}

impl ResendMailer {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            from,
        }
    }

    async fn send_code(&self, email: &str, code: &str) -> Result<Delivery, AppError> {
        let body = ResendEmail {
            from: &self.from,
            to: [email],
            subject: "Your Clutch verification code",
            html: verification_html(code),
        };

        let result = self
            .http
            .post("https://api.resend.com/emails")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        match result {
            Ok(_) => {
                tracing::info!(email = %email, "Verification email sent");
                Ok(Delivery { dev_mode: false })
            }
            Err(e) => {
                // A provider failure does not fail the request; the stored
                // code stays valid and the user can retry.
                tracing::error!(error = %e, email = %email, "Verification email failed to send");
                Ok(Delivery { dev_mode: false })
            }
        }
    }
}

fn verification_html(code: &str) -> String {
    format!(
        "<div style=\"font-family: system-ui, sans-serif; max-width: 480px; \
         margin: 0 auto; padding: 32px;\">\
         <h1 style=\"font-size: 28px;\">Clutch</h1>\
         <p style=\"font-size: 16px;\">Your verification code is:</p>\
         <div style=\"font-size: 32px; font-weight: bold; letter-spacing: 8px; \
         padding: 24px; text-align: center;\">{code}</div>\
         <p style=\"font-size: 14px;\">This code will expire in 10 minutes.</p>\
         <p style=\"font-size: 14px;\">If you didn't request this code, you can \
         safely ignore this email.</p>\
         </div>"
    )
}
