//! Session identity model.
//!
//! There is no user registry: identity is fully determined by the verified
//! email address. The id is a deterministic encoding of the normalized
//! email, so re-authenticating with the same address always yields the
//! same id.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

/// Identity claim for a verified session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    /// Deterministic id derived from the normalized email
    pub id: String,
    /// Normalized (lowercase) email address
    pub email: String,
    /// Display name, taken from the email local part
    pub name: String,
}

impl SessionUser {
    /// Build the identity claim for an already-normalized email.
    pub fn from_email(email: &str) -> Self {
        Self {
            id: user_id_for_email(email),
            email: email.to_string(),
            name: name_from_email(email),
        }
    }
}

/// Lowercase and trim an email address before any lookup or storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Deterministic user id: URL-safe base64 of the normalized email.
pub fn user_id_for_email(email: &str) -> String {
    URL_SAFE_NO_PAD.encode(email.as_bytes())
}

/// Display name is the email local part (e.g. "ab12345" for
/// ab12345@essex.ac.uk).
pub fn name_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  AB12345@ESSEX.AC.UK "),
            "ab12345@essex.ac.uk"
        );
    }

    #[test]
    fn test_user_id_is_deterministic() {
        let a = user_id_for_email("ab12345@essex.ac.uk");
        let b = user_id_for_email("ab12345@essex.ac.uk");
        assert_eq!(a, b);
        assert_ne!(a, user_id_for_email("cd67890@essex.ac.uk"));
    }

    #[test]
    fn test_name_from_email() {
        assert_eq!(name_from_email("ab12345@essex.ac.uk"), "ab12345");
        assert_eq!(name_from_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn test_session_user_from_email() {
        let user = SessionUser::from_email("ab12345@essex.ac.uk");
        assert_eq!(user.id, user_id_for_email("ab12345@essex.ac.uk"));
        assert_eq!(user.email, "ab12345@essex.ac.uk");
        assert_eq!(user.name, "ab12345");
    }
}
