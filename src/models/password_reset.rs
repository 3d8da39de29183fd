//! Password Reset Models
//!
//! Data structures for the password-reset token flow.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A stored password-reset token
///
/// Only the SHA-256 hash of the emailed token is persisted; the plaintext
/// token exists solely in the reset link.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PasswordResetToken {
    /// Unique identifier for the token row
    pub id: Uuid,

    /// User the token belongs to
    pub user_id: Uuid,

    /// SHA-256 hex digest of the emailed token
    pub token_hash: String,

    /// Timestamp after which the token is rejected
    pub expires_at: DateTime<Utc>,

    /// Set once the token has been redeemed
    pub used_at: Option<DateTime<Utc>>,

    /// Timestamp when the token was issued
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Whether the token can still be redeemed
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_in_minutes: i64, used: bool) -> PasswordResetToken {
        let now = Utc::now();
        PasswordResetToken {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "hash".to_string(),
            expires_at: now + chrono::Duration::minutes(expires_in_minutes),
            used_at: used.then_some(now),
            created_at: now,
        }
    }

    #[test]
    fn test_fresh_token_is_usable() {
        assert!(token(30, false).is_usable(Utc::now()));
    }

    #[test]
    fn test_expired_token_is_not_usable() {
        assert!(!token(-1, false).is_usable(Utc::now()));
    }

    #[test]
    fn test_used_token_is_not_usable() {
        assert!(!token(30, true).is_usable(Utc::now()));
    }
}
