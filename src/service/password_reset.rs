//! Password Reset Service
//!
//! Issues single-use reset tokens, emails reset links, and applies new
//! passwords. Only the SHA-256 hash of a token is ever stored, so a leaked
//! table cannot be replayed against the reset endpoint.

use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::password_reset::PasswordResetToken;
use crate::service::EmailService;
use crate::utils::{
    error::AppError,
    security::{generate_secure_token, hash_password, hash_token},
    validation::{normalize_email, validate_password_strength},
};

/// Length of the plaintext token embedded in the reset link
const RESET_TOKEN_LENGTH: usize = 48;

/// Custom error types for the password reset service
#[derive(Error, Debug)]
pub enum PasswordResetError {
    /// Token unknown, already used, or tied to a missing user
    #[error("Invalid or expired reset token")]
    InvalidToken,

    /// Token known but past its expiry
    #[error("Reset token has expired")]
    TokenExpired,

    /// New password failed strength validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Password hashing operation failed
    #[error("Password hashing error: {0}")]
    HashingError(#[from] bcrypt::BcryptError),

    /// Email delivery failed
    #[error("Email service error: {0}")]
    EmailError(String),
}

impl From<PasswordResetError> for AppError {
    fn from(err: PasswordResetError) -> Self {
        match err {
            PasswordResetError::InvalidToken | PasswordResetError::TokenExpired => {
                AppError::Validation("Invalid or expired reset token".to_string())
            }
            PasswordResetError::ValidationError(msg) => AppError::Validation(msg),
            PasswordResetError::DatabaseError(e) => AppError::Database(e),
            PasswordResetError::HashingError(e) => AppError::Hashing(e),
            PasswordResetError::EmailError(msg) => {
                AppError::Internal(format!("Email service error: {}", msg))
            }
        }
    }
}

/// Result type for password reset operations
pub type PasswordResetResult<T> = Result<T, PasswordResetError>;

/// Row fetched when resolving the account behind a reset request
#[derive(Debug, sqlx::FromRow)]
struct ResetCandidate {
    id: Uuid,
    name: String,
    email: String,
}

/// Service driving the forgot/reset password flow
pub struct PasswordResetService {
    /// Database connection pool
    pool: PgPool,

    /// Outbound email, absent when SMTP is not configured
    email_service: Option<Arc<EmailService>>,

    /// How long an emailed token stays valid
    token_ttl: Duration,

    /// Base URL the emailed reset link points at
    reset_base_url: String,
}

impl PasswordResetService {
    /// Create a new password reset service with a 30 minute token lifetime
    pub fn new(
        pool: PgPool,
        email_service: Option<Arc<EmailService>>,
        reset_base_url: String,
    ) -> Self {
        Self {
            pool,
            email_service,
            token_ttl: Duration::minutes(30),
            reset_base_url,
        }
    }

    /// Start a reset for the given email address.
    ///
    /// Responds identically whether or not the address belongs to an
    /// account, so the endpoint cannot be used to probe for registered
    /// emails.
    pub async fn request_reset(&self, email: &str) -> PasswordResetResult<()> {
        let normalized_email = normalize_email(email);

        let candidate: Option<ResetCandidate> =
            sqlx::query_as("SELECT id, name, email FROM users WHERE email = $1")
                .bind(&normalized_email)
                .fetch_optional(&self.pool)
                .await?;

        let Some(user) = candidate else {
            log::debug!("password reset requested for unknown email");
            return Ok(());
        };

        let token = generate_secure_token(RESET_TOKEN_LENGTH);
        let token_hash = hash_token(&token);
        let expires_at = Utc::now() + self.token_ttl;

        sqlx::query(
            "INSERT INTO password_reset_tokens (user_id, token_hash, expires_at) \
             VALUES ($1, $2, $3)",
        )
        .bind(user.id)
        .bind(&token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        let reset_url = format!("{}/password/reset?token={}", self.reset_base_url, token);

        match &self.email_service {
            Some(email_service) => {
                email_service
                    .send_password_reset(&user.email, &user.name, &reset_url)
                    .await
                    .map_err(|e| PasswordResetError::EmailError(e.to_string()))?;
            }
            None => {
                log::warn!(
                    "email delivery disabled; reset token for user {} not sent",
                    user.id
                );
            }
        }

        Ok(())
    }

    /// Redeem a reset token and set a new password.
    ///
    /// Lookup is by token hash; the token must be unused and unexpired. The
    /// password update and token consumption commit together.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> PasswordResetResult<()> {
        validate_password_strength(new_password).map_err(|e| {
            PasswordResetError::ValidationError(format!("Invalid password: {}", e.code))
        })?;

        let token_hash = hash_token(token);
        let password_hash = hash_password(new_password)?;

        let mut tx = self.pool.begin().await?;

        let reset_token: Option<PasswordResetToken> = sqlx::query_as(
            "SELECT id, user_id, token_hash, expires_at, used_at, created_at \
             FROM password_reset_tokens WHERE token_hash = $1",
        )
        .bind(&token_hash)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(reset_token) = reset_token else {
            return Err(PasswordResetError::InvalidToken);
        };

        if reset_token.used_at.is_some() {
            return Err(PasswordResetError::InvalidToken);
        }
        if reset_token.expires_at <= Utc::now() {
            return Err(PasswordResetError::TokenExpired);
        }

        let updated = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(reset_token.user_id)
        .bind(&password_hash)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            // Account deleted after the token was issued
            return Err(PasswordResetError::InvalidToken);
        }

        sqlx::query("UPDATE password_reset_tokens SET used_at = NOW() WHERE id = $1")
            .bind(reset_token.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        log::info!("password reset completed for user {}", reset_token.user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_hides_token_state() {
        // Invalid and expired tokens surface the same client message so the
        // endpoint leaks nothing about which tokens exist.
        let invalid: AppError = PasswordResetError::InvalidToken.into();
        let expired: AppError = PasswordResetError::TokenExpired.into();

        match (&invalid, &expired) {
            (AppError::Validation(a), AppError::Validation(b)) => assert_eq!(a, b),
            other => panic!("unexpected conversion: {:?}", other),
        }
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: AppError = PasswordResetError::ValidationError("too weak".into()).into();
        assert!(matches!(err, AppError::Validation(msg) if msg == "too weak"));
    }
}
