//! JWT Authentication Service
//!
//! Stateless issuance and validation of HS256 access tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

use crate::models::auth::{AccessTokenClaims, UserContext};
use crate::utils::error::AppError;

/// Custom error types for the JWT service
#[derive(Error, Debug)]
pub enum JwtServiceError {
    /// Token could not be encoded
    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    /// Token failed signature, expiry, or claim validation
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl From<JwtServiceError> for AppError {
    fn from(err: JwtServiceError) -> Self {
        match err {
            JwtServiceError::TokenGeneration(msg) => {
                AppError::Internal(format!("Token generation failed: {}", msg))
            }
            JwtServiceError::InvalidToken(_) => {
                AppError::Authentication("Invalid or expired token".to_string())
            }
        }
    }
}

/// Result type for JWT service operations
pub type JwtServiceResult<T> = Result<T, JwtServiceError>;

/// An issued access token with its lifetime
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// JWT authentication service for token issuance and validation
#[derive(Clone)]
pub struct JwtService {
    /// HS256 signing secret
    secret: String,

    /// Access token lifetime
    expires_in: Duration,
}

impl JwtService {
    /// Create a new JWT service with the default 24 hour token lifetime
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            expires_in: Duration::hours(24),
        }
    }

    /// Create a new JWT service with a custom token lifetime
    pub fn with_expiration(secret: String, expires_in: Duration) -> Self {
        Self { secret, expires_in }
    }

    /// Issue a signed access token for a user
    pub fn issue(&self, user_id: Uuid) -> JwtServiceResult<IssuedToken> {
        let now = Utc::now();
        let claims = AccessTokenClaims::new(user_id, now + self.expires_in, now);

        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(self.secret.as_ref());

        let token = encode(&header, &claims, &encoding_key)
            .map_err(|e| JwtServiceError::TokenGeneration(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_in: self.expires_in.num_seconds(),
        })
    }

    /// Validate an access token and extract the user context
    pub fn verify(&self, token: &str) -> JwtServiceResult<UserContext> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        let decoding_key = DecodingKey::from_secret(self.secret.as_ref());

        let claims = decode::<AccessTokenClaims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtServiceError::InvalidToken(e.to_string()))?;

        UserContext::try_from(&claims)
            .map_err(|_| JwtServiceError::InvalidToken("Invalid user ID in token".into()))
    }
}
