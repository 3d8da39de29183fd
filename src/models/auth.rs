//! Authentication Models
//!
//! Claims carried inside access tokens and the per-request identity they
//! decode into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims encoded into an access token.
///
/// Standard registered claims plus a per-token `jti`, so two tokens issued
/// to the same user in the same second are still distinguishable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject, the user's id
    pub sub: String,

    /// Expiration time as a Unix timestamp
    pub exp: i64,

    /// Issued-at as a Unix timestamp
    pub iat: i64,

    /// Unique token identifier
    pub jti: String,
}

impl AccessTokenClaims {
    pub fn new(user_id: Uuid, expires_at: DateTime<Utc>, issued_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// The caller's identity for one request.
///
/// Built from verified claims by the authentication middleware and stored
/// in request extensions for handlers that need it.
#[derive(Debug, Clone)]
pub struct UserContext {
    /// User id from the token subject
    pub user_id: Uuid,

    /// The token's `jti`
    pub token_id: String,

    /// When the presented token expires
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<&AccessTokenClaims> for UserContext {
    type Error = uuid::Error;

    /// Fails when the subject is not a well-formed UUID, which means the
    /// token was not issued by this service.
    fn try_from(claims: &AccessTokenClaims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub)?,
            token_id: claims.jti.clone(),
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_for(user_id: Uuid) -> AccessTokenClaims {
        let now = Utc::now();
        AccessTokenClaims::new(user_id, now + chrono::Duration::hours(1), now)
    }

    #[test]
    fn test_claims_carry_subject_and_lifetime() {
        let user_id = Uuid::new_v4();
        let claims = claims_for(user_id);

        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_context_round_trips_through_claims() {
        let user_id = Uuid::new_v4();
        let claims = claims_for(user_id);

        let context = UserContext::try_from(&claims).unwrap();
        assert_eq!(context.user_id, user_id);
        assert_eq!(context.token_id, claims.jti);
        assert_eq!(context.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn test_context_rejects_non_uuid_subject() {
        let mut claims = claims_for(Uuid::new_v4());
        claims.sub = "not-a-uuid".to_string();

        assert!(UserContext::try_from(&claims).is_err());
    }
}
