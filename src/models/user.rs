//! User Model
//!
//! Core user data structures and type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::search::{FieldValue, Searchable};

/// User representation for external API responses
///
/// This struct represents a user account without sensitive information like
/// password hashes. All datetime fields use UTC.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// User's display name
    pub name: String,

    /// User's email address (unique, normalized)
    pub email: String,

    /// Optional URL to the user's avatar image
    pub avatar_url: Option<String>,

    /// Timestamp when the user account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user profile was last modified
    pub updated_at: DateTime<Utc>,
}

/// Internal user representation including password hash
///
/// Used for database operations that need access to the password hash.
/// Never exposed in API responses.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserWithPassword {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserWithPassword> for User {
    /// Strips the password hash so it can never leak into a response
    fn from(user: UserWithPassword) -> Self {
        User {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl Searchable for User {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(FieldValue::Text(self.name.clone())),
            "email" => Some(FieldValue::Text(self.email.clone())),
            "created_at" => Some(FieldValue::Timestamp(self.created_at)),
            "updated_at" => Some(FieldValue::Timestamp(self.updated_at)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_with_password_conversion() {
        let user_with_password = UserWithPassword {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hashed_password".to_string(),
            avatar_url: Some("/avatars/abc.png".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let user: User = user_with_password.into();

        assert_eq!(user.name, "Test User");
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.avatar_url, Some("/avatars/abc.png".to_string()));
    }

    #[test]
    fn test_searchable_fields() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            avatar_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(user.field("name"), Some(FieldValue::Text("Alice".into())));
        assert_eq!(
            user.field("email"),
            Some(FieldValue::Text("alice@example.com".into()))
        );
        assert!(user.field("password_hash").is_none());
    }
}
