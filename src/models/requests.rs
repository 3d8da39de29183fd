//! Request and Response Models
//!
//! Data structures for API request and response payloads with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::User;
use crate::utils::validation::{
    email_validator, name_validator, validate_password_strength,
};

/// Request payload for creating a new user account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// User's display name (1-255 characters)
    #[validate(custom(function = "name_validator"))]
    pub name: String,

    /// User's email address (must be unique and valid format)
    #[validate(custom(function = "email_validator"))]
    pub email: String,

    /// User's password (8-128 characters with strength requirements)
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
}

/// Request payload for updating user profile information
///
/// Absent fields preserve the current values.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// Updated user display name (1-255 characters)
    #[validate(custom(function = "name_validator"))]
    pub name: Option<String>,

    /// Updated email address (must be unique if changed)
    #[validate(custom(function = "email_validator"))]
    pub email: Option<String>,
}

/// Request payload for creating a new catalog product
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductRequest {
    /// Product name (must be unique)
    #[validate(custom(function = "name_validator"))]
    pub name: String,

    /// Optional free-form description (up to 2000 characters)
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,

    /// Unit price in cents, must be positive
    #[validate(range(min = 1, message = "Price must be positive"))]
    pub price_cents: i64,

    /// Units in stock, must not be negative
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i32,
}

/// Request payload for updating a catalog product
///
/// Absent fields preserve the current values.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProductRequest {
    /// Updated product name (must be unique if changed)
    #[validate(custom(function = "name_validator"))]
    pub name: Option<String>,

    /// Updated description
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,

    /// Updated unit price in cents
    #[validate(range(min = 1, message = "Price must be positive"))]
    pub price_cents: Option<i64>,

    /// Updated stock quantity
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: Option<i32>,
}

/// Request payload for logging in with email and password
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email address
    #[validate(custom(function = "email_validator"))]
    pub email: String,

    /// Account password
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

/// Request payload for starting a password reset
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Email address the reset link is sent to
    #[validate(custom(function = "email_validator"))]
    pub email: String,
}

/// Request payload for completing a password reset
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// Reset token from the emailed link
    #[validate(length(min = 1, message = "Reset token cannot be empty"))]
    pub token: String,

    /// Replacement password
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
}

/// Response for successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// The authenticated user
    pub user: User,
}

impl LoginResponse {
    pub fn new(access_token: String, expires_in: i64, user: User) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

/// Response for health check
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// Response after an avatar upload
#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub user_id: Uuid,
    pub avatar_url: String,
}
