//! HTTP Request Handlers
//!
//! Axum handlers for processing HTTP requests and responses.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{
        product::Product,
        requests::*,
        user::User,
    },
    search::{RawSearchQuery, SearchResult},
    service::{AvatarStorage, JwtService, PasswordResetService, ProductService, UserService},
    utils::error::{AppError, AppResult},
    VERSION,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub product_service: Arc<ProductService>,
    pub jwt_service: Arc<JwtService>,
    pub password_reset_service: Arc<PasswordResetService>,
    pub avatar_storage: Arc<AvatarStorage>,
}

/// Standard success response envelope: `{ message, data? }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(message: &str, data: T) -> Self {
        Self {
            message: message.to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Envelope with no payload, for operations that only acknowledge
    pub fn message_only(message: &str) -> Self {
        Self {
            message: message.to_string(),
            data: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Health

/// Health check endpoint
pub async fn health_check(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<HealthCheckResponse>>> {
    state.user_service.health_check().await?;

    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: VERSION.to_string(),
    };

    Ok(Json(ApiResponse::new("Service healthy", response)))
}

// ---------------------------------------------------------------------------
// Users

/// Create a new user account
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state.user_service.create_user(request).await?;
    Ok(Json(ApiResponse::new("User created", user)))
}

/// Get user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state.user_service.get_user(user_id).await?;
    Ok(Json(ApiResponse::new("User found", user)))
}

/// Update user profile
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state.user_service.update_user(user_id, request).await?;
    Ok(Json(ApiResponse::new("User updated", user)))
}

/// Delete a user account
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let user = state.user_service.delete_user(user_id).await?;

    // The account is gone either way; losing the file only leaks disk space.
    remove_avatar_file(&state.avatar_storage, user.avatar_url.as_deref()).await;

    Ok(Json(ApiResponse::message_only("User deleted")))
}

/// Search users with pagination, sorting, and filtering
pub async fn search_users(
    State(state): State<AppState>,
    Query(raw): Query<RawSearchQuery>,
) -> AppResult<Json<ApiResponse<SearchResult<User>>>> {
    let result = state.user_service.search_users(&raw).await?;
    Ok(Json(ApiResponse::new("Users found", result)))
}

// ---------------------------------------------------------------------------
// Avatars

/// Upload a user avatar as multipart form data (field name `avatar`)
pub async fn upload_avatar(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<AvatarResponse>>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() != Some("avatar") {
            continue;
        }

        let content_type = field
            .content_type()
            .ok_or_else(|| AppError::Validation("Avatar field has no content type".into()))?
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read avatar field: {}", e)))?;

        upload = Some((content_type, bytes.to_vec()));
        break;
    }

    let (content_type, bytes) =
        upload.ok_or_else(|| AppError::Validation("Missing 'avatar' field".into()))?;

    // Reject before writing anything if the user does not exist
    state.user_service.get_user(user_id).await?;

    let stored = state
        .avatar_storage
        .store(user_id, &content_type, &bytes)
        .await?;

    let (user, previous_url) = match state
        .user_service
        .set_avatar(user_id, Some(&stored.url))
        .await
    {
        Ok(result) => result,
        Err(e) => {
            // Don't leave an orphaned file behind
            let _ = state.avatar_storage.remove(&stored.file_name).await;
            return Err(e.into());
        }
    };

    remove_avatar_file(&state.avatar_storage, previous_url.as_deref()).await;

    let response = AvatarResponse {
        user_id: user.id,
        avatar_url: stored.url,
    };
    Ok(Json(ApiResponse::new("Avatar uploaded", response)))
}

/// Remove a user's avatar
pub async fn delete_avatar(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    let (user, previous_url) = state.user_service.set_avatar(user_id, None).await?;

    remove_avatar_file(&state.avatar_storage, previous_url.as_deref()).await;

    Ok(Json(ApiResponse::new("Avatar removed", user)))
}

/// Best-effort removal of a no-longer-referenced avatar file
async fn remove_avatar_file(storage: &AvatarStorage, avatar_url: Option<&str>) {
    let Some(url) = avatar_url else { return };
    let Some(file_name) = storage.file_name_from_url(url) else {
        return;
    };
    if let Err(e) = storage.remove(file_name).await {
        log::warn!("failed to remove stale avatar file {}: {}", file_name, e);
    }
}

// ---------------------------------------------------------------------------
// Products

/// Create a new catalog product
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state.product_service.create_product(request).await?;
    Ok(Json(ApiResponse::new("Product created", product)))
}

/// Get product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state.product_service.get_product(product_id).await?;
    Ok(Json(ApiResponse::new("Product found", product)))
}

/// Update a catalog product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(request): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state
        .product_service
        .update_product(product_id, request)
        .await?;
    Ok(Json(ApiResponse::new("Product updated", product)))
}

/// Delete a catalog product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.product_service.delete_product(product_id).await?;
    Ok(Json(ApiResponse::message_only("Product deleted")))
}

/// Search products with pagination, sorting, and filtering
pub async fn search_products(
    State(state): State<AppState>,
    Query(raw): Query<RawSearchQuery>,
) -> AppResult<Json<ApiResponse<SearchResult<Product>>>> {
    let result = state.product_service.search_products(&raw).await?;
    Ok(Json(ApiResponse::new("Products found", result)))
}

// ---------------------------------------------------------------------------
// Authentication

/// Log in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid login data: {}", e)))?;

    let user = state
        .user_service
        .verify_credentials(&request.email, &request.password)
        .await?;

    let issued = state.jwt_service.issue(user.id)?;
    let response = LoginResponse::new(issued.token, issued.expires_in, user);

    Ok(Json(ApiResponse::new("Login successful", response)))
}

/// Start a password reset for an email address
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid email: {}", e)))?;

    state
        .password_reset_service
        .request_reset(&request.email)
        .await?;

    // Same acknowledgement whether or not the account exists
    Ok(Json(ApiResponse::message_only(
        "If that email is registered, a reset link has been sent",
    )))
}

/// Complete a password reset with an emailed token
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid reset data: {}", e)))?;

    state
        .password_reset_service
        .reset_password(&request.token, &request.new_password)
        .await?;

    Ok(Json(ApiResponse::message_only("Password updated")))
}
