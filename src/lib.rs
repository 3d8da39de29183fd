//! Catalog Service Library
//!
//! A REST backend for product catalog and user account management with
//! generic search, JWT authentication, password reset, and avatar storage.
//!
//! # Features
//!
//! - **Product & User CRUD**: Create, read, update, and delete with input
//!   validation and duplicate detection
//! - **Generic Search Pipeline**: One pagination/sort/filter implementation
//!   shared by every resource, with per-resource allow-lists and defaults
//! - **JWT Authentication**: Stateless bearer tokens guarding the API
//! - **Password Reset**: Hashed single-use tokens delivered by email
//! - **Avatar Storage**: Multipart uploads persisted to a served directory
//! - **Type Safety**: SQLx row mapping and typed request validation
//!
//! # Quick Start
//!
//! ## As a Service Library
//!
//! ```rust,no_run
//! use catalog_service::{models::CreateProductRequest, service::ProductService};
//! use sqlx::PgPool;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = PgPool::connect("postgres://localhost/catalog").await?;
//!     let products = ProductService::new(pool);
//!
//!     let request = CreateProductRequest {
//!         name: "Hex Bolt".to_string(),
//!         description: Some("M8 stainless".to_string()),
//!         price_cents: 249,
//!         quantity: 500,
//!     };
//!
//!     let product = products.create_product(request).await?;
//!     println!("Created product: {} ({})", product.name, product.id);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## As a Web Server Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use catalog_service::{
//!     api::{AppState, RouterBuilder},
//!     service::{AvatarStorage, JwtService, PasswordResetService, ProductService, UserService},
//! };
//! use sqlx::PgPool;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = PgPool::connect("postgres://localhost/catalog").await?;
//!
//!     let state = AppState {
//!         user_service: Arc::new(UserService::new(pool.clone())),
//!         product_service: Arc::new(ProductService::new(pool.clone())),
//!         jwt_service: Arc::new(JwtService::new(
//!             "change_me_to_a_long_random_secret_value".to_string(),
//!         )),
//!         password_reset_service: Arc::new(PasswordResetService::new(
//!             pool,
//!             None,
//!             "http://localhost:3000".to_string(),
//!         )),
//!         avatar_storage: Arc::new(AvatarStorage::new(
//!             "uploads/avatars",
//!             "/avatars".to_string(),
//!             5 * 1024 * 1024,
//!         )),
//!     };
//!
//!     let app = RouterBuilder::with_all_routes().build(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Search
//!
//! Every list endpoint accepts the same flat query parameters (`page`,
//! `page_size`, `sort_field`, `sort_direction`, `filter_field`,
//! `filter_value`) and normalizes them against the resource's allow-lists.
//! Invalid or missing parameters degrade to defaults instead of failing:
//!
//! ```rust
//! use catalog_service::search::RawSearchQuery;
//! use catalog_service::service::product::PRODUCT_SEARCH;
//!
//! let raw = RawSearchQuery {
//!     page: Some("2".to_string()),
//!     sort_field: Some("does_not_exist".to_string()),
//!     ..RawSearchQuery::default()
//! };
//!
//! let query = PRODUCT_SEARCH.normalize(&raw);
//! assert_eq!(query.page, 2);
//! assert_eq!(query.sort_field, "created_at"); // fell back to the default
//! ```
//!
//! # Architecture
//!
//! The library is organized into several layers:
//!
//! - **API Layer**: HTTP handlers, authentication middleware, and
//!   configurable route registration
//! - **Service Layer**: Business logic per resource plus JWT, email,
//!   password reset, and avatar storage services
//! - **Search**: The shared normalize/filter/sort/paginate pipeline with
//!   in-memory and SQL backends
//! - **Models**: Entities and request/response structures
//! - **Database**: Connection management
//! - **Utils**: Shared error, security, and validation helpers

/// HTTP API layer with handlers, middleware, and configurable routing
pub mod api;

/// Configuration management for all service settings
pub mod config;

/// Database connection management and configuration
pub mod database;

/// Data models and request/response structures
pub mod models;

/// Generic search, pagination, sorting, and filtering pipeline
pub mod search;

/// Business logic and resource management services
pub mod service;

/// Shared utilities for security, validation, and error handling
pub mod utils;

// Re-export commonly used types for convenient access
pub use api::{create_routes, ApiResponse, AppState, RouterBuilder};
pub use config::AppConfig;
pub use database::DatabasePool;
pub use models::{
    requests::{
        CreateProductRequest, CreateUserRequest, ForgotPasswordRequest, LoginRequest,
        LoginResponse, ResetPasswordRequest, UpdateProductRequest, UpdateUserRequest,
    },
    Product, User, UserContext,
};
pub use search::{
    QueryDescriptor, RawSearchQuery, SearchConfig, SearchResult, SearchStore, SortDirection,
};
pub use service::{
    AvatarStorage, EmailService, JwtService, PasswordResetService, ProductService, UserService,
};
pub use utils::error::{AppError, AppResult, ErrorResponse};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
