//! User Service Implementation
//!
//! Core business logic for user account management.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    requests::{CreateUserRequest, UpdateUserRequest},
    user::{User, UserWithPassword},
};
use crate::search::{
    RawSearchQuery, SearchConfig, SearchDefaults, SearchResult, SearchStore, SortDirection,
    SqlSearcher,
};
use crate::utils::{
    error::{AppError, AppResult},
    security::{hash_password_with_cost, verify_password, DEFAULT_BCRYPT_COST},
    validation::normalize_email,
};

/// Select list shared by every user query; matches `UserWithPassword`
const USER_COLUMNS: &str = "id, name, email, password_hash, avatar_url, created_at, updated_at";

/// Select list for search results; matches `User`
const USER_SEARCH_COLUMNS: &str = "id, name, email, avatar_url, created_at, updated_at";

/// Search allow-lists and defaults for the users table
pub const USER_SEARCH: SearchConfig = SearchConfig {
    sortable_fields: &["name", "email", "created_at", "updated_at"],
    filterable_fields: &["name", "email"],
    defaults: SearchDefaults {
        page: 1,
        page_size: 15,
        sort_field: "created_at",
        sort_direction: SortDirection::Desc,
        filter_field: "name",
    },
};

/// Custom error types for the user service
#[derive(Error, Debug)]
pub enum UserServiceError {
    /// User with the specified identifier was not found
    #[error("User not found")]
    UserNotFound,

    /// Attempted to create a user with an email that already exists
    #[error("Email already exists")]
    EmailAlreadyExists,

    /// Invalid login credentials provided
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Input validation failed with detailed error message
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Password hashing operation failed
    #[error("Password hashing error: {0}")]
    HashingError(#[from] bcrypt::BcryptError),
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::UserNotFound => AppError::NotFound("User not found".to_string()),
            UserServiceError::EmailAlreadyExists => {
                AppError::Conflict("Email already exists".to_string())
            }
            UserServiceError::InvalidCredentials => {
                AppError::Authentication("Invalid credentials".to_string())
            }
            UserServiceError::ValidationError(msg) => AppError::Validation(msg),
            UserServiceError::DatabaseError(e) => AppError::Database(e),
            UserServiceError::HashingError(e) => AppError::Hashing(e),
        }
    }
}

/// Result type for user service operations
pub type UserServiceResult<T> = Result<T, UserServiceError>;

/// Core user service providing CRUD operations and business logic
#[derive(Clone)]
pub struct UserService {
    /// Database connection pool
    pool: PgPool,

    /// bcrypt cost factor for password hashing
    bcrypt_cost: u32,

    /// Search adapter over the users table
    searcher: SqlSearcher<User>,
}

impl UserService {
    /// Creates a new UserService instance with the provided connection pool
    pub fn new(pool: PgPool) -> Self {
        let searcher = SqlSearcher::new(pool.clone(), "users", USER_SEARCH_COLUMNS);
        Self {
            pool,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            searcher,
        }
    }

    /// Creates a new user account with the provided information
    pub async fn create_user(&self, request: CreateUserRequest) -> UserServiceResult<User> {
        request
            .validate()
            .map_err(|e| UserServiceError::ValidationError(format!("Invalid user data: {}", e)))?;

        let normalized_email = normalize_email(&request.email);
        let password_hash = hash_password_with_cost(&request.password, self.bcrypt_cost)?;

        let sql = format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let user: UserWithPassword = sqlx::query_as(&sql)
            .bind(request.name.trim())
            .bind(&normalized_email)
            .bind(&password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::map_unique_violation)?;

        Ok(user.into())
    }

    /// Retrieves a user by their unique ID
    pub async fn get_user(&self, user_id: Uuid) -> UserServiceResult<User> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user: UserWithPassword = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserServiceError::UserNotFound)?;

        Ok(user.into())
    }

    /// Updates an existing user's profile information.
    ///
    /// Only fields present in the request change; absent fields keep their
    /// current values.
    pub async fn update_user(
        &self,
        user_id: Uuid,
        request: UpdateUserRequest,
    ) -> UserServiceResult<User> {
        request
            .validate()
            .map_err(|e| UserServiceError::ValidationError(format!("Invalid update data: {}", e)))?;

        let normalized_email = request.email.as_deref().map(normalize_email);

        let sql = format!(
            "UPDATE users SET \
                 name = COALESCE($2, name), \
                 email = COALESCE($3, email), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user: UserWithPassword = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(request.name.as_deref().map(str::trim))
            .bind(normalized_email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_unique_violation)?
            .ok_or(UserServiceError::UserNotFound)?;

        Ok(user.into())
    }

    /// Deletes a user account, returning the removed record
    pub async fn delete_user(&self, user_id: Uuid) -> UserServiceResult<User> {
        let sql = format!("DELETE FROM users WHERE id = $1 RETURNING {}", USER_COLUMNS);
        let user: UserWithPassword = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserServiceError::UserNotFound)?;

        Ok(user.into())
    }

    /// Search users with pagination, sorting, and filtering.
    ///
    /// Raw input is normalized against [`USER_SEARCH`]; invalid parameters
    /// degrade to the configured defaults rather than failing.
    pub async fn search_users(&self, raw: &RawSearchQuery) -> AppResult<SearchResult<User>> {
        let query = USER_SEARCH.normalize(raw);
        self.searcher.search(&query).await
    }

    /// Verify login credentials, returning the account on success.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> UserServiceResult<User> {
        let normalized_email = normalize_email(email);

        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user: Option<UserWithPassword> = sqlx::query_as(&sql)
            .bind(&normalized_email)
            .fetch_optional(&self.pool)
            .await?;

        let Some(user) = user else {
            return Err(UserServiceError::InvalidCredentials);
        };

        if verify_password(password, &user.password_hash)? {
            Ok(user.into())
        } else {
            Err(UserServiceError::InvalidCredentials)
        }
    }

    /// Replace the user's avatar reference, returning the updated record and
    /// the previous reference so the caller can clean up the old file
    pub async fn set_avatar(
        &self,
        user_id: Uuid,
        avatar_url: Option<&str>,
    ) -> UserServiceResult<(User, Option<String>)> {
        let previous: Option<(Option<String>,)> =
            sqlx::query_as("SELECT avatar_url FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        let Some((previous_url,)) = previous else {
            return Err(UserServiceError::UserNotFound);
        };

        let sql = format!(
            "UPDATE users SET avatar_url = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user: UserWithPassword = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(avatar_url)
            .fetch_one(&self.pool)
            .await?;

        Ok((user.into(), previous_url))
    }

    /// Check database connectivity
    pub async fn health_check(&self) -> UserServiceResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    /// Map a unique-constraint violation on the email column to a conflict
    fn map_unique_violation(e: sqlx::Error) -> UserServiceError {
        match e {
            sqlx::Error::Database(db_err) if db_err.constraint() == Some("users_email_key") => {
                UserServiceError::EmailAlreadyExists
            }
            other => UserServiceError::DatabaseError(other),
        }
    }
}
