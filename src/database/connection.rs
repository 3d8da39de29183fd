//! Database Connection Management
//!
//! PostgreSQL pool construction and migration running. Pool sizing and
//! timeouts come from the database section of [`AppConfig`](crate::config::AppConfig);
//! migrations are embedded from the `migrations/` directory at compile time.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Database connection pool type alias for convenience
pub type DatabasePool = PgPool;

/// Open a connection pool sized and timed per the configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
        .connect(&config.url)
        .await
}

/// Apply any pending embedded migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
