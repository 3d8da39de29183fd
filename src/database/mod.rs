//! Database Module
//!
//! Database connection management for the catalog service.

pub mod connection;

// Re-export commonly used items
pub use connection::{create_pool, run_migrations, DatabasePool};
