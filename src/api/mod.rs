//! API Layer
//!
//! HTTP API endpoints and request handling for the catalog service.

pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use handlers::{ApiResponse, AppState};
pub use middleware::{auth_middleware, AuthUser};
pub use routes::{create_routes, RouterBuilder};
