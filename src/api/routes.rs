//! API Route Definitions
//!
//! Route registration through a builder with per-group toggles, so a
//! deployment can expose only the endpoint groups it needs, such as a
//! catalog node without account management or a monitoring target with
//! just the health check.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use super::handlers::{self, AppState};
use super::middleware::auth_middleware;

/// Builder for creating API routes with configurable endpoint groups
#[derive(Debug, Default)]
pub struct RouterBuilder {
    /// Whether to enable the health check endpoint (GET /health)
    health_check: bool,
    /// Whether to enable user CRUD and search endpoints (/users)
    user_routes: bool,
    /// Whether to enable product CRUD and search endpoints (/products)
    product_routes: bool,
    /// Whether to enable the login endpoint (POST /auth/login)
    auth_routes: bool,
    /// Whether to enable the password reset endpoints (/password/*)
    password_reset_routes: bool,
    /// Whether to enable avatar upload endpoints (/users/{id}/avatar)
    avatar_routes: bool,
}

impl RouterBuilder {
    /// Creates a new router builder with all groups disabled by default
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router builder with every endpoint group enabled
    pub fn with_all_routes() -> Self {
        Self {
            health_check: true,
            user_routes: true,
            product_routes: true,
            auth_routes: true,
            password_reset_routes: true,
            avatar_routes: true,
        }
    }

    /// Creates a router builder for a catalog-only deployment
    ///
    /// Products and authentication, without account management.
    pub fn with_catalog_routes() -> Self {
        Self {
            health_check: true,
            user_routes: false,
            product_routes: true,
            auth_routes: true,
            password_reset_routes: false,
            avatar_routes: false,
        }
    }

    /// Creates a router builder with only the health check enabled
    pub fn with_minimal_routes() -> Self {
        Self {
            health_check: true,
            ..Self::default()
        }
    }

    /// Enables or disables the health check endpoint
    pub fn health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }

    /// Enables or disables the user endpoints
    pub fn user_routes(mut self, enabled: bool) -> Self {
        self.user_routes = enabled;
        self
    }

    /// Enables or disables the product endpoints
    pub fn product_routes(mut self, enabled: bool) -> Self {
        self.product_routes = enabled;
        self
    }

    /// Enables or disables the login endpoint
    pub fn auth_routes(mut self, enabled: bool) -> Self {
        self.auth_routes = enabled;
        self
    }

    /// Enables or disables the password reset endpoints
    pub fn password_reset_routes(mut self, enabled: bool) -> Self {
        self.password_reset_routes = enabled;
        self
    }

    /// Enables or disables the avatar endpoints
    pub fn avatar_routes(mut self, enabled: bool) -> Self {
        self.avatar_routes = enabled;
        self
    }

    /// Builds the Axum router with the configured route groups.
    ///
    /// Registration, login, the password reset flow, and the health check
    /// stay public; everything else sits behind the bearer-token
    /// middleware.
    pub fn build(self, state: AppState) -> Router {
        let auth = from_fn_with_state(state.jwt_service.clone(), auth_middleware);
        let mut router = Router::new();

        if self.health_check {
            router = router.route("/health", get(handlers::health_check));
        }

        if self.user_routes {
            router = router
                .route("/users", post(handlers::create_user))
                .route("/users", get(handlers::search_users).layer(auth.clone()))
                .route(
                    "/users/{id}",
                    get(handlers::get_user)
                        .patch(handlers::update_user)
                        .delete(handlers::delete_user)
                        .layer(auth.clone()),
                );
        }

        if self.product_routes {
            router = router
                .route(
                    "/products",
                    get(handlers::search_products)
                        .post(handlers::create_product)
                        .layer(auth.clone()),
                )
                .route(
                    "/products/{id}",
                    get(handlers::get_product)
                        .patch(handlers::update_product)
                        .delete(handlers::delete_product)
                        .layer(auth.clone()),
                );
        }

        if self.auth_routes {
            router = router.route("/auth/login", post(handlers::login));
        }

        if self.password_reset_routes {
            router = router
                .route("/password/forgot", post(handlers::forgot_password))
                .route("/password/reset", post(handlers::reset_password));
        }

        if self.avatar_routes {
            router = router.route(
                "/users/{id}/avatar",
                post(handlers::upload_avatar)
                    .delete(handlers::delete_avatar)
                    .layer(auth.clone()),
            );
        }

        router.with_state(state)
    }
}

/// Creates a router with every endpoint group enabled
pub fn create_routes(state: AppState) -> Router {
    RouterBuilder::with_all_routes().build(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that RouterBuilder::new() starts with all groups disabled
    #[test]
    fn test_router_builder_new() {
        let builder = RouterBuilder::new();

        assert!(!builder.health_check);
        assert!(!builder.user_routes);
        assert!(!builder.product_routes);
        assert!(!builder.auth_routes);
        assert!(!builder.password_reset_routes);
        assert!(!builder.avatar_routes);
    }

    /// Test that with_all_routes() enables every group
    #[test]
    fn test_router_builder_with_all_routes() {
        let builder = RouterBuilder::with_all_routes();

        assert!(builder.health_check);
        assert!(builder.user_routes);
        assert!(builder.product_routes);
        assert!(builder.auth_routes);
        assert!(builder.password_reset_routes);
        assert!(builder.avatar_routes);
    }

    /// Test that the catalog preset excludes account management
    #[test]
    fn test_router_builder_with_catalog_routes() {
        let builder = RouterBuilder::with_catalog_routes();

        assert!(builder.health_check);
        assert!(builder.product_routes);
        assert!(builder.auth_routes);
        assert!(!builder.user_routes);
        assert!(!builder.password_reset_routes);
        assert!(!builder.avatar_routes);
    }

    /// Test that the minimal preset only keeps the health check
    #[test]
    fn test_router_builder_with_minimal_routes() {
        let builder = RouterBuilder::with_minimal_routes();

        assert!(builder.health_check);
        assert!(!builder.user_routes);
        assert!(!builder.product_routes);
        assert!(!builder.auth_routes);
        assert!(!builder.password_reset_routes);
        assert!(!builder.avatar_routes);
    }

    /// Test that individual toggle methods work correctly
    #[test]
    fn test_router_builder_individual_methods() {
        let builder = RouterBuilder::new()
            .health_check(true)
            .user_routes(true)
            .product_routes(false)
            .auth_routes(true)
            .password_reset_routes(false)
            .avatar_routes(true);

        assert!(builder.health_check);
        assert!(builder.user_routes);
        assert!(!builder.product_routes);
        assert!(builder.auth_routes);
        assert!(!builder.password_reset_routes);
        assert!(builder.avatar_routes);
    }
}
