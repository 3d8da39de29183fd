//! Catalog Service Development Server
//!
//! Runs the full HTTP server with every endpoint group enabled for local
//! development and testing. Production deployments that need a reduced
//! surface should use the RouterBuilder from their own binary instead.

use std::sync::Arc;

use dotenv::dotenv;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use catalog_service::{
    api::{AppState, RouterBuilder},
    config::AppConfig,
    database,
    service::{
        AvatarStorage, EmailService, JwtService, PasswordResetService, ProductService, UserService,
    },
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv().ok();

    env_logger::init();

    log::info!("Starting catalog service v{}", catalog_service::VERSION);

    // Load configuration from environment
    let config = AppConfig::from_env()?;
    config.validate()?;

    log::info!("Configuration loaded and validated");

    let pool = database::create_pool(&config.database).await?;

    log::info!("Running database migrations");
    database::run_migrations(&pool).await?;
    log::info!("Database migrations completed");

    // Optional email service; the password reset flow degrades to logging
    // when SMTP is not configured
    let email_service = match &config.email {
        Some(email_config) => {
            let service = EmailService::new(email_config)?;
            log::info!("Email service initialized ({})", email_config.smtp_host);
            Some(Arc::new(service))
        }
        None => {
            log::warn!("SMTP not configured; password reset emails disabled");
            None
        }
    };

    let reset_base_url = config
        .email
        .as_ref()
        .map(|email| email.app_base_url.clone())
        .unwrap_or_else(|| format!("http://{}:{}", config.server.host, config.server.port));

    // Build the object graph once and hand references down
    let jwt_service = Arc::new(JwtService::with_expiration(
        config.jwt.secret.clone(),
        chrono::Duration::hours(config.jwt.access_token_expires_hours),
    ));
    let avatar_storage = Arc::new(AvatarStorage::new(
        config.storage.avatar_dir.clone(),
        config.storage.public_base_url.clone(),
        config.storage.max_avatar_bytes,
    ));

    let state = AppState {
        user_service: Arc::new(UserService::new(pool.clone())),
        product_service: Arc::new(ProductService::new(pool.clone())),
        jwt_service,
        password_reset_service: Arc::new(PasswordResetService::new(
            pool,
            email_service,
            reset_base_url,
        )),
        avatar_storage,
    };

    log::info!("Services initialized");

    let router = RouterBuilder::with_all_routes().build(state);

    // Serve uploaded avatars next to the API
    let app = router
        .nest_service(
            &config.storage.public_base_url,
            ServeDir::new(&config.storage.avatar_dir),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any) // Permissive CORS for development
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .into_inner(),
        );

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    log::info!("Listening on {}", bind_addr);

    log::info!("Endpoints:");
    log::info!("  GET    /health");
    log::info!("  POST   /auth/login");
    log::info!("  POST   /password/forgot");
    log::info!("  POST   /password/reset");
    log::info!("  POST   /users");
    log::info!("  GET    /users?page=&page_size=&sort_field=&sort_direction=&filter_field=&filter_value=");
    log::info!("  GET    /users/{{id}}  PATCH /users/{{id}}  DELETE /users/{{id}}");
    log::info!("  POST   /users/{{id}}/avatar  DELETE /users/{{id}}/avatar");
    log::info!("  POST   /products");
    log::info!("  GET    /products?page=&page_size=&sort_field=&sort_direction=&filter_field=&filter_value=");
    log::info!("  GET    /products/{{id}}  PATCH /products/{{id}}  DELETE /products/{{id}}");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
