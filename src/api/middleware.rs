//! Authentication Middleware
//!
//! Middleware for JWT authentication in API endpoints.

use crate::models::UserContext;
use crate::service::JwtService;
use crate::utils::error::AppError;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Extension type for storing authenticated user context in request extensions
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserContext);

/// Authentication middleware that validates bearer tokens.
///
/// Extracts the Authorization header, checks the `Bearer` scheme, verifies
/// the JWT, and stores the resulting [`UserContext`] in request extensions
/// for handlers that want the caller's identity. Failures short-circuit
/// with 401.
pub async fn auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Missing Authorization header".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Authentication("Invalid Authorization header format".into()))?;

    let user_context = jwt_service
        .verify(token)
        .map_err(|_| AppError::Authentication("Invalid or expired token".into()))?;

    request.extensions_mut().insert(AuthUser(user_context));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Extension, Router,
    };
    use tower::util::ServiceExt;
    use uuid::Uuid;

    fn create_test_jwt_service() -> Arc<JwtService> {
        Arc::new(JwtService::new(
            "test_secret_key_with_enough_length".to_string(),
        ))
    }

    async fn protected_handler(Extension(auth_user): Extension<AuthUser>) -> String {
        auth_user.0.user_id.to_string()
    }

    fn test_app(jwt_service: Arc<JwtService>) -> Router {
        Router::new()
            .route("/protected", get(protected_handler))
            .layer(from_fn_with_state(jwt_service, auth_middleware))
    }

    fn request_with_header(header: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().method(Method::GET).uri("/protected");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let app = test_app(create_test_jwt_service());
        let response = app.oneshot(request_with_header(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_header_is_unauthorized() {
        let app = test_app(create_test_jwt_service());
        let response = app
            .oneshot(request_with_header(Some("Basic dXNlcjpwYXNz")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let app = test_app(create_test_jwt_service());
        let response = app
            .oneshot(request_with_header(Some("Bearer not-a-real-token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let jwt_service = create_test_jwt_service();
        let user_id = Uuid::new_v4();
        let issued = jwt_service.issue(user_id).unwrap();

        let app = test_app(jwt_service);
        let response = app
            .oneshot(request_with_header(Some(&format!(
                "Bearer {}",
                issued.token
            ))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], user_id.to_string().as_bytes());
    }
}
