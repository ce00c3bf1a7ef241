//! Access-token middleware for protected routes
//!
//! Reads the `accessToken` cookie, falling back to an
//! `Authorization: Bearer` header, and inserts [`AuthUser`] into the
//! request extensions.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use super::cookies::ACCESS_COOKIE;
use super::tokens::{TokenError, TokenService};
use crate::error::ApiError;

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

pub fn access_token_from(headers: &HeaderMap) -> Option<String> {
    let from_cookie = CookieJar::from_headers(headers)
        .get(ACCESS_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = access_token_from(request.headers())
        .ok_or_else(|| ApiError::Unauthorized("No access token".to_string()))?;

    let claims = tokens.verify_access(&token).map_err(|e| match e {
        TokenError::Expired => ApiError::Unauthorized("Access token expired".to_string()),
        other => {
            tracing::debug!("Rejected access token: {}", other);
            ApiError::Forbidden("Invalid or expired access token".to_string())
        }
    })?;

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::COOKIE, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Extension, Router,
    };
    use banter::User;
    use chrono::Duration;
    use tower::ServiceExt;

    fn app(tokens: Arc<TokenService>) -> Router {
        Router::new()
            .route(
                "/me",
                get(|Extension(user): Extension<AuthUser>| async move { user.username }),
            )
            .layer(from_fn_with_state(tokens, require_auth))
    }

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new("access", "refresh"))
    }

    fn user() -> User {
        User::new("grace".into(), "hash".into(), None)
    }

    async fn call(app: Router, request: axum::http::Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_cookie_token_accepted() {
        let tokens = tokens();
        let pair = tokens.issue(&user(), false).unwrap();
        let request = axum::http::Request::builder()
            .uri("/me")
            .header(COOKIE, format!("{ACCESS_COOKIE}={}", pair.access_token))
            .body(Body::empty())
            .unwrap();

        let (status, body) = call(app(tokens), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "grace");
    }

    #[tokio::test]
    async fn test_bearer_token_accepted() {
        let tokens = tokens();
        let pair = tokens.issue(&user(), false).unwrap();
        let request = axum::http::Request::builder()
            .uri("/me")
            .header(AUTHORIZATION, format!("Bearer {}", pair.access_token))
            .body(Body::empty())
            .unwrap();

        let (status, _) = call(app(tokens), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let request = axum::http::Request::builder()
            .uri("/me")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(app(tokens()), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("No access token"));
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let expired = TokenService::new("access", "refresh")
            .with_ttls(Duration::seconds(-30), Duration::days(1));
        let pair = expired.issue(&user(), false).unwrap();
        let request = axum::http::Request::builder()
            .uri("/me")
            .header(COOKIE, format!("{ACCESS_COOKIE}={}", pair.access_token))
            .body(Body::empty())
            .unwrap();

        let (status, body) = call(app(tokens()), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Access token expired"));
    }

    #[tokio::test]
    async fn test_tampered_token_is_forbidden() {
        let request = axum::http::Request::builder()
            .uri("/me")
            .header(AUTHORIZATION, "Bearer abc.def.ghi")
            .body(Body::empty())
            .unwrap();
        let (status, _) = call(app(tokens()), request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
