//! Auth Routes - Registration, login, token rotation and OAuth
//!
//! Tokens are delivered as HttpOnly cookies; response bodies only carry
//! the public user.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use std::sync::Arc;
use uuid::Uuid;

use banter::{OAuthIdentityProvider, OAuthProvider};

use crate::auth::cookies::{OAUTH_STATE_COOKIE, REFRESH_COOKIE};
use crate::auth::middleware::access_token_from;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    ApiResponse, LoginRequest, MessageOnlyResponse, OAuthCallbackQuery, RegisterRequest,
    RegisterResponse, RegisteredUser, SessionResponse, UserResponse,
};
use crate::AppState;

/// Register with username and password
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered (or password attached to an OAuth account)", body = RegisterResponse),
        (status = 400, description = "Missing username or password too short"),
        (status = 409, description = "User already exists")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<ApiResponse<RegisterResponse>>)> {
    let registration = state
        .auth_service
        .register(&payload.username, &payload.password, payload.name)
        .await?;

    let message = if registration.merged {
        "User registered successfully (Merged)"
    } else {
        "User registered successfully"
    };

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(RegisterResponse {
            message: message.to_string(),
            user: RegisteredUser {
                id: registration.user.id,
                username: registration.user.username,
            },
        }),
    ))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; accessToken and refreshToken cookies set", body = SessionResponse),
        (status = 401, description = "Invalid username or password"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Account uses OAuth")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<(CookieJar, Json<ApiResponse<SessionResponse>>)> {
    let session = state
        .auth_service
        .login(&payload.username, &payload.password, payload.remember_me)
        .await?;

    let jar = state.cookies.set_tokens(jar, &session.tokens);
    Ok((jar, ApiResponse::ok(session.user.into())))
}

/// Clear auth cookies
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageOnlyResponse)
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<MessageOnlyResponse>>) {
    (
        state.cookies.clear_tokens(jar),
        ApiResponse::ok(MessageOnlyResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// Current user from the access token
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    responses(
        (status = 200, description = "Token valid", body = SessionResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Auth"
)]
pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ApiResponse<SessionResponse>>> {
    let token = access_token_from(&headers)
        .ok_or_else(|| ApiError::Unauthorized("No access token".to_string()))?;
    let user = state.auth_service.verify_access(&token).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Rotate the token pair using the refresh cookie
#[utoipa::path(
    get,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "New cookies set", body = SessionResponse),
        (status = 401, description = "Missing, invalid or expired refresh token")
    ),
    tag = "Auth"
)]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<ApiResponse<SessionResponse>>)> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("No refresh token".to_string()))?;

    let session = state.auth_service.refresh(&token).await?;
    let jar = state.cookies.set_tokens(jar, &session.tokens);
    Ok((jar, ApiResponse::ok(session.user.into())))
}

/// Public profile of a user
#[utoipa::path(
    get,
    path = "/api/auth/users/{username}",
    params(
        ("username" = String, Path, description = "Username")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    tag = "Auth"
)]
pub async fn get_user(
    State(state): State<AppState>,
    WithRejection(Path(username), _): WithRejection<Path<String>, ApiError>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state.auth_service.get_user(&username).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Redirect to the provider's consent screen
#[utoipa::path(
    get,
    path = "/api/auth/login/{provider}",
    params(
        ("provider" = String, Path, description = "google, facebook or github")
    ),
    responses(
        (status = 303, description = "Redirect to the provider"),
        (status = 400, description = "Unknown provider"),
        (status = 404, description = "Provider not configured")
    ),
    tag = "Auth"
)]
pub async fn oauth_start(
    State(state): State<AppState>,
    WithRejection(Path(provider), _): WithRejection<Path<String>, ApiError>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Redirect)> {
    let (provider, client) = resolve_provider(&state, &provider)?;

    let nonce = Uuid::new_v4().simple().to_string();
    let url = client.authorize_url(&nonce, &state.config.oauth_callback_url(provider));

    Ok((
        jar.add(state.cookies.oauth_state_cookie(nonce)),
        Redirect::to(&url),
    ))
}

/// Provider callback: verify state, log in, redirect to the client
#[utoipa::path(
    get,
    path = "/api/auth/login/{provider}/callback",
    params(
        ("provider" = String, Path, description = "google, facebook or github"),
        OAuthCallbackQuery
    ),
    responses(
        (status = 303, description = "Logged in; redirect to the client"),
        (status = 400, description = "Denied, missing code or state mismatch"),
        (status = 502, description = "Provider error")
    ),
    tag = "Auth"
)]
pub async fn oauth_callback(
    State(state): State<AppState>,
    WithRejection(Path(provider), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<OAuthCallbackQuery>, ApiError>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Redirect)> {
    let (provider, client) = resolve_provider(&state, &provider)?;

    if let Some(error) = query.error {
        tracing::warn!(
            "{} login denied: {} {}",
            provider,
            error,
            query.error_description.unwrap_or_default()
        );
        return Err(ApiError::BadRequest(format!("{provider} login failed: {error}")));
    }
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing authorization code".to_string()))?;

    let expected = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    match (expected, query.state) {
        (Some(expected), Some(actual)) if !expected.is_empty() && expected == actual => {}
        _ => {
            tracing::warn!("{} callback with invalid state", provider);
            return Err(ApiError::BadRequest("Invalid OAuth state".to_string()));
        }
    }

    let profile = client
        .fetch_profile(&code, &state.config.oauth_callback_url(provider))
        .await
        .map_err(|e| ApiError::upstream("Couldn't complete OAuth", e))?;

    let session = state.auth_service.oauth_login(&profile).await?;
    let jar = state.cookies.set_tokens(jar, &session.tokens);
    let jar = state.cookies.clear_oauth_state(jar);

    Ok((jar, Redirect::to(&state.config.front_end)))
}

fn resolve_provider(
    state: &AppState,
    raw: &str,
) -> Result<(OAuthProvider, Arc<dyn OAuthIdentityProvider>), ApiError> {
    let provider: OAuthProvider = raw.parse().map_err(ApiError::BadRequest)?;
    let client = state
        .oauth
        .get(provider)
        .ok_or_else(|| ApiError::NotFound(format!("{provider} login is not configured")))?;
    Ok((provider, client))
}

/// Routes reachable without an access token
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/verify", get(verify))
        .route("/api/auth/refresh", get(refresh))
        .route("/api/auth/login/:provider", get(oauth_start))
        .route("/api/auth/login/:provider/callback", get(oauth_callback))
}

pub fn protected_router() -> Router<AppState> {
    Router::new().route("/api/auth/users/:username", get(get_user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::OAuthRegistry;
    use crate::application::testing::FakeCompletion;
    use crate::routes::testing::{
        body_json, cookie_value, json_request, request, set_cookie, TestApp, PASSWORD,
    };
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use banter::{DomainError, OAuthProfile};

    struct FakeGithub;

    #[async_trait]
    impl OAuthIdentityProvider for FakeGithub {
        fn provider(&self) -> OAuthProvider {
            OAuthProvider::Github
        }

        fn authorize_url(&self, state: &str, redirect_uri: &str) -> String {
            format!("https://github.test/authorize?state={state}&redirect_uri={redirect_uri}")
        }

        async fn fetch_profile(
            &self,
            code: &str,
            _redirect_uri: &str,
        ) -> Result<OAuthProfile, DomainError> {
            if code != "good-code" {
                return Err(DomainError::ExternalService("bad_verification_code".into()));
            }
            Ok(OAuthProfile {
                provider: OAuthProvider::Github,
                provider_user_id: "42".into(),
                email: Some("octo@example.com".into()),
                display_name: Some("Octo".into()),
                image: None,
            })
        }
    }

    fn github_app() -> TestApp {
        let mut oauth = OAuthRegistry::default();
        oauth.register(Arc::new(FakeGithub));
        TestApp::with_oauth(FakeCompletion::default(), oauth)
    }

    fn callback(query: &str, state_cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(format!("/api/auth/login/github/callback?{query}"));
        if let Some(state) = state_cookie {
            builder = builder.header(header::COOKIE, format!("{OAUTH_STATE_COOKIE}={state}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_register_returns_created() {
        let app = TestApp::new(FakeCompletion::default());
        let response = app
            .send(json_request(
                "POST",
                "/api/auth/register",
                None,
                r#"{"username": "amy@example.com", "password": "password!", "name": "Amy"}"#,
            ))
            .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["message"], "User registered successfully");
        assert_eq!(json["data"]["user"]["username"], "amy@example.com");
    }

    #[tokio::test]
    async fn test_malformed_body_gets_error_envelope() {
        let app = TestApp::new(FakeCompletion::default());

        let response = app
            .send(json_request(
                "POST",
                "/api/auth/register",
                None,
                r#"{"username": "amy"}"#,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("missing field"));

        let no_content_type = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .body(Body::from(r#"{"username": "amy", "password": "x"}"#))
            .unwrap();
        let response = app.send(no_content_type).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_login_sets_both_cookies() {
        let app = TestApp::new(FakeCompletion::default());
        app.access_token("bea").await;

        let response = app
            .send(json_request(
                "POST",
                "/api/auth/login",
                None,
                &format!(r#"{{"username": "bea", "password": "{PASSWORD}", "rememberMe": true}}"#),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let access = set_cookie(&response, "accessToken").unwrap();
        let refresh = set_cookie(&response, "refreshToken").unwrap();
        assert!(access.contains("HttpOnly"));
        assert!(refresh.contains("Path=/api/auth/refresh"));
        assert!(refresh.contains("Max-Age=2592000"));
        assert_eq!(body_json(response).await["data"]["user"]["username"], "bea");
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let app = TestApp::new(FakeCompletion::default());
        app.access_token("cal").await;

        let response = app
            .send(json_request(
                "POST",
                "/api/auth/login",
                None,
                r#"{"username": "cal", "password": "not-the-one"}"#,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Invalid username or password");
    }

    #[tokio::test]
    async fn test_refresh_without_cookie_is_unauthorized() {
        let app = TestApp::new(FakeCompletion::default());
        let response = app.send(request("GET", "/api/auth/refresh", None)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "No refresh token");
    }

    #[tokio::test]
    async fn test_refresh_rotates_cookies() {
        let app = TestApp::new(FakeCompletion::default());
        app.access_token("dee").await;
        let login = app
            .send(json_request(
                "POST",
                "/api/auth/login",
                None,
                &format!(r#"{{"username": "dee", "password": "{PASSWORD}"}}"#),
            ))
            .await;
        let refresh_token = cookie_value(&login, REFRESH_COOKIE).unwrap();

        let response = app
            .send(
                Request::builder()
                    .uri("/api/auth/refresh")
                    .header(header::COOKIE, format!("{REFRESH_COOKIE}={refresh_token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response, "accessToken").is_some());
        let rotated = set_cookie(&response, REFRESH_COOKIE).unwrap();
        assert!(!rotated.contains("Max-Age"));
        assert_eq!(body_json(response).await["data"]["user"]["username"], "dee");
    }

    #[tokio::test]
    async fn test_verify_and_user_lookup() {
        let app = TestApp::new(FakeCompletion::default());
        let token = app.access_token("eli").await;

        let response = app.send(request("GET", "/api/auth/verify", Some(&token))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["user"]["username"], "eli");

        let response = app.send(request("GET", "/api/auth/users/eli", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .send(request("GET", "/api/auth/users/eli", Some(&token)))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["username"], "eli");
        assert!(json["data"].get("hashedPassword").is_none());

        let response = app
            .send(request("GET", "/api/auth/users/nobody", Some(&token)))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_oauth_unknown_and_unconfigured_providers() {
        let app = TestApp::new(FakeCompletion::default());

        let response = app.send(request("GET", "/api/auth/login/myspace", None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.send(request("GET", "/api/auth/login/google", None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["error"],
            "google login is not configured"
        );
    }

    #[tokio::test]
    async fn test_oauth_start_sets_state_and_redirects() {
        let app = github_app();
        let response = app.send(request("GET", "/api/auth/login/github", None)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let state = cookie_value(&response, OAUTH_STATE_COOKIE).unwrap();
        assert!(!state.is_empty());
        let cookie = set_cookie(&response, OAUTH_STATE_COOKIE).unwrap();
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=600"));

        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with(&format!("https://github.test/authorize?state={state}")));
        assert!(location.ends_with("/api/auth/login/github/callback"));
    }

    #[tokio::test]
    async fn test_oauth_callback_rejects_bad_state() {
        let app = github_app();

        let response = app.send(callback("code=good-code&state=abc", Some("xyz"))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid OAuth state");

        let response = app.send(callback("code=good-code&state=abc", None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid OAuth state");
    }

    #[tokio::test]
    async fn test_oauth_callback_error_or_missing_code() {
        let app = github_app();

        let response = app
            .send(callback("error=access_denied&state=abc", Some("abc")))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.send(callback("state=abc", Some("abc"))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Missing authorization code"
        );
    }

    #[tokio::test]
    async fn test_oauth_callback_provider_failure_is_bad_gateway() {
        let app = github_app();
        let response = app.send(callback("code=expired&state=abc", Some("abc"))).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"], "Couldn't complete OAuth");
    }

    #[tokio::test]
    async fn test_oauth_callback_logs_in_and_redirects() {
        let app = github_app();
        let response = app.send(callback("code=good-code&state=abc", Some("abc"))).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            app.state.config.front_end.as_str()
        );
        assert!(set_cookie(&response, "accessToken").is_some());
        assert!(set_cookie(&response, REFRESH_COOKIE).is_some());
        assert!(set_cookie(&response, OAUTH_STATE_COOKIE)
            .unwrap()
            .contains("Max-Age=0"));

        let users = app.users.users.lock().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "octo@example.com");
        assert_eq!(users[0].github_id.as_deref(), Some("42"));
    }
}
