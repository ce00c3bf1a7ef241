//! Route test harness: the real route tree over in-memory ports

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use tower::ServiceExt;

use crate::adapters::OAuthRegistry;
use crate::application::testing::{
    FakeCompletion, InMemoryConversations, InMemoryPrompts, InMemoryUsers,
};
use crate::application::{AuthService, CatalogService, ChatService, PromptService};
use crate::auth::{CookiePolicy, Passwords, TokenService};
use crate::config::AppConfig;
use crate::AppState;

pub const PASSWORD: &str = "password!";

pub struct TestApp {
    pub state: AppState,
    pub tokens: Arc<TokenService>,
    pub users: Arc<InMemoryUsers>,
}

impl TestApp {
    pub fn new(llm: FakeCompletion) -> Self {
        Self::with_oauth(llm, OAuthRegistry::default())
    }

    pub fn with_oauth(llm: FakeCompletion, oauth: OAuthRegistry) -> Self {
        let config = AppConfig::from_lookup(|key| match key {
            "ACCESS_TOKEN_SECRET" => Some("access-secret".into()),
            "REFRESH_TOKEN_SECRET" => Some("refresh-secret".into()),
            "OPENROUTER_API_KEY" => Some("sk-or-test".into()),
            _ => None,
        })
        .unwrap();

        let tokens = Arc::new(TokenService::new(
            &config.access_token_secret,
            &config.refresh_token_secret,
        ));
        let users = Arc::new(InMemoryUsers::default());
        let llm = Arc::new(llm);

        let state = AppState {
            auth_service: Arc::new(AuthService::new(
                users.clone(),
                Passwords::fast(),
                tokens.clone(),
            )),
            chat_service: Arc::new(ChatService::new(
                Arc::new(InMemoryConversations::default()),
                llm.clone(),
                None,
            )),
            prompt_service: Arc::new(PromptService::new(Arc::new(InMemoryPrompts::default()))),
            catalog_service: Arc::new(CatalogService::new(llm)),
            cookies: CookiePolicy::from_config(&config),
            oauth,
            config: Arc::new(config),
        };

        Self {
            state,
            tokens,
            users,
        }
    }

    pub fn router(&self) -> Router {
        crate::app(self.state.clone(), self.tokens.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }

    /// Register a password user and return an access token for it
    pub async fn access_token(&self, username: &str) -> String {
        self.state
            .auth_service
            .register(username, PASSWORD, None)
            .await
            .unwrap();
        self.state
            .auth_service
            .login(username, PASSWORD, false)
            .await
            .unwrap()
            .tokens
            .access_token
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Full `Set-Cookie` header for the named cookie
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&prefix))
        .map(str::to_string)
}

/// Value of the named cookie from a `Set-Cookie` header
pub fn cookie_value(response: &Response<Body>, name: &str) -> Option<String> {
    set_cookie(response, name).and_then(|header| {
        header
            .split(';')
            .next()
            .and_then(|pair| pair.split_once('='))
            .map(|(_, value)| value.to_string())
    })
}
