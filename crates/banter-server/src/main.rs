#[cfg(not(test))]
use anyhow::Context;
#[cfg(not(test))]
use axum::http::{header, HeaderValue, Method};
use axum::{middleware, Router};
#[cfg(not(test))]
use sqlx::PgPool;
use std::sync::Arc;
#[cfg(not(test))]
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod config;
mod error;
mod models;
mod routes;

use adapters::OAuthRegistry;
#[cfg(not(test))]
use adapters::{OpenRouterClient, PgConversationRepository, PgPromptRepository, PgUserRepository};
use application::{AuthService, CatalogService, ChatService, PromptService};
#[cfg(not(test))]
use auth::Passwords;
use auth::{CookiePolicy, TokenService};
use config::AppConfig;

/// Type aliases for application services with concrete adapter implementations
#[cfg(not(test))]
pub type AppAuthService = AuthService<PgUserRepository>;
#[cfg(not(test))]
pub type AppChatService = ChatService<PgConversationRepository, OpenRouterClient>;
#[cfg(not(test))]
pub type AppPromptService = PromptService<PgPromptRepository>;
#[cfg(not(test))]
pub type AppCatalogService = CatalogService<OpenRouterClient>;

// Route tests drive the real router over the in-memory ports
#[cfg(test)]
use application::testing::{FakeCompletion, InMemoryConversations, InMemoryPrompts, InMemoryUsers};
#[cfg(test)]
pub type AppAuthService = AuthService<InMemoryUsers>;
#[cfg(test)]
pub type AppChatService = ChatService<InMemoryConversations, FakeCompletion>;
#[cfg(test)]
pub type AppPromptService = PromptService<InMemoryPrompts>;
#[cfg(test)]
pub type AppCatalogService = CatalogService<FakeCompletion>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_service: Arc<AppAuthService>,
    pub chat_service: Arc<AppChatService>,
    pub prompt_service: Arc<AppPromptService>,
    pub catalog_service: Arc<AppCatalogService>,
    pub cookies: CookiePolicy,
    pub oauth: OAuthRegistry,
}

#[cfg(not(test))]
fn cors(config: &AppConfig) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(&config.front_end)
        .with_context(|| format!("FRONT_END is not a valid origin: {}", config.front_end))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Full route tree; everything but the public routes sits behind `require_auth`
pub fn app(state: AppState, tokens: Arc<TokenService>) -> Router {
    // Protected routes (require an access token)
    let protected_routes = Router::new()
        .merge(routes::auth::protected_router())
        .merge(routes::chat::router())
        .merge(routes::prompt::router())
        .merge(routes::openrouter::protected_router())
        .layer(middleware::from_fn_with_state(tokens, auth::require_auth));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .merge(routes::health::router())
        .merge(routes::auth::router())
        .merge(routes::openrouter::router())
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(not(test))]
#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("💬 Banter API initializing...");

    let config = Arc::new(AppConfig::from_secrets(&secrets)?);
    if config.production {
        tracing::info!("🔐 Production cookies (Secure, SameSite=Strict)");
    }

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("✅ Database migrations completed");

    // External services
    let openrouter = Arc::new(OpenRouterClient::new(
        config.openrouter_api_key.clone(),
        config.openrouter_base_url.clone(),
    )?);
    tracing::info!("🤖 OpenRouter client ready ({})", config.openrouter_base_url);

    let oauth = OAuthRegistry::from_config(&config.oauth_clients)?;
    for provider in oauth.enabled() {
        tracing::info!("🔑 {} login enabled", provider);
    }

    // Initialize application services
    let tokens = Arc::new(TokenService::new(
        &config.access_token_secret,
        &config.refresh_token_secret,
    ));
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let conversation_repo = Arc::new(PgConversationRepository::new(pool.clone()));
    let prompt_repo = Arc::new(PgPromptRepository::new(pool));

    let state = AppState {
        auth_service: Arc::new(AuthService::new(
            user_repo,
            Passwords::new(),
            tokens.clone(),
        )),
        chat_service: Arc::new(ChatService::new(
            conversation_repo,
            openrouter.clone(),
            config.title_model.clone(),
        )),
        prompt_service: Arc::new(PromptService::new(prompt_repo)),
        catalog_service: Arc::new(CatalogService::new(openrouter)),
        cookies: CookiePolicy::from_config(&config),
        oauth,
        config: config.clone(),
    };

    let router = app(state, tokens).layer(cors(&config)?);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Banter API ready");

    Ok(router.into())
}
