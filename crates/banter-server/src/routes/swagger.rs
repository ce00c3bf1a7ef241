//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    // Chat models
    ContextMessage,
    ConversationResponse,
    CreateConversationRequest,
    // Prompt models
    CreatePromptRequest,
    // OpenRouter models
    CreditsResponse,
    DeletedMessageResponse,
    // Auth models
    LoginRequest,
    MessageOnlyResponse,
    MessageResponse,
    ModelResponse,
    PricingResponse,
    PromptFields,
    PromptResponse,
    PromptUpdate,
    RegisterRequest,
    RegisterResponse,
    RegisteredUser,
    RenameConversationRequest,
    SendMessageRequest,
    SendMessageResponse,
    SessionResponse,
    UpdatePromptRequest,
    UserResponse,
};

use super::health::HealthCheck;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::health::health_check,
        // Auth endpoints
        super::auth::register,
        super::auth::login,
        super::auth::logout,
        super::auth::verify,
        super::auth::refresh,
        super::auth::get_user,
        super::auth::oauth_start,
        super::auth::oauth_callback,
        // Chat endpoints
        super::chat::list_conversations,
        super::chat::get_conversation,
        super::chat::create_conversation,
        super::chat::rename_conversation,
        super::chat::delete_conversation,
        super::chat::send_message,
        super::chat::delete_message,
        // Prompt endpoints
        super::prompt::list_prompts,
        super::prompt::create_prompt,
        super::prompt::update_prompt,
        super::prompt::delete_prompt,
        // OpenRouter endpoints
        super::openrouter::get_credits,
        super::openrouter::search_models,
    ),
    info(
        title = "Banter API",
        version = "0.1.0",
        description = "Chat backend: accounts, conversations, prompts and OpenRouter completions.\n\nSuccessful responses are wrapped as `{ \"success\": true, \"data\": ... }`; errors as `{ \"success\": false, \"error\": \"...\" }`. Authenticated routes read the `accessToken` cookie or an `Authorization: Bearer` header.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Registration, login, token rotation and OAuth"),
        (name = "Chat", description = "Conversations and chat turns"),
        (name = "Prompt", description = "Reusable prompt templates"),
        (name = "OpenRouter", description = "Model catalog and account credits"),
    ),
    components(
        schemas(
            HealthCheck,
            // Auth
            RegisterRequest,
            RegisterResponse,
            RegisteredUser,
            LoginRequest,
            UserResponse,
            SessionResponse,
            MessageOnlyResponse,
            // Chat
            ConversationResponse,
            MessageResponse,
            CreateConversationRequest,
            RenameConversationRequest,
            ContextMessage,
            SendMessageRequest,
            SendMessageResponse,
            DeletedMessageResponse,
            // Prompt
            PromptFields,
            PromptUpdate,
            CreatePromptRequest,
            UpdatePromptRequest,
            PromptResponse,
            // OpenRouter
            PricingResponse,
            ModelResponse,
            CreditsResponse,
        )
    ),
)]
pub struct ApiDoc;
