//! Completion Provider Port
//!
//! Abstract interface for the hosted model-inference API. The model is
//! chosen per request, so one provider serves every model in its catalog.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::{Credits, MessageRole, ModelInfo};

/// A message sent to the completion API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling options; `None` leaves the provider default in place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature (0.0 - 2.0)
    pub temperature: Option<f32>,
}

/// Response from a completion call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text content
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Token usage statistics
    pub usage: TokenUsage,
    /// Finish reason
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Hosted completion API (OpenRouter or any OpenAI-compatible endpoint)
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a completion for `messages` with the given model
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError>;

    /// Generate a completion and return only its text
    async fn complete_text(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, DomainError> {
        let response = self
            .complete(model, messages, &CompletionOptions::default())
            .await?;
        Ok(response.content)
    }

    /// Models offered by the provider
    async fn list_models(&self) -> Result<Vec<ModelInfo>, DomainError>;

    /// Current account balance
    async fn credits(&self) -> Result<Credits, DomainError>;

    /// Provider name for logging (e.g. "openrouter")
    fn provider_name(&self) -> &str;
}
