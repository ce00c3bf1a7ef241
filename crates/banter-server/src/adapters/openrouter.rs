//! OpenRouter completion provider
//!
//! Talks to the OpenAI-compatible endpoints `/chat/completions`,
//! `/models` and `/credits`.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use banter::{
    ChatMessage, CompletionOptions, CompletionProvider, CompletionResponse, Credits, DomainError,
    ModelInfo, ModelPricing, TokenUsage,
};

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// HTTP implementation of CompletionProvider
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, base_url: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("banter-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build OpenRouter HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, DomainError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "OpenRouter {what} returned HTTP {status}: {body}"
            )));
        }
        response.json::<T>().await.map_err(|e| {
            DomainError::ExternalService(format!("Failed to decode OpenRouter {what}: {e}"))
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T, DomainError> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("OpenRouter {what} request failed: {e}")))?;
        Self::read_json(response, what).await
    }
}

// ----------------------------------------------------------------------------
// Wire types
// ----------------------------------------------------------------------------

#[derive(Serialize)]
struct WireChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct WireChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Deserialize)]
struct WireModelList {
    data: Vec<WireModel>,
}

#[derive(Deserialize)]
struct WireModel {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    pricing: WirePricing,
    #[serde(default)]
    context_length: Option<u64>,
    #[serde(default)]
    architecture: Option<serde_json::Value>,
}

#[derive(Deserialize, Default)]
struct WirePricing {
    #[serde(default, deserialize_with = "lenient_price")]
    prompt: f64,
    #[serde(default, deserialize_with = "lenient_price")]
    completion: f64,
}

#[derive(Deserialize)]
struct WireCredits {
    data: Credits,
}

/// Prices arrive as decimal strings ("0.000002"); unparseable means free
fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    })
}

impl From<WireModel> for ModelInfo {
    fn from(m: WireModel) -> Self {
        Self {
            name: m.name.unwrap_or_else(|| m.id.clone()),
            id: m.id,
            description: m.description,
            pricing: ModelPricing {
                prompt: m.pricing.prompt,
                completion: m.pricing.completion,
            },
            context_length: m.context_length,
            architecture: m.architecture,
        }
    }
}

impl WireChatResponse {
    fn into_completion(self, requested_model: &str) -> Result<CompletionResponse, DomainError> {
        let choice = self.choices.into_iter().next().ok_or_else(|| {
            DomainError::ExternalService("OpenRouter returned no choices".to_string())
        })?;
        let usage = self.usage.unwrap_or_default();

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            model: self.model.unwrap_or_else(|| requested_model.to_string()),
            usage: TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            },
            finish_reason: choice.finish_reason,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        let request = WireChatRequest {
            model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        tracing::debug!(model, messages = messages.len(), "Requesting completion");

        let response = self
            .client
            .post(self.url("/chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("OpenRouter completion request failed: {e}")))?;

        let body: WireChatResponse = Self::read_json(response, "completion").await?;
        body.into_completion(model)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, DomainError> {
        let list: WireModelList = self.get_json("/models", "model list").await?;
        Ok(list.data.into_iter().map(Into::into).collect())
    }

    async fn credits(&self) -> Result<Credits, DomainError> {
        let credits: WireCredits = self.get_json("/credits", "credits").await?;
        Ok(credits.data)
    }

    fn provider_name(&self) -> &str {
        "openrouter"
    }
}
