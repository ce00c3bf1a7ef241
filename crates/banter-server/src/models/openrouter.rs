//! Model catalog and credits DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use banter::{Credits, ModelInfo, ModelSearch};

use crate::error::ApiError;

/// Model search filters; blank values are ignored
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ModelSearchQuery {
    /// Case-insensitive substring of the model name
    pub name: Option<String>,
    /// Maximum completion price per token (USD)
    pub max_price: Option<String>,
    pub min_context_length: Option<String>,
}

impl ModelSearchQuery {
    pub fn into_search(self) -> Result<ModelSearch, ApiError> {
        Ok(ModelSearch {
            name: self.name.filter(|n| !n.trim().is_empty()),
            max_price: parse_filter(self.max_price, "maxPrice")?,
            min_context_length: parse_filter(self.min_context_length, "minContextLength")?,
        })
    }
}

fn parse_filter<T: std::str::FromStr>(raw: Option<String>, field: &str) -> Result<Option<T>, ApiError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid {field}: {value}"))),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PricingResponse {
    pub prompt: f64,
    pub completion: f64,
}

/// A model offered by OpenRouter
#[derive(Debug, Serialize, ToSchema)]
pub struct ModelResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub pricing: PricingResponse,
    pub context_length: Option<u64>,
    pub architecture: Option<serde_json::Value>,
}

impl From<ModelInfo> for ModelResponse {
    fn from(m: ModelInfo) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            pricing: PricingResponse {
                prompt: m.pricing.prompt,
                completion: m.pricing.completion,
            },
            context_length: m.context_length,
            architecture: m.architecture,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreditsResponse {
    pub total_credits: f64,
    pub total_usage: f64,
}

impl From<Credits> for CreditsResponse {
    fn from(c: Credits) -> Self {
        Self {
            total_credits: c.total_credits,
            total_usage: c.total_usage,
        }
    }
}
