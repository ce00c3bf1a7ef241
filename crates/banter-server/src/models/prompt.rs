//! Prompt DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use banter::{Prompt, PromptDraft};

/// Editable prompt fields
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptFields {
    pub name: String,
    pub content: String,
    pub description: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
    #[serde(default)]
    pub is_system: bool,
}

impl From<PromptFields> for PromptDraft {
    fn from(f: PromptFields) -> Self {
        Self {
            name: f.name,
            content: f.content,
            description: f.description,
            model: f.model,
            temperature: f.temperature,
            max_tokens: f.max_tokens,
            is_system: f.is_system,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePromptRequest {
    pub prompt: PromptFields,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PromptUpdate {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: PromptFields,
}

/// Full-record replace
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePromptRequest {
    pub prompt: PromptUpdate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub content: String,
    pub description: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
    pub is_system: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Prompt> for PromptResponse {
    fn from(p: Prompt) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            name: p.name,
            content: p.content,
            description: p.description,
            model: p.model,
            temperature: p.temperature,
            max_tokens: p.max_tokens,
            is_system: p.is_system,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
