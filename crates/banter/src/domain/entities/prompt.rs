//! Prompt - Reusable prompt templates
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// Upper bound accepted for sampling temperature
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Prompt - A reusable prompt template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
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

/// Editable fields of a prompt, used for both create and full replace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptDraft {
    pub name: String,
    pub content: String,
    pub description: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
    pub is_system: bool,
}

impl PromptDraft {
    /// Check field constraints and trim text fields
    pub fn validate(mut self) -> Result<Self, DomainError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(DomainError::Validation("Prompt name is required".into()));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::Validation("Prompt content is required".into()));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=MAX_TEMPERATURE).contains(&t) {
                return Err(DomainError::Validation(format!(
                    "Temperature must be between 0 and {}",
                    MAX_TEMPERATURE
                )));
            }
        }
        if matches!(self.max_tokens, Some(n) if n <= 0) {
            return Err(DomainError::Validation(
                "maxTokens must be a positive number".into(),
            ));
        }
        self.description = self.description.filter(|d| !d.trim().is_empty());
        self.model = self.model.filter(|m| !m.trim().is_empty());
        Ok(self)
    }
}

impl Prompt {
    /// Create a new prompt from a validated draft
    pub fn new(user_id: Uuid, draft: PromptDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: draft.name,
            content: draft.content,
            description: draft.description,
            model: draft.model,
            temperature: draft.temperature,
            max_tokens: draft.max_tokens,
            is_system: draft.is_system,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every editable field, keeping identity and ownership
    pub fn replace_with(self, draft: PromptDraft) -> Self {
        Self {
            name: draft.name,
            content: draft.content,
            description: draft.description,
            model: draft.model,
            temperature: draft.temperature,
            max_tokens: draft.max_tokens,
            is_system: draft.is_system,
            updated_at: Utc::now(),
            ..self
        }
    }
}
