//! Conversation and message DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use banter::{ChatMessage, CompletionOptions, Conversation, Message, MessageRole};

use crate::application::ChatTurn;
use crate::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Uuid,
    pub conversation_id: Uuid,
    /// `user`, `assistant`, `system` or `tool`
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            conversation_id: m.conversation_id,
            role: m.role.to_string(),
            content: m.content,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    /// Oldest first
    pub messages: Vec<MessageResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Conversation> for ConversationResponse {
    fn from(c: Conversation) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            title: c.title,
            messages: c.messages.into_iter().map(Into::into).collect(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Start a conversation
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateConversationRequest {
    /// First user message
    pub content: String,
    pub model: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameConversationRequest {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ContextMessage {
    pub role: String,
    pub content: String,
}

/// One chat turn
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub conversation_id: Uuid,
    pub model: String,
    /// Messages sent to the model; the last one must be the user's
    pub context: Vec<ContextMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl SendMessageRequest {
    pub fn into_turn(self) -> Result<ChatTurn, ApiError> {
        let context = self
            .context
            .into_iter()
            .map(|m| {
                let role = m
                    .role
                    .parse::<MessageRole>()
                    .map_err(ApiError::BadRequest)?;
                Ok(ChatMessage {
                    role,
                    content: m.content,
                })
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        Ok(ChatTurn {
            conversation_id: self.conversation_id,
            model: self.model,
            context,
            options: CompletionOptions {
                max_tokens: self.max_tokens,
                temperature: self.temperature,
            },
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendMessageResponse {
    /// The stored assistant reply
    pub message: MessageResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedMessageResponse {
    pub id: Uuid,
    pub conversation_id: Uuid,
}
