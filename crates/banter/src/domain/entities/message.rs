//! Message Entity
//!
//! A single turn inside a conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::MessageRole;

/// A stored chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message
    pub fn new(
        conversation_id: Uuid,
        user_id: Uuid,
        role: MessageRole,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            user_id,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(conversation_id: Uuid, user_id: Uuid, content: impl Into<String>) -> Self {
        Self::new(conversation_id, user_id, MessageRole::User, content)
    }

    pub fn assistant(conversation_id: Uuid, user_id: Uuid, content: impl Into<String>) -> Self {
        Self::new(conversation_id, user_id, MessageRole::Assistant, content)
    }
}
