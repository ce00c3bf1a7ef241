//! Conversation Repository Port
//!
//! Persistence for conversations and the messages inside them.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Conversation, Message};

/// Repository interface for Conversation and Message entities
///
/// Conversations are always returned with their messages attached,
/// ordered by creation time.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find a conversation by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Conversation>, DomainError>;

    /// All conversations of a user, most recently active first
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Conversation>, DomainError>;

    /// Insert a conversation together with its first message, atomically
    async fn create_with_message(
        &self,
        conversation: &Conversation,
        first_message: &Message,
    ) -> Result<Conversation, DomainError>;

    /// Replace the title of a conversation owned by `user_id`
    ///
    /// `None` when no such conversation exists for that user.
    async fn update_title(
        &self,
        user_id: Uuid,
        id: Uuid,
        title: &str,
    ) -> Result<Option<Conversation>, DomainError>;

    /// Delete a conversation owned by `user_id` together with its messages
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError>;

    /// Append a message to its conversation
    async fn add_message(&self, message: &Message) -> Result<Message, DomainError>;

    /// Delete a message owned by `user_id`, returning the removed row
    async fn delete_message(&self, user_id: Uuid, id: Uuid)
        -> Result<Option<Message>, DomainError>;
}
