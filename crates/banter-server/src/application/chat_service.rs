//! Chat Application Service (Use Case)
//!
//! Conversation lifecycle and chat turns:
//! create conversation → generate title → append messages → call the
//! completion API → post-process and persist the reply.

use std::sync::Arc;

use uuid::Uuid;

use banter::domain::services::TITLE_INSTRUCTION;
use banter::{
    fallback_title, normalize_title, render_code_blocks, ChatMessage, CompletionOptions,
    CompletionProvider, Conversation, ConversationRepository, DomainError, Message, MessageRole,
};

/// A chat turn: the client sends the whole context it wants completed
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub conversation_id: Uuid,
    pub model: String,
    pub context: Vec<ChatMessage>,
    pub options: CompletionOptions,
}

pub struct ChatService<C: ConversationRepository, L: CompletionProvider> {
    conversations: Arc<C>,
    llm: Arc<L>,
    title_model: Option<String>,
}

impl<C: ConversationRepository, L: CompletionProvider> ChatService<C, L> {
    pub fn new(conversations: Arc<C>, llm: Arc<L>, title_model: Option<String>) -> Self {
        Self {
            conversations,
            llm,
            title_model,
        }
    }

    /// Caller's conversations, most recently active first
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Conversation>, DomainError> {
        let mut conversations = self.conversations.find_by_user(user_id).await?;
        conversations.iter_mut().for_each(Conversation::sort_messages);
        Ok(conversations)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Conversation, DomainError> {
        let mut conversation = self.owned(user_id, id).await?;
        conversation.sort_messages();
        Ok(conversation)
    }

    /// Start a conversation from its first user message
    pub async fn create(
        &self,
        user_id: Uuid,
        content: &str,
        model: &str,
    ) -> Result<Conversation, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::Validation("Message content is required".into()));
        }
        if model.trim().is_empty() {
            return Err(DomainError::Validation("Model is required".into()));
        }

        let title = self.generate_title(content, model).await;
        let conversation = Conversation::new(user_id, title);
        let first = Message::user(conversation.id, user_id, content);

        let created = self
            .conversations
            .create_with_message(&conversation, &first)
            .await?;

        tracing::info!("Created conversation: {} ({})", created.title, created.id);
        Ok(created)
    }

    pub async fn rename(
        &self,
        user_id: Uuid,
        id: Uuid,
        title: &str,
    ) -> Result<Conversation, DomainError> {
        let title = normalize_title(title)
            .ok_or_else(|| DomainError::Validation("Title is required".into()))?;

        let mut renamed = self
            .conversations
            .update_title(user_id, id, &title)
            .await?
            .ok_or_else(|| DomainError::not_found("Conversation", id))?;
        renamed.sort_messages();
        Ok(renamed)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Uuid, DomainError> {
        if !self.conversations.delete(user_id, id).await? {
            return Err(DomainError::not_found("Conversation", id));
        }
        tracing::info!("Deleted conversation: {}", id);
        Ok(id)
    }

    /// Run one chat turn and return the stored assistant reply
    ///
    /// The user message is persisted before the completion call, so it
    /// survives a provider failure.
    pub async fn send_message(&self, user_id: Uuid, turn: ChatTurn) -> Result<Message, DomainError> {
        let last = match turn.context.last() {
            Some(last) if last.role == MessageRole::User && !last.content.trim().is_empty() => {
                last.clone()
            }
            Some(_) => {
                return Err(DomainError::Validation(
                    "The last context message must be a non-empty user message".into(),
                ))
            }
            None => return Err(DomainError::Validation("Context is required".into())),
        };
        if turn.model.trim().is_empty() {
            return Err(DomainError::Validation("Model is required".into()));
        }

        let conversation = self.owned(user_id, turn.conversation_id).await?;

        self.conversations
            .add_message(&Message::user(conversation.id, user_id, last.content))
            .await?;

        let completion = self
            .llm
            .complete(&turn.model, &turn.context, &turn.options)
            .await?;

        tracing::debug!(
            model = %completion.model,
            tokens = completion.usage.total_tokens,
            finish_reason = ?completion.finish_reason,
            "Completion received"
        );

        let reply = Message::assistant(
            conversation.id,
            user_id,
            render_code_blocks(&completion.content),
        );
        self.conversations.add_message(&reply).await
    }

    pub async fn delete_message(&self, user_id: Uuid, id: Uuid) -> Result<Message, DomainError> {
        let message = self
            .conversations
            .delete_message(user_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Message", id))?;

        tracing::info!("Deleted message {} from conversation {}", id, message.conversation_id);
        Ok(message)
    }

    /// Ask the model for a title; any failure falls back to the content
    async fn generate_title(&self, content: &str, model: &str) -> String {
        let model = self.title_model.as_deref().unwrap_or(model);
        let messages = [ChatMessage::system(TITLE_INSTRUCTION), ChatMessage::user(content)];

        match self.llm.complete_text(model, &messages).await {
            Ok(raw) => normalize_title(&raw).unwrap_or_else(|| {
                tracing::warn!("Title model returned an empty title, using fallback");
                fallback_title(content)
            }),
            Err(e) => {
                tracing::warn!("Title generation failed, using fallback: {}", e);
                fallback_title(content)
            }
        }
    }

    /// A conversation owned by someone else is reported as missing
    async fn owned(&self, user_id: Uuid, id: Uuid) -> Result<Conversation, DomainError> {
        self.conversations
            .find_by_id(id)
            .await?
            .filter(|c| c.is_owned_by(user_id))
            .ok_or_else(|| DomainError::not_found("Conversation", id))
    }
}
