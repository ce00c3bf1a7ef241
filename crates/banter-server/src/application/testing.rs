//! In-memory port implementations for application service tests

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use banter::domain::services::TITLE_INSTRUCTION;
use banter::{
    ChatMessage, CompletionOptions, CompletionProvider, CompletionResponse, Conversation,
    ConversationRepository, Credits, DomainError, Message, ModelInfo, OAuthProvider, Prompt,
    PromptRepository, TokenUsage, User, UserRepository,
};

#[derive(Default)]
pub struct InMemoryUsers {
    pub users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_provider_id(
        &self,
        provider: OAuthProvider,
        provider_user_id: &str,
    ) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.provider_id(provider) == Some(provider_user_id))
            .cloned())
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(DomainError::Conflict("User already exists. Please login.".into()));
        }
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        Ok(user.clone())
    }
}

#[derive(Default)]
pub struct InMemoryConversations {
    pub conversations: Mutex<Vec<Conversation>>,
}

#[async_trait]
impl ConversationRepository for InMemoryConversations {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Conversation>, DomainError> {
        Ok(self
            .conversations
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Conversation>, DomainError> {
        let mut found: Vec<Conversation> = self
            .conversations
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(found)
    }

    async fn create_with_message(
        &self,
        conversation: &Conversation,
        first_message: &Message,
    ) -> Result<Conversation, DomainError> {
        let mut created = conversation.clone();
        created.messages = vec![first_message.clone()];
        self.conversations.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_title(
        &self,
        user_id: Uuid,
        id: Uuid,
        title: &str,
    ) -> Result<Option<Conversation>, DomainError> {
        let mut conversations = self.conversations.lock().unwrap();
        Ok(conversations
            .iter_mut()
            .find(|c| c.id == id && c.user_id == user_id)
            .map(|conversation| {
                conversation.title = title.to_string();
                conversation.updated_at = chrono::Utc::now();
                conversation.clone()
            }))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let mut conversations = self.conversations.lock().unwrap();
        let before = conversations.len();
        conversations.retain(|c| !(c.id == id && c.user_id == user_id));
        Ok(conversations.len() < before)
    }

    async fn add_message(&self, message: &Message) -> Result<Message, DomainError> {
        let mut conversations = self.conversations.lock().unwrap();
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == message.conversation_id)
            .ok_or_else(|| DomainError::Repository("foreign key violation".into()))?;
        conversation.messages.push(message.clone());
        conversation.updated_at = message.created_at;
        Ok(message.clone())
    }

    async fn delete_message(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Message>, DomainError> {
        let mut conversations = self.conversations.lock().unwrap();
        for conversation in conversations.iter_mut() {
            if let Some(pos) = conversation
                .messages
                .iter()
                .position(|m| m.id == id && m.user_id == user_id)
            {
                return Ok(Some(conversation.messages.remove(pos)));
            }
        }
        Ok(None)
    }
}

#[derive(Default)]
pub struct InMemoryPrompts {
    pub prompts: Mutex<Vec<Prompt>>,
}

#[async_trait]
impl PromptRepository for InMemoryPrompts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Prompt>, DomainError> {
        Ok(self.prompts.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Prompt>, DomainError> {
        let mut found: Vec<Prompt> = self
            .prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn save(&self, prompt: &Prompt) -> Result<Prompt, DomainError> {
        let mut prompts = self.prompts.lock().unwrap();
        match prompts.iter_mut().find(|p| p.id == prompt.id) {
            Some(existing) => *existing = prompt.clone(),
            None => prompts.push(prompt.clone()),
        }
        Ok(prompt.clone())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let mut prompts = self.prompts.lock().unwrap();
        let before = prompts.len();
        prompts.retain(|p| !(p.id == id && p.user_id == user_id));
        Ok(prompts.len() < before)
    }
}

/// Scripted completion provider
///
/// Title requests (system message equal to the title instruction) get
/// `title`; everything else gets `reply`. `None` simulates an outage.
#[derive(Default)]
pub struct FakeCompletion {
    pub title: Option<String>,
    pub reply: Option<String>,
    pub models: Vec<ModelInfo>,
    pub credits: Option<Credits>,
    pub calls: Mutex<Vec<(String, Vec<ChatMessage>, CompletionOptions)>>,
}

impl FakeCompletion {
    pub fn replying(title: &str, reply: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            reply: Some(reply.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<ChatMessage>, CompletionOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec(), options.clone()));

        let is_title = messages
            .first()
            .is_some_and(|m| m.content == TITLE_INSTRUCTION);
        let content = if is_title { &self.title } else { &self.reply };

        content
            .clone()
            .map(|content| CompletionResponse {
                content,
                model: model.to_string(),
                usage: TokenUsage::default(),
                finish_reason: Some("stop".into()),
            })
            .ok_or_else(|| DomainError::ExternalService("HTTP 503: upstream down".into()))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, DomainError> {
        if self.models.is_empty() {
            return Err(DomainError::ExternalService("HTTP 500".into()));
        }
        Ok(self.models.clone())
    }

    async fn credits(&self) -> Result<Credits, DomainError> {
        self.credits
            .ok_or_else(|| DomainError::ExternalService("HTTP 401: bad key".into()))
    }

    fn provider_name(&self) -> &str {
        "fake"
    }
}
