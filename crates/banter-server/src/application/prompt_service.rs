//! Prompt Application Service (Use Case)

use std::sync::Arc;

use uuid::Uuid;

use banter::{DomainError, Prompt, PromptDraft, PromptRepository};

pub struct PromptService<R: PromptRepository> {
    repo: Arc<R>,
}

impl<R: PromptRepository> PromptService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Caller's prompts ordered by name
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Prompt>, DomainError> {
        self.repo.find_by_user(user_id).await
    }

    pub async fn create(&self, user_id: Uuid, draft: PromptDraft) -> Result<Prompt, DomainError> {
        let prompt = Prompt::new(user_id, draft.validate()?);
        let saved = self.repo.save(&prompt).await?;
        tracing::info!("Created prompt: {} ({})", saved.name, saved.id);
        Ok(saved)
    }

    /// Full-record replace
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        draft: PromptDraft,
    ) -> Result<Prompt, DomainError> {
        let draft = draft.validate()?;
        let current = self.owned(user_id, id).await?;
        self.repo.save(&current.replace_with(draft)).await
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Uuid, DomainError> {
        if !self.repo.delete(user_id, id).await? {
            return Err(DomainError::not_found("Prompt", id));
        }
        tracing::info!("Deleted prompt: {}", id);
        Ok(id)
    }

    async fn owned(&self, user_id: Uuid, id: Uuid) -> Result<Prompt, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(|p| p.user_id == user_id)
            .ok_or_else(|| DomainError::not_found("Prompt", id))
    }
}
