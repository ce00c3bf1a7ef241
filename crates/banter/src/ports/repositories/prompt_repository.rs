//! Prompt Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Prompt};

/// Repository interface for Prompt entities
#[async_trait]
pub trait PromptRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Prompt>, DomainError>;

    /// All prompts of a user, ordered by name
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Prompt>, DomainError>;

    /// Save a prompt (insert or full replace)
    async fn save(&self, prompt: &Prompt) -> Result<Prompt, DomainError>;

    /// Delete a prompt owned by `user_id`
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError>;
}
