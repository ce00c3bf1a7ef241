//! User Repository Port
//!
//! Abstract interface for user persistence operations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, OAuthProvider, User};

/// Repository interface for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by unique username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by provider-scoped OAuth id
    async fn find_by_provider_id(
        &self,
        provider: OAuthProvider,
        provider_user_id: &str,
    ) -> Result<Option<User>, DomainError>;

    /// Save a user (insert or update)
    async fn save(&self, user: &User) -> Result<User, DomainError>;
}
