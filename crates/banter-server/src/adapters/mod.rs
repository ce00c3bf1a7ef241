//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod oauth;
pub mod openrouter;
pub mod postgres;

// Re-exports
pub use oauth::OAuthRegistry;
pub use openrouter::OpenRouterClient;
pub use postgres::{PgConversationRepository, PgPromptRepository, PgUserRepository};
