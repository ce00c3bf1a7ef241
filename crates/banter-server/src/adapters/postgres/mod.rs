//! PostgreSQL Repository Implementations

mod conversation_repository;
mod prompt_repository;
mod user_repository;

pub use conversation_repository::PgConversationRepository;
pub use prompt_repository::PgPromptRepository;
pub use user_repository::PgUserRepository;
