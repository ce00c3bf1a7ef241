//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - User: Account with password and/or OAuth identities
//! - Conversation: Titled chat history
//! - Message: Single turn in a conversation
//! - Prompt: Reusable prompt templates

mod conversation;
mod message;
mod prompt;
mod user;

pub use conversation::*;
pub use message::*;
pub use prompt::*;
pub use user::*;
