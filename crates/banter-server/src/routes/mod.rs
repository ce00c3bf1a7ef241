//! Banter API Routes
//!
//! - /health - Health check
//! - /api/auth - Registration, login, token rotation, OAuth
//! - /api/chat/conversation(s), /api/chat/message - Conversations and chat turns
//! - /api/chat/prompt(s) - Prompt templates
//! - /api/openrouter - Model catalog and credits

pub mod auth;
pub mod chat;
pub mod health;
pub mod openrouter;
pub mod prompt;
pub mod swagger;

#[cfg(test)]
pub(crate) mod testing;
