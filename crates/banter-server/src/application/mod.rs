//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod auth_service;
mod catalog_service;
mod chat_service;
mod prompt_service;

#[cfg(test)]
pub(crate) mod testing;

pub use auth_service::AuthService;
pub use catalog_service::CatalogService;
pub use chat_service::{ChatService, ChatTurn};
pub use prompt_service::PromptService;
