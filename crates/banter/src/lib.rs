//! Banter Domain Library
//!
//! Core domain types and interfaces for the Banter chat backend.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (User, Conversation, Message, Prompt)
//!   - `value_objects/`: Immutable value types (MessageRole, OAuthProvider, ModelInfo)
//!   - `services/`: Title cleanup, code block rendering, model search
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!   - `services/`: External service interfaces
//!
//! # Usage
//!
//! ```rust,ignore
//! use banter::domain::{Conversation, Message, Prompt};
//! use banter::ports::{ConversationRepository, CompletionProvider};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    fallback_title, normalize_title, render_code_blocks, Conversation, Credits, DomainError,
    Message, MessageRole, ModelInfo, ModelPricing, ModelSearch, OAuthProfile, OAuthProvider,
    Prompt, PromptDraft, User,
};
pub use ports::{
    ChatMessage,
    CompletionOptions,
    // Services
    CompletionProvider,
    CompletionResponse,
    // Repositories
    ConversationRepository,
    OAuthIdentityProvider,
    PromptRepository,
    TokenUsage,
    UserRepository,
};
