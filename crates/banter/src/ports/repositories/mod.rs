//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod conversation_repository;
mod prompt_repository;
mod user_repository;

pub use conversation_repository::*;
pub use prompt_repository::*;
pub use user_repository::*;
