//! Ports (Interfaces)
//!
//! Traits the application layer is written against:
//! - `repositories/`: users, conversations (with messages), prompts
//! - `services/`: completion API and OAuth identity providers
//!
//! Postgres and HTTP implementations live in `banter-server`.

pub mod repositories;
pub mod services;

pub use repositories::*;
pub use services::*;
