//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod message_role;
mod model_info;
mod oauth_provider;

pub use message_role::*;
pub use model_info::*;
pub use oauth_provider::*;
