//! Service Ports
//!
//! Abstract interfaces for external services.

mod completion_provider;
mod oauth_identity;

pub use completion_provider::*;
pub use oauth_identity::*;
