//! OAuth Identity Port
//!
//! One implementation per federated login provider. The server drives the
//! authorization-code flow; implementations only know how to build the
//! consent URL and how to turn a callback code into a profile.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, OAuthProfile, OAuthProvider};

#[async_trait]
pub trait OAuthIdentityProvider: Send + Sync {
    /// Which provider this is
    fn provider(&self) -> OAuthProvider;

    /// URL the browser is sent to for consent
    fn authorize_url(&self, state: &str, redirect_uri: &str) -> String;

    /// Exchange the callback `code` and load the user's profile
    async fn fetch_profile(&self, code: &str, redirect_uri: &str)
        -> Result<OAuthProfile, DomainError>;
}
