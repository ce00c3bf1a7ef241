//! OAuth identity providers
//!
//! Each client builds its authorize URL and turns an authorization code
//! into an [`OAuthProfile`]. [`OAuthRegistry`] holds the configured ones.

mod facebook;
mod github;
mod google;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};

use banter::{DomainError, OAuthIdentityProvider, OAuthProvider};

use crate::config::OAuthClientConfig;

pub use facebook::FacebookOAuth;
pub use github::GithubOAuth;
pub use google::GoogleOAuth;

/// Configured providers, keyed by [`OAuthProvider`]
#[derive(Clone, Default)]
pub struct OAuthRegistry {
    providers: HashMap<OAuthProvider, Arc<dyn OAuthIdentityProvider>>,
}

impl OAuthRegistry {
    pub fn from_config(clients: &[OAuthClientConfig]) -> anyhow::Result<Self> {
        let http = http_client()?;
        let mut registry = Self::default();
        for client in clients {
            let provider: Arc<dyn OAuthIdentityProvider> = match client.provider {
                OAuthProvider::Google => Arc::new(GoogleOAuth::new(http.clone(), client)),
                OAuthProvider::Facebook => Arc::new(FacebookOAuth::new(http.clone(), client)),
                OAuthProvider::Github => Arc::new(GithubOAuth::new(http.clone(), client)),
            };
            registry.register(provider);
        }
        Ok(registry)
    }

    pub fn register(&mut self, provider: Arc<dyn OAuthIdentityProvider>) {
        self.providers.insert(provider.provider(), provider);
    }

    pub fn get(&self, provider: OAuthProvider) -> Option<Arc<dyn OAuthIdentityProvider>> {
        self.providers.get(&provider).cloned()
    }

    pub fn enabled(&self) -> Vec<OAuthProvider> {
        OAuthProvider::ALL
            .into_iter()
            .filter(|p| self.providers.contains_key(p))
            .collect()
    }
}

fn http_client() -> anyhow::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(15))
        // GitHub rejects requests without a User-Agent
        .user_agent(concat!("banter-server/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build OAuth HTTP client")
}

/// `?a=b&c=d` query string
fn query_string(pairs: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl TokenResponse {
    fn into_access_token(self, provider: OAuthProvider) -> Result<String, DomainError> {
        match self.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(DomainError::ExternalService(format!(
                "{provider} token exchange failed: {} {}",
                self.error.unwrap_or_default(),
                self.error_description.unwrap_or_default()
            ))),
        }
    }
}

async fn read_json<T: DeserializeOwned>(
    provider: OAuthProvider,
    response: Result<Response, reqwest::Error>,
) -> Result<T, DomainError> {
    let response = response
        .map_err(|e| DomainError::ExternalService(format!("{provider} request failed: {e}")))?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DomainError::ExternalService(format!(
            "{provider} returned HTTP {status}: {body}"
        )));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| DomainError::ExternalService(format!("{provider} sent an unexpected body: {e}")))
}
