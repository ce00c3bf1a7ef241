//! Server configuration, loaded from Shuttle secrets at startup.

use anyhow::{bail, Context, Result};
use banter::OAuthProvider;
use shuttle_runtime::SecretStore;

const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_FRONT_END: &str = "http://localhost:5173";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:8000";

/// Credentials for one OAuth provider
#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    pub provider: OAuthProvider,
    pub client_id: String,
    pub client_secret: String,
}

/// Runtime configuration for banter-server
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub openrouter_api_key: String,
    pub openrouter_base_url: String,
    /// Browser client origin; CORS origin and post-login redirect target
    pub front_end: String,
    /// Public base URL of this server, used for OAuth callback URLs
    pub public_url: String,
    pub cookie_domain: Option<String>,
    /// Secure + SameSite=Strict cookies
    pub production: bool,
    /// Model used for title generation; the request model when unset
    pub title_model: Option<String>,
    /// Providers with a complete id/secret pair
    pub oauth_clients: Vec<OAuthClientConfig>,
}

impl AppConfig {
    /// Build [`AppConfig`] from the Shuttle secret store
    pub fn from_secrets(secrets: &SecretStore) -> Result<Self> {
        Self::from_lookup(|key| secrets.get(key))
    }

    /// Build [`AppConfig`] from any key lookup; blank values count as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| get(key).with_context(|| format!("Missing required secret {key}"));

        let access_token_secret = require("ACCESS_TOKEN_SECRET")?;
        let refresh_token_secret = require("REFRESH_TOKEN_SECRET")?;
        if access_token_secret == refresh_token_secret {
            bail!("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ");
        }

        let oauth_clients = OAuthProvider::ALL
            .into_iter()
            .filter_map(|provider| {
                let (id_key, secret_key) = oauth_keys(provider);
                match (get(id_key), get(secret_key)) {
                    (Some(client_id), Some(client_secret)) => Some(OAuthClientConfig {
                        provider,
                        client_id,
                        client_secret,
                    }),
                    _ => {
                        tracing::warn!("⚠️  {id_key}/{secret_key} not set - {provider} login disabled");
                        None
                    }
                }
            })
            .collect();

        Ok(Self {
            access_token_secret,
            refresh_token_secret,
            openrouter_api_key: require("OPENROUTER_API_KEY")?,
            openrouter_base_url: get("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
            front_end: get("FRONT_END").unwrap_or_else(|| DEFAULT_FRONT_END.to_string()),
            public_url: get("PUBLIC_URL").unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string()),
            cookie_domain: get("COOKIE_DOMAIN"),
            production: get("ENVIRONMENT").is_some_and(|env| env.eq_ignore_ascii_case("production")),
            title_model: get("TITLE_MODEL"),
            oauth_clients,
        })
    }

    /// Callback URL registered with the provider
    pub fn oauth_callback_url(&self, provider: OAuthProvider) -> String {
        format!(
            "{}/api/auth/login/{}/callback",
            self.public_url.trim_end_matches('/'),
            provider
        )
    }
}

fn oauth_keys(provider: OAuthProvider) -> (&'static str, &'static str) {
    match provider {
        OAuthProvider::Google => ("GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET"),
        OAuthProvider::Facebook => ("FACEBOOK_APP_ID", "FACEBOOK_APP_SECRET"),
        OAuthProvider::Github => ("GITHUB_CLIENT_ID", "GITHUB_CLIENT_SECRET"),
    }
}
