//! Google OpenID Connect login

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use banter::{DomainError, OAuthIdentityProvider, OAuthProfile, OAuthProvider};

use super::{query_string, read_json, TokenResponse};
use crate::config::OAuthClientConfig;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
const SCOPE: &str = "openid profile email";

pub struct GoogleOAuth {
    http: Client,
    client_id: String,
    client_secret: String,
}

impl GoogleOAuth {
    pub fn new(http: Client, config: &OAuthClientConfig) -> Self {
        Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }
}

#[derive(Deserialize)]
struct GoogleUserInfo {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl From<GoogleUserInfo> for OAuthProfile {
    fn from(info: GoogleUserInfo) -> Self {
        Self {
            provider: OAuthProvider::Google,
            provider_user_id: info.sub,
            email: info.email,
            display_name: info.name,
            image: info.picture,
        }
    }
}

#[async_trait]
impl OAuthIdentityProvider for GoogleOAuth {
    fn provider(&self) -> OAuthProvider {
        OAuthProvider::Google
    }

    fn authorize_url(&self, state: &str, redirect_uri: &str) -> String {
        format!(
            "{AUTHORIZE_URL}?{}",
            query_string(&[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", SCOPE),
                ("state", state),
                ("prompt", "select_account"),
            ])
        )
    }

    async fn fetch_profile(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<OAuthProfile, DomainError> {
        let token: TokenResponse = read_json(
            OAuthProvider::Google,
            self.http
                .post(TOKEN_URL)
                .form(&[
                    ("code", code),
                    ("client_id", self.client_id.as_str()),
                    ("client_secret", self.client_secret.as_str()),
                    ("redirect_uri", redirect_uri),
                    ("grant_type", "authorization_code"),
                ])
                .send()
                .await,
        )
        .await?;
        let access_token = token.into_access_token(OAuthProvider::Google)?;

        let info: GoogleUserInfo = read_json(
            OAuthProvider::Google,
            self.http.get(USERINFO_URL).bearer_auth(&access_token).send().await,
        )
        .await?;

        Ok(info.into())
    }
}
