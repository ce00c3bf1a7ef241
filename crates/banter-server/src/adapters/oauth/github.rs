//! GitHub login
//!
//! A private profile e-mail is resolved through `/user/emails`, taking the
//! primary verified address.

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use serde::Deserialize;

use banter::{DomainError, OAuthIdentityProvider, OAuthProfile, OAuthProvider};

use super::{query_string, read_json, TokenResponse};
use crate::config::OAuthClientConfig;

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";
const EMAILS_URL: &str = "https://api.github.com/user/emails";
const SCOPE: &str = "read:user user:email";
const API_ACCEPT: &str = "application/vnd.github+json";

pub struct GithubOAuth {
    http: Client,
    client_id: String,
    client_secret: String,
}

impl GithubOAuth {
    pub fn new(http: Client, config: &OAuthClientConfig) -> Self {
        Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    async fn primary_email(&self, access_token: &str) -> Result<Option<String>, DomainError> {
        let emails: Vec<GithubEmail> = read_json(
            OAuthProvider::Github,
            self.http
                .get(EMAILS_URL)
                .bearer_auth(access_token)
                .header(ACCEPT, API_ACCEPT)
                .send()
                .await,
        )
        .await?;
        Ok(pick_primary_email(emails))
    }
}

#[derive(Deserialize)]
struct GithubUser {
    id: u64,
    login: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

#[derive(Deserialize)]
struct GithubEmail {
    email: String,
    #[serde(default)]
    primary: bool,
    #[serde(default)]
    verified: bool,
}

fn pick_primary_email(emails: Vec<GithubEmail>) -> Option<String> {
    emails
        .into_iter()
        .find(|e| e.primary && e.verified)
        .map(|e| e.email)
}

impl GithubUser {
    fn into_profile(self, email: Option<String>) -> OAuthProfile {
        OAuthProfile {
            provider: OAuthProvider::Github,
            provider_user_id: self.id.to_string(),
            email,
            display_name: self.name.or(Some(self.login)),
            image: self.avatar_url,
        }
    }
}

#[async_trait]
impl OAuthIdentityProvider for GithubOAuth {
    fn provider(&self) -> OAuthProvider {
        OAuthProvider::Github
    }

    fn authorize_url(&self, state: &str, redirect_uri: &str) -> String {
        format!(
            "{AUTHORIZE_URL}?{}",
            query_string(&[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("scope", SCOPE),
                ("state", state),
            ])
        )
    }

    async fn fetch_profile(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<OAuthProfile, DomainError> {
        let token: TokenResponse = read_json(
            OAuthProvider::Github,
            self.http
                .post(TOKEN_URL)
                .header(ACCEPT, "application/json")
                .form(&[
                    ("client_id", self.client_id.as_str()),
                    ("client_secret", self.client_secret.as_str()),
                    ("code", code),
                    ("redirect_uri", redirect_uri),
                ])
                .send()
                .await,
        )
        .await?;
        let access_token = token.into_access_token(OAuthProvider::Github)?;

        let user: GithubUser = read_json(
            OAuthProvider::Github,
            self.http
                .get(USER_URL)
                .bearer_auth(&access_token)
                .header(ACCEPT, API_ACCEPT)
                .send()
                .await,
        )
        .await?;

        let email = match user.email.clone().filter(|e| !e.is_empty()) {
            Some(email) => Some(email),
            None => self.primary_email(&access_token).await?,
        };

        Ok(user.into_profile(email))
    }
}
