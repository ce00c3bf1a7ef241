//! Facebook login via the Graph API
//!
//! Graph calls are signed with `appsecret_proof`, the hex HMAC-SHA256 of
//! the access token keyed by the app secret.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;

use banter::{DomainError, OAuthIdentityProvider, OAuthProfile, OAuthProvider};

use super::{query_string, read_json, TokenResponse};
use crate::config::OAuthClientConfig;

const GRAPH_VERSION: &str = "v19.0";
const SCOPE: &str = "email,public_profile";
const PROFILE_FIELDS: &str = "id,name,email,picture.type(large)";

type HmacSha256 = Hmac<Sha256>;

pub struct FacebookOAuth {
    http: Client,
    app_id: String,
    app_secret: String,
}

impl FacebookOAuth {
    pub fn new(http: Client, config: &OAuthClientConfig) -> Self {
        Self {
            http,
            app_id: config.client_id.clone(),
            app_secret: config.client_secret.clone(),
        }
    }

    fn appsecret_proof(&self, access_token: &str) -> Result<String, DomainError> {
        let mut mac = HmacSha256::new_from_slice(self.app_secret.as_bytes())
            .map_err(|e| DomainError::ExternalService(format!("Invalid Facebook app secret: {e}")))?;
        mac.update(access_token.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[derive(Deserialize)]
struct FacebookUser {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    picture: Option<FacebookPicture>,
}

#[derive(Deserialize)]
struct FacebookPicture {
    data: FacebookPictureData,
}

#[derive(Deserialize)]
struct FacebookPictureData {
    #[serde(default)]
    url: Option<String>,
}

impl From<FacebookUser> for OAuthProfile {
    fn from(user: FacebookUser) -> Self {
        Self {
            provider: OAuthProvider::Facebook,
            provider_user_id: user.id,
            email: user.email,
            display_name: user.name,
            image: user.picture.and_then(|p| p.data.url),
        }
    }
}

#[async_trait]
impl OAuthIdentityProvider for FacebookOAuth {
    fn provider(&self) -> OAuthProvider {
        OAuthProvider::Facebook
    }

    fn authorize_url(&self, state: &str, redirect_uri: &str) -> String {
        format!(
            "https://www.facebook.com/{GRAPH_VERSION}/dialog/oauth?{}",
            query_string(&[
                ("client_id", self.app_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
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
            OAuthProvider::Facebook,
            self.http
                .get(format!(
                    "https://graph.facebook.com/{GRAPH_VERSION}/oauth/access_token"
                ))
                .query(&[
                    ("client_id", self.app_id.as_str()),
                    ("client_secret", self.app_secret.as_str()),
                    ("redirect_uri", redirect_uri),
                    ("code", code),
                ])
                .send()
                .await,
        )
        .await?;
        let access_token = token.into_access_token(OAuthProvider::Facebook)?;
        let proof = self.appsecret_proof(&access_token)?;

        let user: FacebookUser = read_json(
            OAuthProvider::Facebook,
            self.http
                .get(format!("https://graph.facebook.com/{GRAPH_VERSION}/me"))
                .query(&[
                    ("fields", PROFILE_FIELDS),
                    ("access_token", access_token.as_str()),
                    ("appsecret_proof", proof.as_str()),
                ])
                .send()
                .await,
        )
        .await?;

        Ok(user.into())
    }
}
