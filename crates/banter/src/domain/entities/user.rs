//! User - Account that owns conversations and prompts
//!
//! A user logs in either with a username/password pair, with one or more
//! OAuth identities, or both. OAuth users are keyed by their e-mail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::OAuthProvider;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Argon2 PHC string; `None` for OAuth-only accounts
    #[serde(skip_serializing)]
    pub hashed_password: Option<String>,
    pub google_id: Option<String>,
    pub facebook_id: Option<String>,
    pub github_id: Option<String>,
    pub display_name: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity returned by an OAuth provider after a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthProfile {
    pub provider: OAuthProvider,
    /// Provider-scoped user id
    pub provider_user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub image: Option<String>,
}

impl User {
    /// Create a password-based user
    pub fn new(username: String, hashed_password: String, display_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            hashed_password: Some(hashed_password),
            google_id: None,
            facebook_id: None,
            github_id: None,
            display_name,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a user from an OAuth profile
    ///
    /// Without an e-mail the username falls back to `<provider>:<id>`.
    pub fn from_oauth(profile: &OAuthProfile) -> Self {
        let now = Utc::now();
        let mut user = Self {
            id: Uuid::new_v4(),
            username: profile.fallback_username(),
            hashed_password: None,
            google_id: None,
            facebook_id: None,
            github_id: None,
            display_name: None,
            image: None,
            created_at: now,
            updated_at: now,
        };
        user.apply_oauth_profile(profile);
        user
    }

    pub fn has_password(&self) -> bool {
        self.hashed_password.is_some()
    }

    /// Provider-scoped id for the given provider
    pub fn provider_id(&self, provider: OAuthProvider) -> Option<&str> {
        match provider {
            OAuthProvider::Google => self.google_id.as_deref(),
            OAuthProvider::Facebook => self.facebook_id.as_deref(),
            OAuthProvider::Github => self.github_id.as_deref(),
        }
    }

    pub fn set_provider_id(&mut self, provider: OAuthProvider, id: String) {
        match provider {
            OAuthProvider::Google => self.google_id = Some(id),
            OAuthProvider::Facebook => self.facebook_id = Some(id),
            OAuthProvider::Github => self.github_id = Some(id),
        }
    }

    /// Merge a fresh OAuth profile into this account
    ///
    /// Existing image and display name are only replaced when the provider
    /// supplies a value; the username follows the provider e-mail.
    pub fn apply_oauth_profile(&mut self, profile: &OAuthProfile) {
        self.set_provider_id(profile.provider, profile.provider_user_id.clone());
        if let Some(email) = &profile.email {
            self.username = email.clone();
        }
        if profile.image.is_some() {
            self.image = profile.image.clone();
        }
        if profile.display_name.is_some() {
            self.display_name = profile.display_name.clone();
        }
        self.updated_at = Utc::now();
    }
}

impl OAuthProfile {
    fn fallback_username(&self) -> String {
        self.email
            .clone()
            .unwrap_or_else(|| format!("{}:{}", self.provider, self.provider_user_id))
    }
}
