//! Auth DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use banter::User;

/// Register request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// Display name
    pub name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Keep the session for 30 days
    #[serde(default)]
    pub remember_me: bool,
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub image: Option<String>,
    pub google_id: Option<String>,
    pub facebook_id: Option<String>,
    pub github_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            image: user.image,
            google_id: user.google_id,
            facebook_id: user.facebook_id,
            github_id: user.github_id,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub username: String,
}

/// Register response
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: RegisteredUser,
}

/// Login / verify / refresh response
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub user: UserResponse,
}

impl From<User> for SessionResponse {
    fn from(user: User) -> Self {
        Self { user: user.into() }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageOnlyResponse {
    pub message: String,
}

/// Query parameters the provider appends to the callback URL
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set when the user denied access
    pub error: Option<String>,
    pub error_description: Option<String>,
}
