//! Auth Application Service (Use Case)
//!
//! Registration, password login, token verification/rotation and OAuth
//! find-or-create.

use std::sync::Arc;

use banter::{DomainError, OAuthProfile, User, UserRepository};

use crate::auth::password::MIN_PASSWORD_LEN;
use crate::auth::{Passwords, TokenPair, TokenService};

/// Result of a registration
#[derive(Debug)]
pub struct Registration {
    pub user: User,
    /// A password was attached to an existing OAuth-only account
    pub merged: bool,
}

/// A logged-in user and their fresh tokens
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub tokens: TokenPair,
}

pub struct AuthService<U: UserRepository> {
    users: Arc<U>,
    passwords: Passwords,
    tokens: Arc<TokenService>,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(users: Arc<U>, passwords: Passwords, tokens: Arc<TokenService>) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<Registration, DomainError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::Validation("Username is required".into()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let existing = self.users.find_by_username(username).await?;
        if existing.as_ref().is_some_and(User::has_password) {
            return Err(DomainError::Conflict(
                "User already exists. Please login.".into(),
            ));
        }

        let hashed = self.hash(password).await?;
        let display_name = display_name.filter(|n| !n.trim().is_empty());

        match existing {
            Some(mut user) => {
                user.hashed_password = Some(hashed);
                if user.display_name.is_none() {
                    user.display_name = display_name;
                }
                user.updated_at = chrono::Utc::now();
                let user = self.users.save(&user).await?;
                tracing::info!("Attached password to OAuth user: {} ({})", user.username, user.id);
                Ok(Registration { user, merged: true })
            }
            None => {
                let user = self
                    .users
                    .save(&User::new(username.to_string(), hashed, display_name))
                    .await?;
                tracing::info!("Registered user: {} ({})", user.username, user.id);
                Ok(Registration {
                    user,
                    merged: false,
                })
            }
        }
    }

    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<Session, DomainError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or_else(|| DomainError::not_found_str("User", username))?;

        let Some(stored) = user.hashed_password.clone() else {
            return Err(DomainError::Unprocessable(
                "Wrong authentication method. Please use OAuth.".into(),
            ));
        };

        if !self.verify(password, stored).await? {
            tracing::warn!("Failed login for {}", user.username);
            return Err(DomainError::Unauthorized(
                "Invalid username or password".into(),
            ));
        }

        self.start_session(user, remember)
    }

    /// Resolve the user behind an access token
    pub async fn verify_access(&self, access_token: &str) -> Result<User, DomainError> {
        let claims = self
            .tokens
            .verify_access(access_token)
            .map_err(|_| DomainError::Unauthorized("Invalid or expired access token".into()))?;

        self.users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("User not found".into()))
    }

    /// Rotate both tokens, keeping the remember-me policy of the old one
    pub async fn refresh(&self, refresh_token: &str) -> Result<Session, DomainError> {
        let claims = self.tokens.verify_refresh(refresh_token).map_err(|e| {
            tracing::warn!("Rejected refresh token: {}", e);
            DomainError::Unauthorized("Invalid or expired refresh token".into())
        })?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("User not found".into()))?;

        self.start_session(user, claims.remember)
    }

    /// Find-or-create the account behind an OAuth profile
    ///
    /// Matches on the provider id first, then on username == e-mail.
    pub async fn oauth_login(&self, profile: &OAuthProfile) -> Result<Session, DomainError> {
        let mut existing = self
            .users
            .find_by_provider_id(profile.provider, &profile.provider_user_id)
            .await?;
        if existing.is_none() {
            if let Some(email) = &profile.email {
                existing = self.users.find_by_username(email).await?;
            }
        }

        let user = match existing {
            Some(mut user) => {
                let previous_username = user.username.clone();
                user.apply_oauth_profile(profile);
                if user.username != previous_username && self.username_taken(&user).await? {
                    tracing::warn!(
                        "{} e-mail of user {} belongs to another account, keeping username",
                        profile.provider,
                        user.id
                    );
                    user.username = previous_username;
                }
                let user = self.users.save(&user).await?;
                tracing::info!("{} login for existing user {}", profile.provider, user.id);
                user
            }
            None => {
                let user = self.users.save(&User::from_oauth(profile)).await?;
                tracing::info!("Created user {} from {} login", user.id, profile.provider);
                user
            }
        };

        // No remember-me checkbox on the provider flow; keep the long session
        self.start_session(user, true)
    }

    pub async fn get_user(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found_str("User", username))
    }

    /// Another account already uses `user.username`
    async fn username_taken(&self, user: &User) -> Result<bool, DomainError> {
        Ok(self
            .users
            .find_by_username(&user.username)
            .await?
            .is_some_and(|other| other.id != user.id))
    }

    fn start_session(&self, user: User, remember: bool) -> Result<Session, DomainError> {
        let tokens = self
            .tokens
            .issue(&user, remember)
            .map_err(|e| DomainError::Repository(e.to_string()))?;
        Ok(Session { user, tokens })
    }

    async fn hash(&self, password: &str) -> Result<String, DomainError> {
        let passwords = self.passwords.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await
            .map_err(|e| DomainError::Repository(format!("Password hashing task failed: {e}")))?
    }

    async fn verify(&self, password: &str, stored: String) -> Result<bool, DomainError> {
        let passwords = self.passwords.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || passwords.verify(&password, &stored))
            .await
            .map_err(|e| DomainError::Repository(format!("Password check task failed: {e}")))
    }
}
