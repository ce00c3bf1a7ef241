//! JWT access/refresh tokens
//!
//! Access and refresh tokens are HS256 JWTs signed with *different*
//! secrets, so one can never be replayed as the other. Refresh tokens
//! carry the remember-me choice so rotation keeps the session policy.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use banter::User;

pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;
pub const REMEMBER_ME_TTL_DAYS: i64 = 30;

/// Claims of a short-lived access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id
    pub sub: Uuid,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_id: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Claims of a refresh token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    #[serde(default)]
    pub remember: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Freshly issued token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub remember: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e.to_string()),
        }
    }
}

/// Signs and verifies access/refresh tokens
#[derive(Clone)]
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    remember_ttl: Duration,
    validation: Validation,
}

impl TokenService {
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl: Duration::minutes(ACCESS_TOKEN_TTL_MINUTES),
            refresh_ttl: Duration::days(REFRESH_TOKEN_TTL_DAYS),
            remember_ttl: Duration::days(REMEMBER_ME_TTL_DAYS),
            validation,
        }
    }

    #[cfg(test)]
    pub fn with_ttls(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_ttl = access;
        self.refresh_ttl = refresh;
        self
    }

    /// Lifetime of a refresh token under the given remember-me policy
    pub fn refresh_ttl(&self, remember: bool) -> Duration {
        if remember {
            self.remember_ttl
        } else {
            self.refresh_ttl
        }
    }

    /// Issue an access token and a refresh token for `user`
    pub fn issue(&self, user: &User, remember: bool) -> Result<TokenPair, TokenError> {
        let now = Utc::now();
        let access = AccessClaims {
            sub: user.id,
            username: user.username.clone(),
            google_id: user.google_id.clone(),
            facebook_id: user.facebook_id.clone(),
            github_id: user.github_id.clone(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };
        let refresh = RefreshClaims {
            sub: user.id,
            remember,
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl(remember)).timestamp(),
        };

        let header = Header::new(Algorithm::HS256);
        let access_token = encode(&header, &access, &self.access_encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        let refresh_token = encode(&header, &refresh, &self.refresh_encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            remember,
        })
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        Ok(decode::<AccessClaims>(token, &self.access_decoding, &self.validation)?.claims)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        Ok(decode::<RefreshClaims>(token, &self.refresh_decoding, &self.validation)?.claims)
    }
}
