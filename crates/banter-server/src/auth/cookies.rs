//! Auth cookie policy
//!
//! Tokens travel in HttpOnly cookies. The refresh cookie is scoped to the
//! refresh endpoint so it is not sent with every API call.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::tokens::{TokenPair, ACCESS_TOKEN_TTL_MINUTES, REMEMBER_ME_TTL_DAYS};
use crate::config::AppConfig;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";
pub const OAUTH_STATE_COOKIE: &str = "oauthState";

pub const REFRESH_COOKIE_PATH: &str = "/api/auth/refresh";
pub const OAUTH_STATE_COOKIE_PATH: &str = "/api/auth/login";
const OAUTH_STATE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Clone, Default)]
pub struct CookiePolicy {
    /// Secure + SameSite=Strict
    pub secure: bool,
    pub domain: Option<String>,
}

impl CookiePolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            secure: config.production,
            domain: config.cookie_domain.clone(),
        }
    }

    fn base(&self, name: &'static str, value: String, path: &'static str) -> Cookie<'static> {
        let mut cookie = Cookie::new(name, value);
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(if self.secure {
            SameSite::Strict
        } else {
            SameSite::Lax
        });
        cookie.set_path(path);
        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    pub fn access_cookie(&self, token: String) -> Cookie<'static> {
        let mut cookie = self.base(ACCESS_COOKIE, token, "/");
        cookie.set_max_age(time::Duration::minutes(ACCESS_TOKEN_TTL_MINUTES));
        cookie
    }

    /// Persistent only with remember-me; a session cookie otherwise
    pub fn refresh_cookie(&self, token: String, remember: bool) -> Cookie<'static> {
        let mut cookie = self.base(REFRESH_COOKIE, token, REFRESH_COOKIE_PATH);
        if remember {
            cookie.set_max_age(time::Duration::days(REMEMBER_ME_TTL_DAYS));
        }
        cookie
    }

    /// The provider redirects back cross-site, so this one is always Lax
    pub fn oauth_state_cookie(&self, state: String) -> Cookie<'static> {
        let mut cookie = self.base(OAUTH_STATE_COOKIE, state, OAUTH_STATE_COOKIE_PATH);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_max_age(time::Duration::minutes(OAUTH_STATE_TTL_MINUTES));
        cookie
    }

    pub fn set_tokens(&self, jar: CookieJar, pair: &TokenPair) -> CookieJar {
        jar.add(self.access_cookie(pair.access_token.clone()))
            .add(self.refresh_cookie(pair.refresh_token.clone(), pair.remember))
    }

    pub fn clear_tokens(&self, jar: CookieJar) -> CookieJar {
        jar.remove(self.base(ACCESS_COOKIE, String::new(), "/"))
            .remove(self.base(REFRESH_COOKIE, String::new(), REFRESH_COOKIE_PATH))
    }

    pub fn clear_oauth_state(&self, jar: CookieJar) -> CookieJar {
        jar.remove(self.base(OAUTH_STATE_COOKIE, String::new(), OAUTH_STATE_COOKIE_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(remember: bool) -> TokenPair {
        TokenPair {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            remember,
        }
    }

    #[test]
    fn test_development_cookies_are_lax_and_insecure() {
        let cookie = CookiePolicy::default().access_cookie("tok".into());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::minutes(15)));
    }

    #[test]
    fn test_production_cookies_are_strict() {
        let policy = CookiePolicy {
            secure: true,
            domain: Some("banter.chat".into()),
        };
        let cookie = policy.refresh_cookie("tok".into(), false);
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.domain(), Some("banter.chat"));
        assert_eq!(cookie.path(), Some(REFRESH_COOKIE_PATH));
    }

    #[test]
    fn test_refresh_cookie_persists_only_with_remember_me() {
        let policy = CookiePolicy::default();
        assert_eq!(policy.refresh_cookie("t".into(), false).max_age(), None);
        assert_eq!(
            policy.refresh_cookie("t".into(), true).max_age(),
            Some(time::Duration::days(30))
        );
    }

    #[test]
    fn test_oauth_state_cookie_stays_lax_in_production() {
        let policy = CookiePolicy {
            secure: true,
            domain: None,
        };
        let cookie = policy.oauth_state_cookie("nonce".into());
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::minutes(10)));
    }

    #[test]
    fn test_set_then_clear_tokens() {
        let policy = CookiePolicy::default();
        let jar = policy.set_tokens(CookieJar::new(), &pair(true));
        assert_eq!(jar.get(ACCESS_COOKIE).map(|c| c.value()), Some("access"));
        assert_eq!(jar.get(REFRESH_COOKIE).map(|c| c.value()), Some("refresh"));

        let jar = policy.clear_tokens(jar);
        assert!(jar.get(ACCESS_COOKIE).is_none());
        assert!(jar.get(REFRESH_COOKIE).is_none());
    }
}
