//! Authentication: JWTs, password hashing, cookies and the auth middleware

pub mod cookies;
pub mod middleware;
pub mod password;
pub mod tokens;

pub use cookies::CookiePolicy;
pub use middleware::{require_auth, AuthUser};
pub use password::Passwords;
pub use tokens::{TokenPair, TokenService};
