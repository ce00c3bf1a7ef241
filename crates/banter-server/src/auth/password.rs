//! Password hashing (Argon2id, PHC string format)

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use banter::DomainError;

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Default)]
pub struct Passwords {
    argon: Argon2<'static>,
}

impl Passwords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cheap parameters so tests don't spend seconds per hash
    #[cfg(test)]
    pub fn fast() -> Self {
        let params = argon2::Params::new(8, 1, 1, None).expect("valid argon2 params");
        Self {
            argon: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::Repository(format!("Failed to hash password: {e}")))
    }

    /// `false` for a wrong password or an unparseable stored hash
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => self
                .argon
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                false
            }
        }
    }
}
