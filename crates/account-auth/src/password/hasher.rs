//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use account_core::error::{AppError, ErrorKind};

/// A well-formed hash with the default Argon2id parameters that no password
/// verifies against. Checking a password against it costs the same as a
/// real verification.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Handles password hashing and verification using Argon2id.
///
/// Both operations are CPU-bound; async callers run them on a blocking
/// worker.
#[derive(Debug, Clone)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                AppError::new(ErrorKind::Internal, format!("Password hashing failed: {e}"))
            })?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not. The
    /// digest comparison is constant-time.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            AppError::new(ErrorKind::Internal, format!("Invalid password hash format: {e}"))
        })?;

        let argon2 = Argon2::default();
        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::new(
                ErrorKind::Internal,
                format!("Password verification failed: {e}"),
            )),
        }
    }

    /// Spends one verification's worth of work without a stored hash.
    ///
    /// Used when the account does not exist so that a failed login takes
    /// as long as a wrong password would.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify_password(password, DUMMY_HASH);
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("pw1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("pw1", &hash).unwrap());
        assert!(!hasher.verify_password("pw2", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = PasswordHasher::new();
        assert_ne!(
            hasher.hash_password("pw1").unwrap(),
            hasher.hash_password("pw1").unwrap()
        );
    }

    #[test]
    fn malformed_hash_is_an_internal_error() {
        let err = PasswordHasher::new()
            .verify_password("pw1", "not-a-phc-string")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
    }

    #[test]
    fn dummy_hash_parses_and_never_matches() {
        assert!(PasswordHash::new(DUMMY_HASH).is_ok());
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify_password("", DUMMY_HASH).unwrap());
        assert!(!hasher.verify_password("pw1", DUMMY_HASH).unwrap());
    }
}
