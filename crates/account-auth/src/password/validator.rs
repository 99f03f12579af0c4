//! Password policy enforcement for new passwords.

use account_core::config::AuthConfig;
use account_core::error::AppError;

/// Validates new passwords against the configured length bounds.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in characters.
    min_length: usize,
    /// Maximum password length in bytes.
    max_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            max_length: config.password_max_length,
        }
    }

    /// Returns `Ok(())` if the password is acceptable, or a validation
    /// error describing the violation.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if self.exceeds_max(password) {
            return Err(AppError::validation(format!(
                "Password must be at most {} bytes long",
                self.max_length
            )));
        }

        Ok(())
    }

    /// Whether `password` is longer than the byte cap. Checked before any
    /// Argon2 work so a single request cannot pin a worker.
    pub fn exceeds_max(&self, password: &str) -> bool {
        password.len() > self.max_length
    }
}

#[cfg(test)]
mod tests {
    use account_core::ErrorKind;

    use super::*;

    fn validator(min: usize, max: usize) -> PasswordValidator {
        PasswordValidator::new(&AuthConfig {
            password_min_length: min,
            password_max_length: max,
            ..AuthConfig::default()
        })
    }

    #[test]
    fn length_bounds_are_inclusive() {
        let v = validator(3, 8);
        assert!(v.validate("pw1").is_ok());
        assert!(v.validate("12345678").is_ok());
        assert_eq!(v.validate("pw").unwrap_err().kind, ErrorKind::Validation);
        assert_eq!(v.validate("123456789").unwrap_err().kind, ErrorKind::Validation);
    }

    #[test]
    fn cap_is_measured_in_bytes() {
        let v = validator(1, 4);
        assert!(!v.exceeds_max("abcd"));
        assert!(v.exceeds_max("äöü"));
    }

    #[test]
    fn minimum_counts_characters_not_bytes() {
        let v = validator(3, 256);
        assert!(v.validate("äöü").is_ok());
        assert!(v.validate("äö").is_err());
    }
}
