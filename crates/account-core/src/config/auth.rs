//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minimum accepted length of the HMAC signing secret, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Longest accepted access token lifetime: one day.
pub const MAX_ACCESS_TTL_MINUTES: u64 = 24 * 60;

/// Longest accepted refresh token lifetime: one year.
pub const MAX_REFRESH_TTL_HOURS: u64 = 365 * 24;

/// Token signing and password policy configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_hours: u64,
    /// Allowed clock skew when checking `exp`, in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Minimum password length in characters.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Maximum password length in bytes.
    #[serde(default = "default_password_max")]
    pub password_max_length: usize,
}

impl AuthConfig {
    /// Rejects secrets too short for HMAC-SHA256 and TTLs outside
    /// `1..=MAX_*`.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.len() < MIN_SECRET_BYTES {
            return Err(AppError::configuration(format!(
                "auth.jwt_secret must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }
        if !(1..=MAX_ACCESS_TTL_MINUTES).contains(&self.access_ttl_minutes) {
            return Err(AppError::configuration(format!(
                "auth.access_ttl_minutes must be between 1 and {MAX_ACCESS_TTL_MINUTES}"
            )));
        }
        if !(1..=MAX_REFRESH_TTL_HOURS).contains(&self.refresh_ttl_hours) {
            return Err(AppError::configuration(format!(
                "auth.refresh_ttl_hours must be between 1 and {MAX_REFRESH_TTL_HOURS}"
            )));
        }
        if self.password_min_length > self.password_max_length {
            return Err(AppError::configuration(
                "auth.password_min_length exceeds auth.password_max_length",
            ));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_hours: default_refresh_ttl(),
            leeway_seconds: default_leeway(),
            password_min_length: default_password_min(),
            password_max_length: default_password_max(),
        }
    }
}

// The secret is never printed.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_hours", &self.refresh_ttl_hours)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("password_min_length", &self.password_min_length)
            .field("password_max_length", &self.password_max_length)
            .finish()
    }
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    720
}

fn default_leeway() -> u64 {
    5
}

fn default_password_min() -> usize {
    3
}

fn default_password_max() -> usize {
    256
}
