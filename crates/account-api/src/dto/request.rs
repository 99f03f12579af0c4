//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request body.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login email.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Plaintext password. Length policy is enforced by the session service.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request body.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Caller-chosen device identifier the session is bound to.
    #[validate(length(min = 1, max = 255, message = "device_id must be 1-255 characters"))]
    pub device_id: String,
}

/// Token refresh request body.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token from the last login or refresh.
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
    /// Device the token was issued to.
    #[validate(length(min = 1, max = 255, message = "device_id must be 1-255 characters"))]
    pub device_id: String,
}

/// Logout request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogoutRequest {
    /// Device whose session ends.
    #[validate(length(min = 1, max = 255, message = "device_id must be 1-255 characters"))]
    pub device_id: String,
}

macro_rules! redacted_debug {
    ($name:ident { $($field:ident),* }) => {
        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    $(.field(stringify!($field), &self.$field))*
                    .finish_non_exhaustive()
            }
        }
    };
}

redacted_debug!(RegisterRequest { email });
redacted_debug!(LoginRequest { email, device_id });
redacted_debug!(RefreshRequest { device_id });
