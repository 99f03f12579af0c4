//! Server-side refresh token record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use account_core::{RefreshTokenId, UserId};

use super::device::DeviceInfo;

/// The live refresh token for one `(user_id, device_id)` pair.
///
/// The record is replaced in place on every refresh: `id`, `token_value`
/// and `expires_at` change while the device binding stays fixed.
#[derive(Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshTokenRecord {
    /// Token identifier, equal to the signed token's `jti` claim.
    pub id: RefreshTokenId,
    /// Owning user.
    pub user_id: UserId,
    /// The signed token string currently valid for this record.
    #[serde(skip_serializing)]
    pub token_value: String,
    /// Device the token is bound to.
    pub device_id: String,
    /// Client IP at login.
    pub ip: Option<String>,
    /// Client user agent at login.
    pub user_agent: Option<String>,
    /// When the session was established on this device.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry of the current token value.
    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Whether the current token value is past its expiry.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Whether a presented token string and device both match this record.
    pub fn matches(&self, token_value: &str, device_id: &str) -> bool {
        self.token_value == token_value && self.device_id == device_id
    }
}

impl std::fmt::Debug for RefreshTokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenRecord")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("token_value", &"<redacted>")
            .field("device_id", &self.device_id)
            .field("ip", &self.ip)
            .field("user_agent", &self.user_agent)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Data required to persist a freshly issued refresh token.
#[derive(Clone)]
pub struct NewRefreshToken {
    /// Token identifier (`jti`).
    pub id: RefreshTokenId,
    /// Owning user.
    pub user_id: UserId,
    /// The signed token string.
    pub token_value: String,
    /// Device binding and provenance.
    pub device: DeviceInfo,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

impl NewRefreshToken {
    /// Materialize the stored record as of `created_at`.
    pub fn into_record(self, created_at: DateTime<Utc>) -> RefreshTokenRecord {
        RefreshTokenRecord {
            id: self.id,
            user_id: self.user_id,
            token_value: self.token_value,
            device_id: self.device.device_id,
            ip: self.device.ip,
            user_agent: self.device.user_agent,
            created_at,
            expires_at: self.expires_at,
        }
    }
}

impl std::fmt::Debug for NewRefreshToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewRefreshToken")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("device", &self.device)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
