//! Token pair returned by login and refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An access token together with the refresh token that can renew it.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived, stateless access token.
    pub access_token: String,
    /// Long-lived, single-use refresh token.
    pub refresh_token: String,
    /// Access token expiry.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiry.
    pub refresh_expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_expires_at", &self.access_expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish_non_exhaustive()
    }
}
