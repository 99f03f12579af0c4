//! The token engine: the only component that knows the signing secret.

use chrono::Duration;

use account_core::config::AuthConfig;
use account_core::{AppResult, RefreshTokenId, UserId};

use super::decoder::JwtDecoder;
use super::encoder::{IssuedRefreshToken, IssuedToken, JwtEncoder};
use super::error::TokenError;

/// Issues and verifies access and refresh tokens.
///
/// Access tokens are stateless; validity depends only on signature and
/// expiry. Refresh tokens carry a random `jti` that the session layer
/// persists and checks on every use.
#[derive(Debug, Clone)]
pub struct TokenEngine {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenEngine {
    /// Build an engine from auth configuration. Out-of-range TTLs fail
    /// with `Configuration`.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        Ok(Self {
            encoder: JwtEncoder::new(config)?,
            decoder: JwtDecoder::new(config),
        })
    }

    /// Refresh token lifetime, used when rotating stored records.
    pub fn refresh_ttl(&self) -> Duration {
        self.encoder.refresh_ttl()
    }

    /// Signs an access token for `user_id`, expiring after the access TTL.
    pub fn generate_access(&self, user_id: UserId) -> Result<IssuedToken, TokenError> {
        self.encoder.encode_access(user_id)
    }

    /// Signs a refresh token with a fresh `jti`. The caller persists the id.
    pub fn generate_refresh(&self) -> Result<IssuedRefreshToken, TokenError> {
        self.encoder.encode_refresh()
    }

    /// Returns the subject, or `Expired` / `Invalid`.
    pub fn parse_access(&self, token: &str) -> Result<UserId, TokenError> {
        self.decoder.decode_access(token)
    }

    /// Returns the embedded `jti`. Every failure is `Invalid`.
    pub fn parse_refresh(&self, token: &str) -> Result<RefreshTokenId, TokenError> {
        self.decoder.decode_refresh(token)
    }
}
