//! JWT token creation with configurable TTLs.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use account_core::config::AuthConfig;
use account_core::config::auth::{MAX_ACCESS_TTL_MINUTES, MAX_REFRESH_TTL_HOURS};
use account_core::error::AppError;
use account_core::{AppResult, RefreshTokenId, UserId};

use super::claims::{AccessClaims, RefreshClaims, TokenType};
use super::error::TokenError;

/// A signed token and its expiry.
#[derive(Clone)]
pub struct IssuedToken {
    /// The compact JWS string.
    pub token: String,
    /// Value of the `exp` claim.
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// A signed refresh token together with the id the caller must persist.
#[derive(Clone)]
pub struct IssuedRefreshToken {
    /// The compact JWS string.
    pub token: String,
    /// The embedded `jti`.
    pub id: RefreshTokenId,
    /// Value of the `exp` claim.
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for IssuedRefreshToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedRefreshToken")
            .field("id", &self.id)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Creates HS256-signed access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token lifetime.
    access_ttl: Duration,
    /// Refresh token lifetime.
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// Fails with `Configuration` if a TTL is zero or above its maximum.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let access_ttl = bounded_ttl(
            config.access_ttl_minutes,
            MAX_ACCESS_TTL_MINUTES,
            Duration::try_minutes,
        )
        .ok_or_else(|| AppError::configuration("auth.access_ttl_minutes is out of range"))?;
        let refresh_ttl = bounded_ttl(
            config.refresh_ttl_hours,
            MAX_REFRESH_TTL_HOURS,
            Duration::try_hours,
        )
        .ok_or_else(|| AppError::configuration("auth.refresh_ttl_hours is out of range"))?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        })
    }

    /// Refresh token lifetime.
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Signs an access token for `user_id`.
    pub fn encode_access(&self, user_id: UserId) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now + self.access_ttl;
        let claims = AccessClaims {
            sub: user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            token_type: TokenType::Access,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Signs a refresh token with a freshly generated `jti`.
    pub fn encode_refresh(&self) -> Result<IssuedRefreshToken, TokenError> {
        let now = Utc::now();
        let expires_at = now + self.refresh_ttl;
        let id = RefreshTokenId::generate();
        let claims = RefreshClaims {
            jti: id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            token_type: TokenType::Refresh,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)?;

        Ok(IssuedRefreshToken {
            token,
            id,
            expires_at,
        })
    }
}

fn bounded_ttl(value: u64, max: u64, unit: fn(i64) -> Option<Duration>) -> Option<Duration> {
    if !(1..=max).contains(&value) {
        return None;
    }
    i64::try_from(value).ok().and_then(unit)
}
