//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use account_core::config::AuthConfig;
use account_core::{RefreshTokenId, UserId};

use super::claims::{AccessClaims, RefreshClaims, TokenType};
use super::error::TokenError;

/// Verifies HS256 tokens and extracts their typed claims.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Verifies an access token and returns its subject.
    pub fn decode_access(&self, token: &str) -> Result<UserId, TokenError> {
        let claims = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)?.claims;
        if claims.token_type != TokenType::Access {
            return Err(TokenError::Invalid);
        }
        Ok(claims.sub)
    }

    /// Verifies a refresh token and returns its `jti`.
    ///
    /// Expiry is reported as [`TokenError::Invalid`] like every other
    /// failure.
    pub fn decode_refresh(&self, token: &str) -> Result<RefreshTokenId, TokenError> {
        let claims = decode::<RefreshClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::Invalid)?
            .claims;
        if claims.token_type != TokenType::Refresh {
            return Err(TokenError::Invalid);
        }
        Ok(claims.jti)
    }
}
