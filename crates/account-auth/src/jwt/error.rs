//! Token engine failures.

use thiserror::Error;

/// Why a token could not be issued or accepted.
///
/// Verification failures carry no detail: a forged signature, a malformed
/// payload, a missing claim and a wrong token type all become [`Invalid`].
///
/// [`Invalid`]: TokenError::Invalid
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token failed verification.
    #[error("invalid token")]
    Invalid,
    /// The token verified but its `exp` has passed.
    #[error("token expired")]
    Expired,
    /// Signing a new token failed.
    #[error("token signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid,
        }
    }
}
