//! JWT claims carried by access and refresh tokens.

use serde::{Deserialize, Serialize};

use account_core::{RefreshTokenId, UserId};

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived, stateless access token.
    Access,
    /// Long-lived, stored refresh token.
    Refresh,
}

/// Claims payload of an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user id, encoded as a JSON number.
    #[serde(with = "subject")]
    pub sub: UserId,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Always [`TokenType::Access`].
    pub token_type: TokenType,
}

/// Claims payload of a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Token id, equal to the stored record's primary key.
    pub jti: RefreshTokenId,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Always [`TokenType::Refresh`].
    pub token_type: TokenType,
}

/// (De)serialization of the numeric `sub` claim.
///
/// Some JWT producers emit every number as a double, so an integral float
/// is accepted as long as it converts without loss. Fractional, non-finite
/// and out-of-range values are rejected, as is anything that is not a
/// number or a decimal string.
mod subject {
    use std::fmt;

    use serde::de::{self, Unexpected, Visitor};
    use serde::{Deserializer, Serializer};

    use account_core::UserId;

    /// Largest integer a double represents exactly (2^53).
    const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

    pub fn serialize<S: Serializer>(id: &UserId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(id.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<UserId, D::Error> {
        deserializer.deserialize_any(SubjectVisitor)
    }

    struct SubjectVisitor;

    impl<'de> Visitor<'de> for SubjectVisitor {
        type Value = UserId;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integral user id")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<UserId, E> {
            Ok(UserId(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<UserId, E> {
            i64::try_from(v)
                .map(UserId)
                .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<UserId, E> {
            if v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_EXACT_FLOAT {
                Ok(UserId(v as i64))
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<UserId, E> {
            v.parse::<i64>()
                .map(UserId)
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }
    }
}
