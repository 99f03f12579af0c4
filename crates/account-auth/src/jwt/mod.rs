//! JWT issuance and verification.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod engine;
pub mod error;

pub use claims::{AccessClaims, RefreshClaims, TokenType};
pub use decoder::JwtDecoder;
pub use encoder::{IssuedRefreshToken, IssuedToken, JwtEncoder};
pub use engine::TokenEngine;
pub use error::TokenError;
