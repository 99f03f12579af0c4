//! # account-auth
//!
//! Credential issuance and the session lifecycle for the account service.
//!
//! ## Modules
//!
//! - `jwt`: HS256 access and refresh token issuance and verification
//! - `password`: Argon2id password hashing and length policy
//! - `session`: register, login, refresh and logout orchestration

pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{TokenEngine, TokenError};
pub use password::{PasswordHasher, PasswordValidator};
pub use session::SessionService;
