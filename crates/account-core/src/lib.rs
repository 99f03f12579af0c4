//! # account-core
//!
//! Core crate for the account service. Contains configuration schemas,
//! typed identifiers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other account crates.

pub mod config;
pub mod error;
pub mod types;

pub use error::{AppError, AppResult, ErrorKind};
pub use types::id::{RefreshTokenId, UserId};
