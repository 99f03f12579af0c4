//! # account-entity
//!
//! Domain entity models for the account service. Structs that map to a
//! table row derive `sqlx::FromRow`; value objects exchanged with callers
//! derive `Serialize`/`Deserialize`.

pub mod token;
pub mod user;

pub use token::{DeviceInfo, NewRefreshToken, RefreshTokenRecord, TokenPair};
pub use user::User;
