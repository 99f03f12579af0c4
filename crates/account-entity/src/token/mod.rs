//! Refresh token records and the token values handed to clients.

pub mod device;
pub mod pair;
pub mod record;

pub use device::DeviceInfo;
pub use pair::TokenPair;
pub use record::{NewRefreshToken, RefreshTokenRecord};
