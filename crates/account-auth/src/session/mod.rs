//! Session lifecycle orchestration.

mod cancel;
pub mod service;

pub use service::SessionService;
