//! Custom Axum extractors.

pub mod auth;
pub mod client;
pub mod deadline;
pub mod json;

pub use auth::AuthUser;
pub use client::ClientInfo;
pub use deadline::RequestDeadline;
pub use json::ValidatedJson;
