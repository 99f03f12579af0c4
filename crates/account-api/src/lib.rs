//! # account-api
//!
//! HTTP API layer for the account service built on Axum.
//!
//! Provides the REST endpoints for registration, login, token refresh,
//! logout and profile lookup, plus the extractors, DTOs and error mapping
//! they share.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
