//! Route definitions for the account HTTP API.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the router and thread `state` through every route.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", auth_routes())
        .route("/health", get(handlers::health::health))
        .with_state(state)
}

/// Registration, login, refresh, logout and profile.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh))
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me))
}
