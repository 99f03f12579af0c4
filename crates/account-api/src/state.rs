//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use account_auth::SessionService;
use account_core::config::AppConfig;

/// Application state passed to every handler via `State<AppState>`.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Session lifecycle service
    pub sessions: Arc<SessionService>,
}

impl AppState {
    /// Bundles configuration and the session service.
    pub fn new(config: AppConfig, sessions: SessionService) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
        }
    }
}
