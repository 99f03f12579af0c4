//! Per-request cancellation deadline.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// A cancellation token that fires once the configured request timeout
/// elapses. The timer is aborted when the handler finishes.
#[derive(Debug)]
pub struct RequestDeadline {
    token: CancellationToken,
    timer: JoinHandle<()>,
}

impl RequestDeadline {
    /// Arms a deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            trigger.cancel();
        });
        Self { token, timer }
    }

    /// The token to pass to session operations.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for RequestDeadline {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

impl FromRequestParts<AppState> for RequestDeadline {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::after(state.config.server.request_timeout()))
    }
}
