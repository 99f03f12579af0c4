//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::dto::response::HealthResponse;
use crate::extractors::RequestDeadline;
use crate::state::AppState;

/// GET /health
///
/// Returns 503 when the credential store cannot be reached.
pub async fn health(
    State(state): State<AppState>,
    deadline: RequestDeadline,
) -> (StatusCode, Json<HealthResponse>) {
    let reachable = match state.sessions.health(deadline.token()).await {
        Ok(reachable) => reachable,
        Err(e) => {
            warn!(error = %e, "Credential store health check failed");
            false
        }
    };

    let (status, label, database) = if reachable {
        (StatusCode::OK, "ok", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            database: database.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}
