//! Auth handlers: register, login, refresh, logout, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::request::{LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{RegisterResponse, TokenResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ClientInfo, RequestDeadline, ValidatedJson};
use crate::state::AppState;

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    deadline: RequestDeadline,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = state
        .sessions
        .register(&req.email, &req.password, deadline.token())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            id: user.id,
        }),
    ))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    deadline: RequestDeadline,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let device = client.into_device(req.device_id);
    let tokens = state
        .sessions
        .login(&req.email, &req.password, device, deadline.token())
        .await?;

    Ok(Json(tokens.into()))
}

/// POST /api/refresh
pub async fn refresh(
    State(state): State<AppState>,
    deadline: RequestDeadline,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let tokens = state
        .sessions
        .refresh(&req.refresh_token, &req.device_id, deadline.token())
        .await?;

    Ok(Json(tokens.into()))
}

/// POST /api/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    deadline: RequestDeadline,
    ValidatedJson(req): ValidatedJson<LogoutRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .logout(auth.user_id, &req.device_id, deadline.token())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
    deadline: RequestDeadline,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .sessions
        .get_user_by_id(auth.user_id, deadline.token())
        .await?;

    Ok(Json(user.into()))
}
