//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header and verifies it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use account_core::UserId;
use account_core::error::{AppError, ErrorKind};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// Subject of the verified access token.
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::new(
                        ErrorKind::InvalidAccessToken,
                        "Missing or malformed Authorization header",
                    )
                })?;

        let user_id = state.sessions.authenticate(bearer.token())?;
        Ok(Self { user_id })
    }
}
