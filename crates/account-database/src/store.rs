//! The credential store contract.

use async_trait::async_trait;
use chrono::Duration;

use account_core::{AppResult, RefreshTokenId, UserId};
use account_entity::{NewRefreshToken, RefreshTokenRecord, User};

/// Durable storage for users and refresh token records.
///
/// Every operation touches a single row and is atomic. Absence is reported
/// as `Ok(None)` or `Ok(false)`; `Err` is reserved for backend failures and
/// for a duplicate email on [`create_user`](Self::create_user).
///
/// Implementations do not serialize concurrent callers beyond what the
/// compare-and-swap in [`rotate_refresh_token`](Self::rotate_refresh_token)
/// provides.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new user. Fails with `DuplicateEmail` if the email exists.
    async fn create_user(&self, email: &str, password_hash: &str) -> AppResult<User>;

    /// Look up a user by exact email.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Look up a user by id.
    async fn find_user_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Persist a refresh token, replacing any existing record for the same
    /// `(user_id, device_id)`.
    async fn save_refresh_token(&self, token: &NewRefreshToken) -> AppResult<()>;

    /// Look up a refresh token record by its id.
    async fn find_refresh_token(&self, id: RefreshTokenId) -> AppResult<Option<RefreshTokenRecord>>;

    /// Replace the identity and value of the record currently identified by
    /// `old_id`, resetting its expiry to now + `ttl`.
    ///
    /// Returns `false` without writing if no record has `old_id` any more,
    /// which is how a concurrent rotation of the same token is detected.
    async fn rotate_refresh_token(
        &self,
        old_id: RefreshTokenId,
        new_id: RefreshTokenId,
        new_token_value: &str,
        ttl: Duration,
    ) -> AppResult<bool>;

    /// Delete the record for a device. Returns `true` if a row was removed.
    async fn delete_refresh_token(&self, user_id: UserId, device_id: &str) -> AppResult<bool>;

    /// Check backend connectivity.
    async fn health_check(&self) -> AppResult<bool>;
}
