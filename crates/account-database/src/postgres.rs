//! PostgreSQL-backed credential store.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;

use account_core::error::{AppError, ErrorKind};
use account_core::{AppResult, RefreshTokenId, UserId};
use account_entity::{NewRefreshToken, RefreshTokenRecord, User};

use crate::repositories::{RefreshTokenRepository, UserRepository};
use crate::store::CredentialStore;

/// [`CredentialStore`] over the `users` and `refresh_tokens` tables.
#[derive(Debug, Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
    users: UserRepository,
    refresh_tokens: RefreshTokenRepository,
}

impl PostgresCredentialStore {
    /// Build a store sharing `pool` between both repositories.
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            refresh_tokens: RefreshTokenRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> AppResult<User> {
        self.users.create(email, password_hash).await
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.users.find_by_email(email).await
    }

    async fn find_user_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn save_refresh_token(&self, token: &NewRefreshToken) -> AppResult<()> {
        self.refresh_tokens.upsert(token).await
    }

    async fn find_refresh_token(&self, id: RefreshTokenId) -> AppResult<Option<RefreshTokenRecord>> {
        self.refresh_tokens.find_by_id(id).await
    }

    async fn rotate_refresh_token(
        &self,
        old_id: RefreshTokenId,
        new_id: RefreshTokenId,
        new_token_value: &str,
        ttl: Duration,
    ) -> AppResult<bool> {
        self.refresh_tokens
            .rotate(old_id, new_id, new_token_value, Utc::now() + ttl)
            .await
    }

    async fn delete_refresh_token(&self, user_id: UserId, device_id: &str) -> AppResult<bool> {
        self.refresh_tokens.delete_by_device(user_id, device_id).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Health check failed", e))
    }
}
