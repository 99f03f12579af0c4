//! Refresh token repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use account_core::error::{AppError, ErrorKind};
use account_core::{AppResult, RefreshTokenId, UserId};
use account_entity::{NewRefreshToken, RefreshTokenRecord};

/// Repository for the `refresh_tokens` table.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    /// Create a new refresh token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a token, superseding the existing row for the same device.
    pub async fn upsert(&self, token: &NewRefreshToken) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO refresh_tokens \
                 (id, user_id, token_value, device_id, ip, user_agent, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW(), $7) \
             ON CONFLICT (user_id, device_id) DO UPDATE SET \
                 id = EXCLUDED.id, \
                 token_value = EXCLUDED.token_value, \
                 ip = EXCLUDED.ip, \
                 user_agent = EXCLUDED.user_agent, \
                 created_at = EXCLUDED.created_at, \
                 expires_at = EXCLUDED.expires_at",
        )
        .bind(token.id)
        .bind(token.user_id)
        .bind(&token.token_value)
        .bind(&token.device.device_id)
        .bind(&token.device.ip)
        .bind(&token.device.user_agent)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to save refresh token", e))?;
        Ok(())
    }

    /// Find a record by token id.
    pub async fn find_by_id(&self, id: RefreshTokenId) -> AppResult<Option<RefreshTokenRecord>> {
        sqlx::query_as::<_, RefreshTokenRecord>(
            "SELECT id, user_id, token_value, device_id, ip, user_agent, created_at, expires_at \
             FROM refresh_tokens WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to find refresh token", e))
    }

    /// Swap the id and value of the row still identified by `old_id`.
    ///
    /// The `WHERE id = $old` predicate makes this a compare-and-swap: once
    /// one caller has rotated the row, every other caller holding the same
    /// `old_id` updates zero rows.
    pub async fn rotate(
        &self,
        old_id: RefreshTokenId,
        new_id: RefreshTokenId,
        new_token_value: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET id = $1, token_value = $2, expires_at = $3 WHERE id = $4",
        )
        .bind(new_id)
        .bind(new_token_value)
        .bind(expires_at)
        .bind(old_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to rotate refresh token", e)
        })?;
        Ok(result.rows_affected() == 1)
    }

    /// Delete the record for a device.
    pub async fn delete_by_device(&self, user_id: UserId, device_id: &str) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1 AND device_id = $2")
                .bind(user_id)
                .bind(device_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Failed to delete refresh token", e)
                })?;
        Ok(result.rows_affected() > 0)
    }
}
