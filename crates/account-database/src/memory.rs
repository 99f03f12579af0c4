//! In-memory credential store using dashmap.
//!
//! Suitable for tests and single-node development. Users are keyed by
//! email so duplicate detection is a single entry operation; refresh tokens
//! are keyed by `(user_id, device_id)` so the one-token-per-device rule is
//! enforced by the map itself.
//!
//! Lookups by user id and by refresh token id scan the map, so they are
//! O(n) in the number of users or live sessions. That is fine for the data
//! sizes of tests and local development; use the Postgres store elsewhere.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use account_core::error::AppError;
use account_core::{AppResult, RefreshTokenId, UserId};
use account_entity::{NewRefreshToken, RefreshTokenRecord, User};

use crate::store::CredentialStore;

type DeviceKey = (UserId, String);

/// Process-local [`CredentialStore`].
#[derive(Debug)]
pub struct MemoryCredentialStore {
    users: DashMap<String, User>,
    next_user_id: AtomicI64,
    refresh_tokens: DashMap<DeviceKey, RefreshTokenRecord>,
}

impl MemoryCredentialStore {
    /// Create an empty store. User ids start at 1.
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            next_user_id: AtomicI64::new(1),
            refresh_tokens: DashMap::new(),
        }
    }

    /// Number of live refresh token records.
    pub fn refresh_token_count(&self) -> usize {
        self.refresh_tokens.len()
    }

    fn device_key_of(&self, id: RefreshTokenId) -> Option<DeviceKey> {
        self.refresh_tokens
            .iter()
            .find(|entry| entry.value().id == id)
            .map(|entry| entry.key().clone())
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> AppResult<User> {
        match self.users.entry(email.to_string()) {
            Entry::Occupied(_) => Err(AppError::duplicate_email()),
            Entry::Vacant(slot) => {
                let user = User {
                    id: UserId(self.next_user_id.fetch_add(1, Ordering::SeqCst)),
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                    created_at: Utc::now(),
                };
                slot.insert(user.clone());
                debug!(user_id = %user.id, "Stored user in memory");
                Ok(user)
            }
        }
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.get(email).map(|u| u.value().clone()))
    }

    async fn find_user_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.value().id == id)
            .map(|entry| entry.value().clone()))
    }

    async fn save_refresh_token(&self, token: &NewRefreshToken) -> AppResult<()> {
        let key = (token.user_id, token.device.device_id.clone());
        self.refresh_tokens
            .insert(key, token.clone().into_record(Utc::now()));
        Ok(())
    }

    async fn find_refresh_token(&self, id: RefreshTokenId) -> AppResult<Option<RefreshTokenRecord>> {
        Ok(self
            .refresh_tokens
            .iter()
            .find(|entry| entry.value().id == id)
            .map(|entry| entry.value().clone()))
    }

    async fn rotate_refresh_token(
        &self,
        old_id: RefreshTokenId,
        new_id: RefreshTokenId,
        new_token_value: &str,
        ttl: Duration,
    ) -> AppResult<bool> {
        let Some(key) = self.device_key_of(old_id) else {
            return Ok(false);
        };
        let Some(mut record) = self.refresh_tokens.get_mut(&key) else {
            return Ok(false);
        };
        // Re-check under the entry lock: another rotation may have won.
        if record.id != old_id {
            return Ok(false);
        }
        record.id = new_id;
        record.token_value = new_token_value.to_string();
        record.expires_at = Utc::now() + ttl;
        Ok(true)
    }

    async fn delete_refresh_token(&self, user_id: UserId, device_id: &str) -> AppResult<bool> {
        Ok(self
            .refresh_tokens
            .remove(&(user_id, device_id.to_string()))
            .is_some())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
