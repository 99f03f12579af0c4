//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use account_core::UserId;

/// A registered account.
///
/// Created once at registration and never modified by the service.
#[derive(Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Server-assigned identifier.
    pub id: UserId,
    /// Login email, unique and compared exactly as stored.
    pub email: String,
    /// Argon2id PHC hash string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
