//! Session service: registration, login, refresh-token rotation, logout.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use account_core::config::AuthConfig;
use account_core::error::{AppError, ErrorKind};
use account_core::{AppResult, UserId};
use account_database::CredentialStore;
use account_entity::{DeviceInfo, NewRefreshToken, TokenPair, User};

use crate::jwt::{IssuedRefreshToken, IssuedToken, TokenEngine, TokenError};
use crate::password::{PasswordHasher, PasswordValidator};

use super::cancel::cancellable;

/// Orchestrates the credential lifecycle over a [`CredentialStore`].
///
/// Holds no mutable state, so one instance serves every request
/// concurrently. All cryptography lives in [`TokenEngine`] and
/// [`PasswordHasher`]; all persistence lives in the store.
#[derive(Clone)]
pub struct SessionService {
    /// Durable users and refresh token records.
    store: Arc<dyn CredentialStore>,
    /// Token issuance and verification.
    tokens: TokenEngine,
    /// Argon2id hashing.
    hasher: PasswordHasher,
    /// Password length policy.
    validator: PasswordValidator,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("store", &self.store)
            .field("tokens", &self.tokens)
            .field("validator", &self.validator)
            .finish()
    }
}

impl SessionService {
    /// Creates a session service over `store` using the auth settings.
    pub fn new(store: Arc<dyn CredentialStore>, config: &AuthConfig) -> AppResult<Self> {
        Ok(Self {
            store,
            tokens: TokenEngine::new(config)?,
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(config),
        })
    }

    /// Registers a new account.
    ///
    /// Fails with `Validation` for an empty email or a password outside the
    /// length policy, and with `DuplicateEmail` if the email is taken.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> AppResult<User> {
        if email.is_empty() {
            return Err(AppError::validation("Email must not be empty"));
        }
        self.validator.validate(password)?;

        let password_hash = cancellable(cancel, self.hash(password)).await?;
        let user = cancellable(cancel, self.store.create_user(email, &password_hash)).await?;

        info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    /// Performs the login flow:
    ///
    /// 1. Look up the user by email
    /// 2. Verify the password (a dummy hash is checked for unknown emails)
    /// 3. Issue an access token and a refresh token
    /// 4. Store the refresh token, superseding any prior one for the device
    ///
    /// Unknown email, wrong password and a password over the length cap all
    /// fail with `InvalidCredentials`.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        device: DeviceInfo,
        cancel: &CancellationToken,
    ) -> AppResult<TokenPair> {
        if self.validator.exceeds_max(password) {
            debug!("Login rejected: password over length cap");
            return Err(AppError::invalid_credentials());
        }

        let user = cancellable(cancel, self.store.find_user_by_email(email)).await?;

        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = cancellable(cancel, self.verify(password, stored_hash)).await?;

        let user = match (user, verified) {
            (Some(user), true) => user,
            (Some(user), false) => {
                debug!(user_id = %user.id, "Login rejected: wrong password");
                return Err(AppError::invalid_credentials());
            }
            (None, _) => {
                debug!("Login rejected: unknown email");
                return Err(AppError::invalid_credentials());
            }
        };

        let access = self.issue_access(user.id)?;
        let refresh = self.issue_refresh()?;

        let record = NewRefreshToken {
            id: refresh.id,
            user_id: user.id,
            token_value: refresh.token.clone(),
            device,
            expires_at: refresh.expires_at,
        };
        cancellable(cancel, self.store.save_refresh_token(&record)).await?;

        info!(
            user_id = %user.id,
            device_id = %record.device.device_id,
            token_id = %refresh.id,
            "User logged in"
        );

        Ok(token_pair(access, refresh))
    }

    /// Exchanges a refresh token for a new token pair.
    ///
    /// The presented token must verify, match the stored value and device,
    /// and be unexpired. Rotation is a compare-and-swap on the token id, so
    /// a token is redeemable at most once even under concurrent requests.
    /// Every rejection is `InvalidRefreshToken`.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        device_id: &str,
        cancel: &CancellationToken,
    ) -> AppResult<TokenPair> {
        let token_id = self.tokens.parse_refresh(refresh_token).map_err(|_| {
            debug!("Refresh rejected: token failed verification");
            AppError::invalid_refresh_token()
        })?;

        let Some(record) = cancellable(cancel, self.store.find_refresh_token(token_id)).await?
        else {
            debug!(token_id = %token_id, "Refresh rejected: no stored record");
            return Err(AppError::invalid_refresh_token());
        };

        if !record.matches(refresh_token, device_id) {
            debug!(token_id = %token_id, "Refresh rejected: token or device mismatch");
            return Err(AppError::invalid_refresh_token());
        }
        if record.is_expired() {
            debug!(token_id = %token_id, "Refresh rejected: stored record expired");
            return Err(AppError::invalid_refresh_token());
        }

        let access = self.issue_access(record.user_id)?;
        let next = self.issue_refresh()?;

        let rotated = cancellable(
            cancel,
            self.store.rotate_refresh_token(
                token_id,
                next.id,
                &next.token,
                self.tokens.refresh_ttl(),
            ),
        )
        .await?;
        if !rotated {
            warn!(
                token_id = %token_id,
                user_id = %record.user_id,
                "Refresh rejected: token already rotated by a concurrent request"
            );
            return Err(AppError::invalid_refresh_token());
        }

        info!(
            user_id = %record.user_id,
            device_id = %record.device_id,
            old_token_id = %token_id,
            token_id = %next.id,
            "Rotated refresh token"
        );

        Ok(token_pair(access, next))
    }

    /// Ends the session on one device. Logging out twice is not an error.
    pub async fn logout(
        &self,
        user_id: UserId,
        device_id: &str,
        cancel: &CancellationToken,
    ) -> AppResult<()> {
        let removed =
            cancellable(cancel, self.store.delete_refresh_token(user_id, device_id)).await?;
        info!(user_id = %user_id, device_id = %device_id, removed, "User logged out");
        Ok(())
    }

    /// Looks up a user profile.
    pub async fn get_user_by_id(
        &self,
        user_id: UserId,
        cancel: &CancellationToken,
    ) -> AppResult<User> {
        cancellable(cancel, self.store.find_user_by_id(user_id))
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Verifies a bearer access token and returns its subject.
    ///
    /// Expiry is reported as `ExpiredAccessToken` so clients can refresh
    /// silently; every other failure is `InvalidAccessToken`.
    pub fn authenticate(&self, access_token: &str) -> AppResult<UserId> {
        self.tokens.parse_access(access_token).map_err(|e| match e {
            TokenError::Expired => AppError::expired_access_token(),
            _ => AppError::invalid_access_token(),
        })
    }

    /// Reports whether the credential store is reachable.
    pub async fn health(&self, cancel: &CancellationToken) -> AppResult<bool> {
        cancellable(cancel, self.store.health_check()).await
    }

    fn issue_access(&self, user_id: UserId) -> AppResult<IssuedToken> {
        self.tokens.generate_access(user_id).map_err(signing_failed)
    }

    fn issue_refresh(&self) -> AppResult<IssuedRefreshToken> {
        self.tokens.generate_refresh().map_err(signing_failed)
    }

    async fn hash(&self, password: &str) -> AppResult<String> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Password hashing task failed", e)
            })?
    }

    /// Verifies against `stored_hash`, or burns an equivalent verification
    /// when there is none. A corrupt stored hash counts as a mismatch.
    async fn verify(&self, password: &str, stored_hash: Option<String>) -> AppResult<bool> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        let outcome = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => hasher.verify_password(&password, &hash),
            None => {
                hasher.verify_dummy(&password);
                Ok(false)
            }
        })
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Password verification task failed", e)
        })?;

        match outcome {
            Ok(verified) => Ok(verified),
            Err(e) => {
                error!(error = %e, "Stored password hash could not be verified");
                Ok(false)
            }
        }
    }
}

fn signing_failed(err: TokenError) -> AppError {
    match err {
        TokenError::Signing(source) => {
            AppError::with_source(ErrorKind::Signing, "Failed to sign token", source)
        }
        other => AppError::signing(other.to_string()),
    }
}

fn token_pair(access: IssuedToken, refresh: IssuedRefreshToken) -> TokenPair {
    TokenPair {
        access_token: access.token,
        refresh_token: refresh.token,
        access_expires_at: access.expires_at,
        refresh_expires_at: refresh.expires_at,
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Duration;
    use tokio::sync::Barrier;

    use account_core::RefreshTokenId;
    use account_database::MemoryCredentialStore;
    use account_entity::RefreshTokenRecord;

    use super::*;

    /// Memory store in which every successful lookup is followed by another
    /// rotation of the same token before the caller can swap it.
    #[derive(Debug, Default)]
    struct RotatedBeforeSwap {
        inner: MemoryCredentialStore,
    }

    #[async_trait]
    impl CredentialStore for RotatedBeforeSwap {
        async fn create_user(&self, email: &str, password_hash: &str) -> AppResult<User> {
            self.inner.create_user(email, password_hash).await
        }

        async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
            self.inner.find_user_by_email(email).await
        }

        async fn find_user_by_id(&self, id: UserId) -> AppResult<Option<User>> {
            self.inner.find_user_by_id(id).await
        }

        async fn save_refresh_token(&self, token: &NewRefreshToken) -> AppResult<()> {
            self.inner.save_refresh_token(token).await
        }

        async fn find_refresh_token(
            &self,
            id: RefreshTokenId,
        ) -> AppResult<Option<RefreshTokenRecord>> {
            let found = self.inner.find_refresh_token(id).await?;
            if found.is_some() {
                let rotated = self
                    .inner
                    .rotate_refresh_token(
                        id,
                        RefreshTokenId::generate(),
                        "rotated-elsewhere",
                        Duration::hours(1),
                    )
                    .await?;
                assert!(rotated);
            }
            Ok(found)
        }

        async fn rotate_refresh_token(
            &self,
            old_id: RefreshTokenId,
            new_id: RefreshTokenId,
            new_token_value: &str,
            ttl: Duration,
        ) -> AppResult<bool> {
            self.inner
                .rotate_refresh_token(old_id, new_id, new_token_value, ttl)
                .await
        }

        async fn delete_refresh_token(&self, user_id: UserId, device_id: &str) -> AppResult<bool> {
            self.inner.delete_refresh_token(user_id, device_id).await
        }

        async fn health_check(&self) -> AppResult<bool> {
            self.inner.health_check().await
        }
    }

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".into(),
            ..AuthConfig::default()
        }
    }

    fn service() -> (SessionService, Arc<MemoryCredentialStore>) {
        let store = Arc::new(MemoryCredentialStore::new());
        let sessions = SessionService::new(store.clone(), &config()).unwrap();
        (sessions, store)
    }

    fn device(id: &str) -> DeviceInfo {
        DeviceInfo::new(id)
            .with_ip("203.0.113.7")
            .with_user_agent("test-agent/1.0")
    }

    #[tokio::test]
    async fn full_session_scenario() {
        let (sessions, _) = service();
        let cancel = CancellationToken::new();

        let user = sessions.register("a@x.com", "pw1", &cancel).await.unwrap();
        let dup = sessions.register("a@x.com", "pw1", &cancel).await.unwrap_err();
        assert_eq!(dup.kind, ErrorKind::DuplicateEmail);

        let t1 = sessions
            .login("a@x.com", "pw1", device("d1"), &cancel)
            .await
            .unwrap();
        assert_eq!(sessions.authenticate(&t1.access_token).unwrap(), user.id);

        let t2 = sessions.refresh(&t1.refresh_token, "d1", &cancel).await.unwrap();
        assert_ne!(t1.refresh_token, t2.refresh_token);
        assert_eq!(sessions.authenticate(&t2.access_token).unwrap(), user.id);

        let replay = sessions
            .refresh(&t1.refresh_token, "d1", &cancel)
            .await
            .unwrap_err();
        assert_eq!(replay.kind, ErrorKind::InvalidRefreshToken);

        let t3 = sessions
            .login("a@x.com", "pw1", device("d1"), &cancel)
            .await
            .unwrap();
        let superseded = sessions
            .refresh(&t2.refresh_token, "d1", &cancel)
            .await
            .unwrap_err();
        assert_eq!(superseded.kind, ErrorKind::InvalidRefreshToken);
        assert!(sessions.refresh(&t3.refresh_token, "d1", &cancel).await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_refresh_succeeds_once() {
        let (sessions, _) = service();
        let cancel = CancellationToken::new();
        sessions.register("c@x.com", "pw1", &cancel).await.unwrap();

        for _ in 0..10 {
            let pair = sessions
                .login("c@x.com", "pw1", device("d1"), &cancel)
                .await
                .unwrap();
            let start = Arc::new(Barrier::new(16));

            let handles: Vec<_> = (0..16)
                .map(|_| {
                    let sessions = sessions.clone();
                    let token = pair.refresh_token.clone();
                    let start = start.clone();
                    tokio::spawn(async move {
                        start.wait().await;
                        sessions
                            .refresh(&token, "d1", &CancellationToken::new())
                            .await
                    })
                })
                .collect();

            let mut successes = 0;
            for handle in handles {
                match handle.await.unwrap() {
                    Ok(_) => successes += 1,
                    Err(e) => assert_eq!(e.kind, ErrorKind::InvalidRefreshToken),
                }
            }
            assert_eq!(successes, 1);
        }
    }

    #[tokio::test]
    async fn refresh_losing_the_swap_is_rejected() {
        let store = Arc::new(RotatedBeforeSwap::default());
        let sessions = SessionService::new(store.clone(), &config()).unwrap();
        let cancel = CancellationToken::new();
        sessions.register("k@x.com", "pw1", &cancel).await.unwrap();
        let pair = sessions
            .login("k@x.com", "pw1", device("d1"), &cancel)
            .await
            .unwrap();

        let err = sessions
            .refresh(&pair.refresh_token, "d1", &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRefreshToken);
        assert_eq!(store.inner.refresh_token_count(), 1);
    }

    #[tokio::test]
    async fn login_rejects_oversized_password_as_bad_credentials() {
        let (sessions, store) = service();
        let cancel = CancellationToken::new();
        sessions.register("l@x.com", "pw1", &cancel).await.unwrap();

        let oversized = "x".repeat(config().password_max_length + 1);
        let err = sessions
            .login("l@x.com", &oversized, device("d1"), &cancel)
            .await
            .unwrap_err();
        let wrong = sessions
            .login("l@x.com", "wrong", device("d1"), &cancel)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidCredentials);
        assert_eq!(err.message, wrong.message);
        assert_eq!(store.refresh_token_count(), 0);
    }

    #[tokio::test]
    async fn refresh_is_bound_to_device() {
        let (sessions, _) = service();
        let cancel = CancellationToken::new();
        sessions.register("d@x.com", "pw1", &cancel).await.unwrap();
        let pair = sessions
            .login("d@x.com", "pw1", device("d1"), &cancel)
            .await
            .unwrap();

        let err = sessions
            .refresh(&pair.refresh_token, "d2", &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRefreshToken);

        // The mismatch did not consume the token.
        assert!(sessions.refresh(&pair.refresh_token, "d1", &cancel).await.is_ok());
    }

    #[tokio::test]
    async fn devices_hold_independent_sessions() {
        let (sessions, store) = service();
        let cancel = CancellationToken::new();
        sessions.register("e@x.com", "pw1", &cancel).await.unwrap();
        let phone = sessions
            .login("e@x.com", "pw1", device("phone"), &cancel)
            .await
            .unwrap();
        let laptop = sessions
            .login("e@x.com", "pw1", device("laptop"), &cancel)
            .await
            .unwrap();
        assert_eq!(store.refresh_token_count(), 2);

        assert!(sessions.refresh(&phone.refresh_token, "phone", &cancel).await.is_ok());
        assert!(sessions.refresh(&laptop.refresh_token, "laptop", &cancel).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_look_the_same() {
        let (sessions, _) = service();
        let cancel = CancellationToken::new();
        sessions.register("f@x.com", "pw1", &cancel).await.unwrap();

        let unknown = sessions
            .login("nobody@x.com", "pw1", device("d1"), &cancel)
            .await
            .unwrap_err();
        let wrong = sessions
            .login("f@x.com", "wrong", device("d1"), &cancel)
            .await
            .unwrap_err();

        assert_eq!(unknown.kind, ErrorKind::InvalidCredentials);
        assert_eq!(wrong.kind, unknown.kind);
        assert_eq!(wrong.message, unknown.message);
    }

    #[tokio::test]
    async fn logout_is_idempotent_and_revokes_refresh() {
        let (sessions, _) = service();
        let cancel = CancellationToken::new();
        let user = sessions.register("g@x.com", "pw1", &cancel).await.unwrap();
        let pair = sessions
            .login("g@x.com", "pw1", device("d1"), &cancel)
            .await
            .unwrap();

        sessions.logout(user.id, "d1", &cancel).await.unwrap();
        sessions.logout(user.id, "d1", &cancel).await.unwrap();

        let err = sessions
            .refresh(&pair.refresh_token, "d1", &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRefreshToken);
    }

    #[tokio::test]
    async fn garbage_tokens_are_rejected() {
        let (sessions, _) = service();
        let cancel = CancellationToken::new();

        let refresh = sessions.refresh("garbage", "d1", &cancel).await.unwrap_err();
        assert_eq!(refresh.kind, ErrorKind::InvalidRefreshToken);
        let access = sessions.authenticate("garbage").unwrap_err();
        assert_eq!(access.kind, ErrorKind::InvalidAccessToken);
    }

    #[tokio::test]
    async fn profile_lookup() {
        let (sessions, _) = service();
        let cancel = CancellationToken::new();
        let user = sessions.register("h@x.com", "pw1", &cancel).await.unwrap();

        let found = sessions.get_user_by_id(user.id, &cancel).await.unwrap();
        assert_eq!(found.email, "h@x.com");
        let missing = sessions
            .get_user_by_id(UserId(9_999), &cancel)
            .await
            .unwrap_err();
        assert_eq!(missing.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn register_enforces_password_policy() {
        let (sessions, _) = service();
        let cancel = CancellationToken::new();

        let short = sessions.register("i@x.com", "pw", &cancel).await.unwrap_err();
        assert_eq!(short.kind, ErrorKind::Validation);
        let empty = sessions.register("", "pw1", &cancel).await.unwrap_err();
        assert_eq!(empty.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn cancelled_operations_leave_no_state() {
        let (sessions, store) = service();
        let live = CancellationToken::new();
        let cancelled = CancellationToken::new();
        cancelled.cancel();

        let err = sessions
            .register("j@x.com", "pw1", &cancelled)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
        assert!(store.find_user_by_email("j@x.com").await.unwrap().is_none());

        sessions.register("j@x.com", "pw1", &live).await.unwrap();
        let err = sessions
            .login("j@x.com", "pw1", device("d1"), &cancelled)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
        assert_eq!(store.refresh_token_count(), 0);
    }

    #[tokio::test]
    async fn health_reports_store_status() {
        let (sessions, _) = service();
        assert!(sessions.health(&CancellationToken::new()).await.unwrap());
    }
}
