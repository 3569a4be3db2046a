//! Auth/session store.
//!
//! Holds the current user, keeps the bearer token installed on the
//! gateway, and persists the session to secure storage. The invariant
//! this store exists to protect: the token in memory and the token in
//! storage never disagree. Storage is written before memory is updated,
//! and a half-written pair is rolled back.

use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::gateway::{ApiError, ApiGateway, RegisterInput};
use crate::models::{Credentials, ProfileUpdate, User};
use crate::storage::session::{self, keys};
use crate::storage::{SecureStorage, StorageError};

/// Errors from auth operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The auth/session store.
pub struct AuthStore<S> {
    gateway: ApiGateway,
    storage: S,
    user: Option<User>,
    is_loading: bool,
    error: Option<String>,
}

impl<S: SecureStorage> AuthStore<S> {
    /// Create a signed-out store.
    pub fn new(gateway: ApiGateway, storage: S) -> Self {
        Self {
            gateway,
            storage,
            user: None,
            is_loading: false,
            error: None,
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether a session is active.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Whether a login/initialize call is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The last auth failure, for inline display.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Rehydrate a persisted session. Run once at process start, before
    /// anything reads [`is_authenticated`](Self::is_authenticated) - the
    /// first paint relies on this having settled.
    ///
    /// A missing or stale blob is not an error; it just means signed-out.
    ///
    /// # Errors
    ///
    /// Returns an error only if storage itself is unreadable.
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) -> Result<(), AuthError> {
        let token = self.storage.get(keys::USER_TOKEN).await?;
        let blob = self.storage.get(keys::USER_INFO).await?;

        match (token, blob.as_deref().and_then(session::decode_user)) {
            (Some(token), Some(user)) => {
                self.gateway.set_token(token.into());
                self.user = Some(user);
            }
            (token, user) => {
                // Half a session (or a stale blob) is worthless; drop the
                // leftovers so storage and memory agree on "signed out".
                if token.is_some() || user.is_some() {
                    warn!("Discarding incomplete persisted session");
                }
                self.storage.clear().await?;
            }
        }
        Ok(())
    }

    /// Log in. Confirmed policy: nothing is persisted or kept in memory
    /// until the backend has issued both the user and the token.
    ///
    /// # Errors
    ///
    /// On failure the error is also recorded for inline display and the
    /// store stays unauthenticated.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&mut self, credentials: &Credentials) -> Result<&User, AuthError> {
        self.is_loading = true;
        let result = self.gateway.login(credentials).await;
        self.is_loading = false;

        match result {
            Ok(auth) => {
                self.error = None;
                Ok(self
                    .install_session(auth.user, auth.token.expose_secret())
                    .await?)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Register a new account; on success the session is installed the
    /// same way as after a login.
    ///
    /// # Errors
    ///
    /// Same failure handling as [`login`](Self::login).
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&mut self, input: &RegisterInput) -> Result<&User, AuthError> {
        self.is_loading = true;
        let result = self.gateway.register(input).await;
        self.is_loading = false;

        match result {
            Ok(auth) => {
                self.error = None;
                Ok(self
                    .install_session(auth.user, auth.token.expose_secret())
                    .await?)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Sign out: reset state, drop cached reads, and clear storage.
    /// Completes locally with no network round-trip.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be cleared; in-memory state is
    /// reset regardless.
    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> Result<(), AuthError> {
        self.gateway.clear_token();
        self.gateway.invalidate_all().await;
        self.user = None;
        self.error = None;
        self.storage.clear().await?;
        Ok(())
    }

    /// Update the profile. Confirmed policy: the gateway is called first
    /// and only server-confirmed fields land in local state; an
    /// unconfirmed local mutation never appears committed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; local state is untouched.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<&User, AuthError> {
        let user = self.gateway.update_profile(update).await?;
        self.storage
            .put(keys::USER_INFO, &session::encode_user(&user)?)
            .await?;
        Ok(self.user.insert(user))
    }

    /// Submit the SMS OTP code; applies the server-confirmed user.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is rejected or the request fails.
    #[instrument(skip(self, code))]
    pub async fn verify_phone(&mut self, code: &str) -> Result<&User, AuthError> {
        let user = self.gateway.verify_phone(code).await?;
        self.storage
            .put(keys::USER_INFO, &session::encode_user(&user)?)
            .await?;
        Ok(self.user.insert(user))
    }

    /// Persist then install a confirmed session, returning the installed
    /// user. If the second storage write fails the first is rolled back so
    /// the pair stays consistent.
    async fn install_session(&mut self, user: User, token: &str) -> Result<&User, StorageError> {
        self.storage.put(keys::USER_TOKEN, token).await?;
        if let Err(e) = self
            .storage
            .put(keys::USER_INFO, &session::encode_user(&user)?)
            .await
        {
            let _ = self.storage.delete(keys::USER_TOKEN).await;
            return Err(e);
        }
        self.gateway.set_token(token.into());
        Ok(self.user.insert(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::storage::MemoryStorage;
    use chrono::Utc;
    use gursha_core::{UserId, UserRole};

    fn store() -> AuthStore<MemoryStorage> {
        let config = ClientConfig::for_base_url("http://localhost:1/api/v1").unwrap();
        AuthStore::new(ApiGateway::new(&config), MemoryStorage::new())
    }

    fn user() -> User {
        User {
            id: UserId::new("u1"),
            name: "Sara Tesfaye".to_string(),
            email: "sara@example.com".to_string(),
            phone: "+251911000111".to_string(),
            role: UserRole::Customer,
            phone_verified: false,
            created_at: Utc::now(),
        }
    }

    /// Storage that accepts the token write but fails the user blob, the
    /// half-written-pair case.
    struct UserBlobRejectingStorage {
        inner: MemoryStorage,
    }

    impl SecureStorage for UserBlobRejectingStorage {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key).await
        }

        async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == keys::USER_INFO {
                return Err(StorageError::Unavailable);
            }
            self.inner.put(key, value).await
        }

        async fn delete(&self, key: &str) -> Result<(), StorageError> {
            self.inner.delete(key).await
        }

        async fn clear(&self) -> Result<(), StorageError> {
            self.inner.clear().await
        }
    }

    #[tokio::test]
    async fn test_fresh_process_is_signed_out() {
        let mut store = store();
        store.initialize().await.unwrap();
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
    }

    #[tokio::test]
    async fn test_logout_then_initialize_is_signed_out() {
        let mut store = store();
        store.logout().await.unwrap();
        store.initialize().await.unwrap();
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert!(!store.gateway.has_token());
    }

    #[tokio::test]
    async fn test_failed_user_write_rolls_back_token() {
        let config = ClientConfig::for_base_url("http://localhost:1/api/v1").unwrap();
        let mut store = AuthStore::new(
            ApiGateway::new(&config),
            UserBlobRejectingStorage {
                inner: MemoryStorage::new(),
            },
        );

        let result = store.install_session(user(), "tok_1").await;
        assert!(matches!(result, Err(StorageError::Unavailable)));

        // The pair is all-or-nothing: the token write is undone, nothing
        // reaches memory or the gateway.
        assert_eq!(store.storage.get(keys::USER_TOKEN).await.unwrap(), None);
        assert!(!store.is_authenticated());
        assert!(!store.gateway.has_token());
    }

    #[tokio::test]
    async fn test_initialize_discards_half_session() {
        let mut store = store();
        // Token with no user blob: the pair is dropped entirely.
        store.storage.put(keys::USER_TOKEN, "tok_1").await.unwrap();
        store.initialize().await.unwrap();
        assert!(!store.is_authenticated());
        assert_eq!(store.storage.get(keys::USER_TOKEN).await.unwrap(), None);
    }
}
