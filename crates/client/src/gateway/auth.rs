//! Auth endpoints.

use reqwest::Method;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::models::{Credentials, ProfileUpdate, User};

use super::{ApiError, ApiGateway};

/// A confirmed session: the user plus the token that authenticates them.
///
/// Constructed only by the gateway, and only when the backend actually
/// issued a token - the two fields can never disagree.
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    pub token: SecretString,
}

/// Registration form payload.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct UserData {
    user: User,
}

impl ApiGateway {
    // =========================================================================
    // Auth Methods (never cached)
    // =========================================================================

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingToken` if the backend acknowledged the
    /// login without issuing a token; such a response is never accepted.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        let envelope = self
            .execute::<Credentials, UserData>(Method::POST, "auth/login", Some(credentials))
            .await?;

        let token = envelope.token.ok_or(ApiError::MissingToken)?;
        Ok(AuthSession {
            user: envelope.data.user,
            token: SecretString::from(token),
        })
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Same token policy as [`login`](Self::login).
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: &RegisterInput) -> Result<AuthSession, ApiError> {
        let envelope = self
            .execute::<RegisterInput, UserData>(Method::POST, "auth/register", Some(input))
            .await?;

        let token = envelope.token.ok_or(ApiError::MissingToken)?;
        Ok(AuthSession {
            user: envelope.data.user,
            token: SecretString::from(token),
        })
    }

    /// Update the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; no local state is touched
    /// here - callers apply the returned, server-confirmed user.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let data: UserData = self.put("users/me", update).await?;
        Ok(data.user)
    }

    /// Submit the SMS OTP code for phone verification.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is rejected or the request fails.
    #[instrument(skip(self, code))]
    pub async fn verify_phone(&self, code: &str) -> Result<User, ApiError> {
        let body = serde_json::json!({ "code": code });
        let data: UserData = self.post("auth/verify-phone", &body).await?;
        Ok(data.user)
    }
}
