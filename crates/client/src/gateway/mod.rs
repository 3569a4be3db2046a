//! Remote API gateway.
//!
//! # Architecture
//!
//! - One shared `reqwest::Client` with the configured timeout
//! - Bearer-token injection at a single choke point
//! - One canonical response [`Envelope`](envelope::Envelope) adapted at
//!   the boundary; callers only see decoded domain payloads
//! - In-memory caching via `moka` for read-mostly resources (5 minute TTL)
//!
//! # Error policy
//!
//! Every method returns `Result<T, ApiError>`. The gateway never
//! substitutes fabricated success data on failure - whether to degrade to
//! a cached or empty view is the caller's decision, not the data layer's.
//!
//! # Example
//!
//! ```rust,ignore
//! use gursha_client::{ApiGateway, ClientConfig};
//!
//! let gateway = ApiGateway::new(&ClientConfig::from_env()?);
//!
//! let restaurants = gateway.list_restaurants().await?;
//! let menu = gateway.menu(&restaurants[0].id).await?;
//! ```

mod addresses;
mod analytics;
mod auth;
mod cache;
mod envelope;
mod orders;
mod payments;
mod recipes;
mod restaurants;

pub use auth::{AuthSession, RegisterInput};
pub use envelope::Envelope;
pub use orders::{PlaceOrderLine, PlaceOrderRequest, StatusUpdate};
pub use payments::PaymentMethodInput;
pub use recipes::{LikeState, SaveState};

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::ClientConfig;
use cache::CacheValue;
use envelope::Envelope as ResponseEnvelope;

const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes
const LOG_BODY_LIMIT: usize = 500;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connectivity failure before a response arrived.
    #[error("network error: {0}")]
    Network(reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http {
        status: u16,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend rejected the bearer token (401).
    #[error("unauthorized")]
    Unauthorized,

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend acknowledged a login without issuing a token.
    ///
    /// Accepting such a session would make every later authenticated call
    /// fail, so the gateway rejects it outright.
    #[error("login response carried no session token")]
    MissingToken,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }
}

// =============================================================================
// ApiGateway
// =============================================================================

/// The shared HTTP client through which all backend calls are issued.
///
/// Cheap to clone; every store holds its own handle.
#[derive(Clone)]
pub struct ApiGateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    client: reqwest::Client,
    base_url: String,
    token: RwLock<Option<SecretString>>,
    cache: moka::future::Cache<String, CacheValue>,
    log_requests: bool,
    analytics_key: Option<SecretString>,
}

impl ApiGateway {
    /// Create a new gateway from the client configuration.
    ///
    /// # Panics
    ///
    /// Panics only if the TLS backend cannot be initialized, which is a
    /// build misconfiguration rather than a runtime condition.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let cache = moka::future::Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(GatewayInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                token: RwLock::new(None),
                cache,
                log_requests: config.log_requests,
                analytics_key: config.analytics_key.clone(),
            }),
        }
    }

    /// Install the bearer token used for authenticated calls.
    pub fn set_token(&self, token: SecretString) {
        if let Ok(mut guard) = self.inner.token.write() {
            *guard = Some(token);
        }
    }

    /// Drop the bearer token (logout).
    pub fn clear_token(&self) {
        if let Ok(mut guard) = self.inner.token.write() {
            *guard = None;
        }
    }

    /// Whether a bearer token is currently installed.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner
            .token
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    fn bearer(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|t| t.expose_secret().to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// Execute one request and decode the canonical envelope.
    async fn execute<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ResponseEnvelope<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);

        let mut request = self.inner.client.request(method.clone(), &url);
        if let Some(token) = self.bearer() {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        if let Some(body) = body {
            if self.inner.log_requests {
                let rendered = serde_json::to_string(body).unwrap_or_default();
                debug!(
                    %method,
                    %url,
                    body = %rendered.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                    "API request"
                );
            }
            request = request.json(body);
        } else if self.inner.log_requests {
            debug!(%method, %url, "API request");
        }

        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if self.inner.log_requests {
            debug!(
                status = %status,
                body = %response_text.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                "API response"
            );
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: response_text.chars().take(LOG_BODY_LIMIT).collect(),
            });
        }

        let envelope: ResponseEnvelope<T> = serde_json::from_str(&response_text)?;
        Ok(envelope)
    }

    // Convenience wrappers; most call sites only want the data payload.

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let envelope = self
            .execute::<(), T>(Method::GET, path, None)
            .await?;
        Ok(envelope.data)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let envelope = self.execute::<B, T>(Method::POST, path, Some(body)).await?;
        Ok(envelope.data)
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let envelope = self
            .execute::<(), T>(Method::POST, path, None)
            .await?;
        Ok(envelope.data)
    }

    async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let envelope = self.execute::<B, T>(Method::PUT, path, Some(body)).await?;
        Ok(envelope.data)
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute::<(), Option<serde_json::Value>>(Method::DELETE, path, None)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached read-mostly data. Cached entries carry
    /// viewer-scoped fields (recipe liked/saved), so they cannot outlive
    /// the session.
    pub(crate) async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    pub(crate) async fn cache_get(&self, key: &str) -> Option<CacheValue> {
        self.inner.cache.get(key).await
    }

    pub(crate) async fn cache_put(&self, key: String, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }

    pub(crate) async fn cache_invalidate(&self, key: &str) {
        self.inner.cache.invalidate(key).await;
    }

    pub(crate) fn analytics_key(&self) -> Option<&SecretString> {
        self.inner.analytics_key.as_ref()
    }
}
