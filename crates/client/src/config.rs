//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `GURSHA_ENV` - `development`, `staging`, or `production` (default: development)
//! - `GURSHA_API_URL` - Override the per-environment backend base URL
//! - `GURSHA_TIMEOUT_SECS` - Request timeout in seconds (default: 15)
//! - `GURSHA_LOG_REQUESTS` - Log request/response bodies at debug level
//!   (default: on in development, off elsewhere)
//! - `GURSHA_ANALYTICS_KEY` - Write key for the analytics endpoint

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which backend the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Default backend base URL for this environment.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Development => "http://localhost:8080/api/v1",
            Self::Staging => "https://staging.api.gursha.app/api/v1",
            Self::Production => "https://api.gursha.app/api/v1",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!("invalid environment: {s}")),
        }
    }
}

/// Client application configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ClientConfig {
    /// Which backend environment this build targets.
    pub environment: Environment,
    /// Backend base URL (resolved from the environment unless overridden).
    pub base_url: Url,
    /// Fixed timeout applied to every gateway request.
    pub timeout: Duration,
    /// Log request/response bodies at debug level.
    pub log_requests: bool,
    /// Analytics write key, if event tracking is enabled.
    pub analytics_key: Option<SecretString>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("log_requests", &self.log_requests)
            .field(
                "analytics_key",
                &self.analytics_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = get_env_or_default("GURSHA_ENV", "development")
            .parse::<Environment>()
            .map_err(|e| ConfigError::InvalidEnvVar("GURSHA_ENV".to_string(), e))?;

        let base_url_raw = get_optional_env("GURSHA_API_URL")
            .unwrap_or_else(|| environment.default_base_url().to_string());
        let base_url = Url::parse(&base_url_raw)
            .map_err(|e| ConfigError::InvalidEnvVar("GURSHA_API_URL".to_string(), e.to_string()))?;

        let timeout_secs = get_env_or_default("GURSHA_TIMEOUT_SECS", "15")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GURSHA_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let log_requests = match get_optional_env("GURSHA_LOG_REQUESTS") {
            Some(v) => v == "1" || v.eq_ignore_ascii_case("true"),
            None => environment == Environment::Development,
        };

        let analytics_key = get_optional_env("GURSHA_ANALYTICS_KEY").map(SecretString::from);

        Ok(Self {
            environment,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            log_requests,
            analytics_key,
        })
    }

    /// Configuration for a given base URL with defaults everywhere else.
    ///
    /// Used by tests and the CLI to point the gateway at a specific server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("base_url".to_string(), e.to_string()))?;
        Ok(Self {
            environment: Environment::Development,
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_requests: false,
            analytics_key: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
