//! Command implementations, sharing one gateway/session context.

pub mod auth;
pub mod browse;
pub mod cart;
pub mod orders;

use std::path::PathBuf;

use thiserror::Error;

use gursha_client::config::ConfigError;
use gursha_client::storage::FileStorage;
use gursha_client::stores::{AuthError, AuthStore, CartError, OrderError};
use gursha_client::{ApiError, ApiGateway, ClientConfig};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Cart(#[from] CartError),

    /// The command needs a session and none is persisted.
    #[error("not signed in; run `gursha login` first")]
    NotSignedIn,

    /// An `--item` argument that is not `<menu-item-id>:<quantity>`.
    #[error("invalid item `{0}`; expected <menu-item-id>:<quantity>")]
    BadItemSpec(String),

    /// The requested item is not on the restaurant's menu.
    #[error("menu item {0} is not on this menu")]
    UnknownMenuItem(String),

    /// A tip amount that is not a non-negative decimal.
    #[error("invalid tip amount `{0}`")]
    BadTip(String),
}

/// Shared command context: the gateway plus the session rehydrated from
/// the on-disk store, exactly as an app process start would do it.
pub struct Context {
    pub gateway: ApiGateway,
    pub auth: AuthStore<FileStorage>,
}

impl Context {
    /// Build the context from the environment and persisted session.
    pub async fn load() -> Result<Self, CliError> {
        dotenvy::dotenv().ok();
        let config = ClientConfig::from_env()?;
        let gateway = ApiGateway::new(&config);
        let mut auth = AuthStore::new(gateway.clone(), FileStorage::new(session_path()));
        auth.initialize().await?;
        Ok(Self { gateway, auth })
    }

    /// Fail early for commands that need an authenticated session.
    pub fn require_session(&self) -> Result<(), CliError> {
        if self.auth.is_authenticated() {
            Ok(())
        } else {
            Err(CliError::NotSignedIn)
        }
    }
}

fn session_path() -> PathBuf {
    if let Some(path) = std::env::var_os("GURSHA_SESSION_FILE") {
        return PathBuf::from(path);
    }
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(".gursha/session.json"),
        |home| PathBuf::from(home).join(".gursha").join("session.json"),
    )
}
