//! Session commands: login, logout, whoami.

use gursha_client::models::Credentials;

use super::{CliError, Context};

/// Sign in and persist the session for later commands.
pub async fn login(email: &str, password: &str) -> Result<(), CliError> {
    let mut context = Context::load().await?;

    let user = context
        .auth
        .login(&Credentials {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await?;

    tracing::info!("Signed in as {} <{}>", user.name, user.email);
    if !user.phone_verified {
        tracing::warn!("Phone number {} is not verified yet", user.phone);
    }
    Ok(())
}

/// Sign out and clear the persisted session.
pub async fn logout() -> Result<(), CliError> {
    let mut context = Context::load().await?;
    context.auth.logout().await?;
    tracing::info!("Signed out");
    Ok(())
}

/// Show the signed-in user from the persisted session.
pub async fn whoami() -> Result<(), CliError> {
    let context = Context::load().await?;
    match context.auth.user() {
        Some(user) => {
            tracing::info!(
                "{} <{}> ({:?}, phone {})",
                user.name,
                user.email,
                user.role,
                if user.phone_verified {
                    "verified"
                } else {
                    "unverified"
                }
            );
            Ok(())
        }
        None => Err(CliError::NotSignedIn),
    }
}
