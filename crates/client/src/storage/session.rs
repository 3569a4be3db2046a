//! Versioned persisted-session blob.
//!
//! The session survives app updates, so the persisted shape is versioned:
//! the current version deserializes directly, known older versions are
//! migrated field-by-field, and an unrecognized version is discarded with
//! a warning. A stale blob must never abort startup - the worst outcome
//! of a bad blob is signing the user out.
//!
//! Storage keys follow the device contract: the bearer token under
//! `userToken`, the user JSON under `userInfo`. The auth store treats the
//! pair as one unit - if either half is missing on load, both are
//! discarded.

use serde::{Deserialize, Serialize};
use tracing::warn;

use gursha_core::UserId;

use crate::models::User;

use super::StorageError;

/// Storage keys shared with the auth store.
pub mod keys {
    /// Bearer token.
    pub const USER_TOKEN: &str = "userToken";
    /// Serialized [`PersistedUser`] blob.
    pub const USER_INFO: &str = "userInfo";
}

/// Current persisted-user schema version.
pub const SCHEMA_VERSION: u32 = 2;

/// The versioned blob stored under [`keys::USER_INFO`].
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedUser {
    pub version: u32,
    pub user: User,
}

/// Version 1 stored the user fields inline, before roles and phone
/// verification existed.
#[derive(Debug, Deserialize)]
struct PersistedUserV1 {
    id: UserId,
    name: String,
    email: String,
    phone: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<PersistedUserV1> for User {
    fn from(v1: PersistedUserV1) -> Self {
        Self {
            id: v1.id,
            name: v1.name,
            email: v1.email,
            phone: v1.phone,
            role: gursha_core::UserRole::default(),
            phone_verified: false,
            created_at: v1.created_at,
        }
    }
}

/// Serialize a user at the current schema version.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_user(user: &User) -> Result<String, StorageError> {
    let blob = PersistedUser {
        version: SCHEMA_VERSION,
        user: user.clone(),
    };
    Ok(serde_json::to_string(&blob)?)
}

/// Deserialize a persisted user, migrating older schema versions.
///
/// Returns `None` (never an error) for unparseable blobs or unknown
/// versions; callers treat that as "no persisted session".
#[must_use]
pub fn decode_user(raw: &str) -> Option<User> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Discarding unparseable persisted session");
            return None;
        }
    };

    // Blobs written before versioning carry no version field; treat them
    // as version 1.
    let version = value
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(1);

    match version {
        1 => match serde_json::from_value::<PersistedUserV1>(value) {
            Ok(v1) => Some(v1.into()),
            Err(e) => {
                warn!(error = %e, "Discarding unmigratable v1 session");
                None
            }
        },
        v if v == u64::from(SCHEMA_VERSION) => {
            match serde_json::from_value::<PersistedUser>(value) {
                Ok(blob) => Some(blob.user),
                Err(e) => {
                    warn!(error = %e, "Discarding corrupt persisted session");
                    None
                }
            }
        }
        other => {
            warn!(version = other, "Discarding persisted session with unknown schema version");
            None
        }
    }
}
