//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gursha_core::{UserId, UserRole};

/// The signed-in account.
///
/// Addresses and payment methods are owned by the profile store and
/// referenced by id only - the user object never carries a second copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address used for login.
    pub email: String,
    /// Phone number in E.164 form.
    pub phone: String,
    /// Account role.
    #[serde(default)]
    pub role: UserRole,
    /// Whether the phone number passed OTP verification.
    #[serde(default)]
    pub phone_verified: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Login credentials submitted by the sign-in form.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Partial profile update; only present fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
