//! Saved addresses and payment methods.
//!
//! Both entity types carry the same `is_default` invariant: at most one
//! entry per user is the default, and the profile store is the only code
//! allowed to flip the flag.

use serde::{Deserialize, Serialize};

use gursha_core::{AddressId, AddressLabel, GeoPoint, PaymentKind, PaymentMethodId};

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Unique address ID.
    pub id: AddressId,
    /// Home/work or a free-text custom label.
    pub label: AddressLabel,
    /// Free-text street or building description.
    pub line: String,
    /// Sub-city / district.
    pub district: String,
    /// City.
    pub city: String,
    /// Optional free-text landmark ("behind Edna Mall").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    /// Optional geocoordinates from the map picker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Whether this is the user's default delivery address.
    #[serde(default)]
    pub is_default: bool,
}

/// Fields for creating or editing an address; the backend assigns the id.
#[derive(Debug, Clone, Serialize)]
pub struct AddressInput {
    pub label: AddressLabel,
    pub line: String,
    pub district: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub is_default: bool,
}

/// A stored payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Unique payment method ID.
    pub id: PaymentMethodId,
    /// Card or mobile-money details.
    #[serde(flatten)]
    pub kind: PaymentKind,
    /// Whether this is the user's default payment method.
    #[serde(default)]
    pub is_default: bool,
}
