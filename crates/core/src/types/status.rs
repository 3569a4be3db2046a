//! Status, role, and label enums, plus the order lifecycle rules.
//!
//! The order lifecycle is a strict total order with a single escape to
//! cancellation. All status changes anywhere in the client go through
//! [`OrderStatus::transition_to`] (or its `advance`/`cancel` shorthands),
//! regardless of whether the trigger was a backend event or a simulated
//! timer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delivery order status.
///
/// Linear lifecycle: `Pending → Confirmed → Preparing → OutForDelivery →
/// Delivered`, with `Cancelled` reachable only from the first three states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

/// A rejected order status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The order already reached a terminal state.
    #[error("order is {0} and cannot change status")]
    Terminal(OrderStatus),

    /// The proposed change is not the single legal forward step and not a
    /// legal cancellation.
    #[error("illegal status transition from {from} to {to}")]
    Illegal {
        from: OrderStatus,
        to: OrderStatus,
    },
}

impl OrderStatus {
    /// The single legal forward step, or `None` for terminal states.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Preparing),
            Self::Preparing => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Whether no further status change is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Cancellation is only legal before the food leaves the restaurant.
    #[must_use]
    pub const fn can_cancel(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Preparing)
    }

    /// Apply the single legal forward step.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::Terminal` if the order is delivered or
    /// cancelled.
    pub fn advance(self) -> Result<Self, TransitionError> {
        self.next().ok_or(TransitionError::Terminal(self))
    }

    /// Move to `Cancelled`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the current status is pending, confirmed,
    /// or preparing.
    pub fn cancel(self) -> Result<Self, TransitionError> {
        if self.can_cancel() {
            Ok(Self::Cancelled)
        } else if self.is_terminal() {
            Err(TransitionError::Terminal(self))
        } else {
            Err(TransitionError::Illegal {
                from: self,
                to: Self::Cancelled,
            })
        }
    }

    /// Validate an arbitrary proposed status change.
    ///
    /// # Errors
    ///
    /// Returns an error for anything other than the single forward step or
    /// a legal cancellation.
    pub fn transition_to(self, to: Self) -> Result<Self, TransitionError> {
        if to == Self::Cancelled {
            return self.cancel();
        }
        if self.is_terminal() {
            return Err(TransitionError::Terminal(self));
        }
        if self.next() == Some(to) {
            Ok(to)
        } else {
            Err(TransitionError::Illegal { from: self, to })
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Preparing => write!(f, "preparing"),
            Self::OutForDelivery => write!(f, "out_for_delivery"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "preparing" => Ok(Self::Preparing),
            "out_for_delivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    Manager,
    Owner,
    Admin,
    Delivery,
}

/// Saved-address label. Anything other than home/work carries the user's
/// own free-text label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AddressLabel {
    Home,
    Work,
    Other(String),
}

impl From<String> for AddressLabel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "home" => Self::Home,
            "work" => Self::Work,
            _ => Self::Other(s),
        }
    }
}

impl From<AddressLabel> for String {
    fn from(label: AddressLabel) -> Self {
        match label {
            AddressLabel::Home => "home".to_string(),
            AddressLabel::Work => "work".to_string(),
            AddressLabel::Other(s) => s,
        }
    }
}

/// Payment instrument, discriminated by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentKind {
    /// A stored card; only the display fields ever reach the client.
    Card {
        brand: String,
        last4: String,
        expiry_month: u8,
        expiry_year: u16,
    },
    /// A mobile-money account (e.g., Telebirr, M-Pesa).
    MobileMoney { provider: String, phone: String },
}
