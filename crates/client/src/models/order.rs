//! Cart and order types.
//!
//! A [`CartItem`] is mutable working state owned by the cart store. An
//! [`Order`] is an immutable snapshot produced at checkout: its lines
//! never change when the cart that produced them is mutated later, and
//! its monetary fields come from the backend response verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gursha_core::{
    AddressId, DriverId, Money, OrderId, OrderStatus, PaymentMethodId, RestaurantId,
};

use super::MenuItem;

/// One line in the working cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Client-generated line id; stable across quantity edits.
    pub id: Uuid,
    /// Snapshot of the menu item at the time it was added.
    pub menu_item: MenuItem,
    /// Quantity, always >= 1. A quantity edit below 1 removes the line.
    pub quantity: u32,
    /// Optional special instructions ("no berbere").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl CartItem {
    /// Price x quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.menu_item.price.times(self.quantity)
    }
}

/// An immutable line inside a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Delivery driver details, present once the order is out for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverInfo {
    pub id: DriverId,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
}

/// A placed order.
///
/// The monetary fields are backend-authoritative; the client never
/// recomputes them after checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID, assigned by the backend.
    pub id: OrderId,
    /// Restaurant the order was placed with.
    pub restaurant_id: RestaurantId,
    /// Snapshot of the cart lines at checkout time.
    pub lines: Vec<OrderLine>,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Delivery address reference.
    pub address_id: AddressId,
    /// Payment method reference.
    pub payment_method_id: PaymentMethodId,
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub tax: Money,
    pub tip: Money,
    pub total: Money,
    /// Driver details once status reaches out-for-delivery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<DriverInfo>,
    /// When the backend accepted the order.
    pub placed_at: DateTime<Utc>,
}

/// Backend-quoted fees for the current cart, used for display estimates
/// before checkout. Never authoritative - the placed order carries the
/// real figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub delivery_fee: Money,
    pub tax: Money,
    pub tip: Money,
}
