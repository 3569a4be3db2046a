//! Cart store: accumulate items for a single restaurant, compute display
//! totals, and hand a checkout to the backend.
//!
//! Invariants:
//! - Every line belongs to the same restaurant; adding from a second
//!   restaurant is rejected until the cart is cleared.
//! - No line ever holds a quantity below 1; a quantity edit below 1
//!   removes the line.
//! - Client-side totals are display estimates; the placed order's totals
//!   come from the backend verbatim.

use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use gursha_core::{AddressId, CurrencyCode, MenuItemId, Money, PaymentMethodId, RestaurantId};

use crate::gateway::{ApiError, ApiGateway, PlaceOrderLine, PlaceOrderRequest};
use crate::models::{CartItem, FeeQuote, MenuItem, Order};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Checkout attempted with no items.
    #[error("cart is empty")]
    EmptyCart,

    /// The cart already holds items from a different restaurant.
    #[error("cart already contains items from restaurant {0}; clear it first")]
    CrossRestaurantCart(RestaurantId),

    /// Checkout attempted with no delivery address selected.
    #[error("no delivery address selected")]
    NoAddress,

    /// Checkout attempted with no payment method selected.
    #[error("no payment method selected")]
    NoPaymentMethod,

    /// Items are added with a quantity of at least 1.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The referenced cart line does not exist.
    #[error("no cart item with id {0}")]
    ItemNotFound(Uuid),

    /// The menu item cannot currently be ordered.
    #[error("menu item {0} is currently unavailable")]
    ItemUnavailable(MenuItemId),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The cart store.
pub struct CartStore {
    gateway: ApiGateway,
    items: Vec<CartItem>,
    restaurant_id: Option<RestaurantId>,
    tip: Money,
}

impl CartStore {
    /// Create an empty cart.
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            items: Vec::new(),
            restaurant_id: None,
            tip: Money::zero(CurrencyCode::ETB),
        }
    }

    /// Current cart lines.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The restaurant this cart belongs to, if non-empty.
    #[must_use]
    pub const fn restaurant_id(&self) -> Option<&RestaurantId> {
        self.restaurant_id.as_ref()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total item count across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// The tip applied at checkout.
    #[must_use]
    pub const fn tip(&self) -> &Money {
        &self.tip
    }

    /// Set the tip applied at checkout.
    pub fn set_tip(&mut self, tip: Money) {
        self.tip = tip;
    }

    /// Sum of price x quantity over the current lines, recomputed on
    /// every call.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        let currency = self
            .items
            .first()
            .map_or(CurrencyCode::ETB, |i| i.menu_item.price.currency);
        self.items
            .iter()
            .fold(Money::zero(currency), |acc, item| acc.plus(&item.line_total()))
    }

    /// Display estimate of the order total given a backend fee quote.
    /// Never authoritative; the placed order carries the real figures.
    #[must_use]
    pub fn estimate_total(&self, quote: &FeeQuote) -> Money {
        self.subtotal()
            .plus(&quote.delivery_fee)
            .plus(&quote.tax)
            .plus(&self.tip)
    }

    /// Add an item to the cart.
    ///
    /// Re-adding the same item with the same instructions merges the
    /// quantities into the existing line.
    ///
    /// # Errors
    ///
    /// Returns `CrossRestaurantCart` if the cart already belongs to a
    /// different restaurant; the caller must [`clear`](Self::clear) first.
    #[instrument(skip(self, menu_item), fields(menu_item_id = %menu_item.id))]
    pub fn add_item(
        &mut self,
        menu_item: MenuItem,
        quantity: u32,
        instructions: Option<String>,
    ) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }
        if !menu_item.available {
            return Err(CartError::ItemUnavailable(menu_item.id));
        }
        if let Some(rid) = &self.restaurant_id
            && *rid != menu_item.restaurant_id
        {
            return Err(CartError::CrossRestaurantCart(rid.clone()));
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.menu_item.id == menu_item.id && i.instructions == instructions)
        {
            existing.quantity += quantity;
        } else {
            self.restaurant_id = Some(menu_item.restaurant_id.clone());
            self.items.push(CartItem {
                id: Uuid::new_v4(),
                menu_item,
                quantity,
                instructions,
            });
        }
        Ok(())
    }

    /// Set a line's quantity. A quantity below 1 removes the line.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` for an unknown line id.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, line_id: Uuid, quantity: u32) -> Result<(), CartError> {
        if quantity < 1 {
            return self.remove_item(line_id);
        }
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == line_id)
            .ok_or(CartError::ItemNotFound(line_id))?;
        item.quantity = quantity;
        Ok(())
    }

    /// Remove one line.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` for an unknown line id.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, line_id: Uuid) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| i.id != line_id);
        if self.items.len() == before {
            return Err(CartError::ItemNotFound(line_id));
        }
        if self.items.is_empty() {
            self.restaurant_id = None;
        }
        Ok(())
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.restaurant_id = None;
        self.tip = Money::zero(CurrencyCode::ETB);
    }

    /// Submit the cart as an order. Confirmed policy: the cart is only
    /// cleared after the backend accepts the order; on any failure the
    /// cart is left intact for retry.
    ///
    /// The address and payment method arrive as options so a missing
    /// selection surfaces as a typed error here rather than a panic at a
    /// call site.
    ///
    /// # Errors
    ///
    /// `EmptyCart`, `NoAddress`, and `NoPaymentMethod` are raised before
    /// any network call; gateway failures pass through as `Api`.
    #[instrument(skip(self, address_id, payment_method_id))]
    pub async fn checkout(
        &mut self,
        address_id: Option<&AddressId>,
        payment_method_id: Option<&PaymentMethodId>,
    ) -> Result<Order, CartError> {
        if self.items.is_empty() {
            return Err(CartError::EmptyCart);
        }
        let address_id = address_id.ok_or(CartError::NoAddress)?.clone();
        let payment_method_id = payment_method_id.ok_or(CartError::NoPaymentMethod)?.clone();
        let restaurant_id = self
            .restaurant_id
            .clone()
            .ok_or(CartError::EmptyCart)?;

        let request = PlaceOrderRequest {
            restaurant_id,
            lines: self
                .items
                .iter()
                .map(|i| PlaceOrderLine {
                    menu_item_id: i.menu_item.id.clone(),
                    quantity: i.quantity,
                    instructions: i.instructions.clone(),
                })
                .collect(),
            address_id,
            payment_method_id,
            tip: self.tip,
        };

        let order = self.gateway.place_order(&request).await?;

        self.gateway.track(
            "order_placed",
            serde_json::json!({ "order_id": order.id, "total": order.total }),
        );
        self.clear();
        Ok(order)
    }
}
