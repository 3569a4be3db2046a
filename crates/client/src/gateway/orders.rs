//! Order endpoints (never cached - mutable state).

use serde::{Deserialize, Serialize};
use tracing::instrument;

use gursha_core::{
    AddressId, MenuItemId, Money, OrderId, OrderStatus, PaymentMethodId, RestaurantId,
};

use crate::models::{DriverInfo, FeeQuote, Order};

use super::{ApiError, ApiGateway};

/// One line of a checkout submission.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceOrderLine {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Checkout submission payload.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceOrderRequest {
    pub restaurant_id: RestaurantId,
    pub lines: Vec<PlaceOrderLine>,
    pub address_id: AddressId,
    pub payment_method_id: PaymentMethodId,
    pub tip: Money,
}

/// A status report for an in-flight order, as the backend sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    /// Present once a driver is assigned (out-for-delivery onwards).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<DriverInfo>,
}

#[derive(Debug, Deserialize)]
struct OrderData {
    order: Order,
}

impl ApiGateway {
    // =========================================================================
    // Order Methods (never cached - mutable state)
    // =========================================================================

    /// Submit a checkout. The returned order's monetary fields are the
    /// backend's authoritative figures.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is rejected or the request fails.
    #[instrument(skip(self, request), fields(restaurant_id = %request.restaurant_id))]
    pub async fn place_order(&self, request: &PlaceOrderRequest) -> Result<Order, ApiError> {
        let data: OrderData = self.post("orders", request).await?;
        Ok(data.order)
    }

    /// Get one order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the order does not exist.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: &OrderId) -> Result<Order, ApiError> {
        let data: OrderData = self.get(&format!("orders/{order_id}")).await?;
        Ok(data.order)
    }

    /// List the signed-in user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get("orders").await
    }

    /// Ask the backend to cancel an order. The backend applies the same
    /// transition rules the client does; the response carries the updated
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the cancellation is rejected or the request
    /// fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel_order(&self, order_id: &OrderId) -> Result<Order, ApiError> {
        let data: OrderData = self
            .post_empty(&format!("orders/{order_id}/cancel"))
            .await?;
        Ok(data.order)
    }

    /// Poll the current status of an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn order_status(&self, order_id: &OrderId) -> Result<StatusUpdate, ApiError> {
        self.get(&format!("orders/{order_id}/status")).await
    }

    /// Quote delivery fee and tax for the current cart. Display-only:
    /// the placed order carries the real figures.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn fee_quote(
        &self,
        restaurant_id: &RestaurantId,
        subtotal: &Money,
        tip: &Money,
    ) -> Result<FeeQuote, ApiError> {
        let body = serde_json::json!({
            "restaurant_id": restaurant_id,
            "subtotal": subtotal,
            "tip": tip,
        });
        self.post("orders/quote", &body).await
    }
}
