//! Order tracking store.
//!
//! Owns the placed orders and applies every status change through the
//! transition rules in `gursha_core` - the lifecycle logic is identical
//! whether the trigger came from backend polling or a simulated timer
//! (see [`StatusSource`](super::StatusSource)).

use thiserror::Error;
use tracing::{info, instrument};

use gursha_core::{OrderId, OrderStatus, TransitionError};

use crate::gateway::{ApiError, ApiGateway, StatusUpdate};
use crate::models::Order;

use super::StatusSource;

/// Errors from order tracking operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The referenced order is not tracked by this store.
    #[error("unknown order: {0}")]
    UnknownOrder(OrderId),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The order tracking store.
pub struct OrderStore {
    gateway: ApiGateway,
    orders: Vec<Order>,
}

impl OrderStore {
    /// Create an empty store.
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            orders: Vec::new(),
        }
    }

    /// All tracked orders.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// One tracked order.
    #[must_use]
    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == *order_id)
    }

    /// Refresh the order list from the backend.
    ///
    /// # Errors
    ///
    /// On failure the existing list is kept untouched.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), OrderError> {
        let orders = self.gateway.list_orders().await?;
        self.orders = orders;
        Ok(())
    }

    /// Start tracking an order (typically the checkout result). An order
    /// already tracked under the same id is replaced.
    pub fn track(&mut self, order: Order) {
        self.orders.retain(|o| o.id != order.id);
        self.orders.push(order);
    }

    /// Apply one status report.
    ///
    /// The backend may have moved more than one step between polls, so a
    /// forward jump is applied as the sequence of single steps it implies;
    /// backwards or terminal-escaping reports are rejected. A report that
    /// matches the current status is a no-op.
    ///
    /// # Errors
    ///
    /// The order is left unchanged on any error.
    #[instrument(skip(self, update), fields(order_id = %order_id, to = %update.status))]
    pub fn apply_update(
        &mut self,
        order_id: &OrderId,
        update: StatusUpdate,
    ) -> Result<OrderStatus, OrderError> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == *order_id)
            .ok_or_else(|| OrderError::UnknownOrder(order_id.clone()))?;

        let target = update.status;
        if order.status != target {
            // Validate the whole walk before mutating anything.
            let mut cursor = order.status;
            if target == OrderStatus::Cancelled {
                cursor = cursor.cancel()?;
            } else {
                while cursor != target {
                    cursor = cursor.advance()?;
                }
            }
            info!(from = %order.status, to = %cursor, "Order status changed");
            order.status = cursor;
        }

        if update.driver.is_some() {
            order.driver = update.driver;
        }
        Ok(order.status)
    }

    /// Apply the single legal forward step locally.
    ///
    /// # Errors
    ///
    /// Returns a transition error for terminal orders; status unchanged.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub fn advance_status(&mut self, order_id: &OrderId) -> Result<OrderStatus, OrderError> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == *order_id)
            .ok_or_else(|| OrderError::UnknownOrder(order_id.clone()))?;
        order.status = order.status.advance()?;
        Ok(order.status)
    }

    /// Cancel an order. Confirmed policy: the local transition rules are
    /// checked first (fail fast, no network), then the backend performs
    /// the cancellation and its copy of the order replaces ours.
    ///
    /// # Errors
    ///
    /// `InvalidTransition`-class failures and gateway failures both leave
    /// the tracked order's status unchanged.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel(&mut self, order_id: &OrderId) -> Result<&Order, OrderError> {
        let current = self
            .get(order_id)
            .ok_or_else(|| OrderError::UnknownOrder(order_id.clone()))?
            .status;
        // Reject delivered/cancelled/out-for-delivery before any network.
        current.cancel()?;

        let cancelled = self.gateway.cancel_order(order_id).await?;
        self.track(cancelled);
        self.get(order_id)
            .ok_or_else(|| OrderError::UnknownOrder(order_id.clone()))
    }

    /// Drive an order with a status source until it reaches a terminal
    /// state or the source runs dry.
    ///
    /// # Errors
    ///
    /// Stops at the first source or transition failure.
    #[instrument(skip(self, source), fields(order_id = %order_id))]
    pub async fn watch<S: StatusSource>(
        &mut self,
        order_id: &OrderId,
        source: &mut S,
    ) -> Result<OrderStatus, OrderError> {
        loop {
            let order = self
                .get(order_id)
                .ok_or_else(|| OrderError::UnknownOrder(order_id.clone()))?;
            if order.status.is_terminal() {
                return Ok(order.status);
            }
            match source.next_update(order).await? {
                Some(update) => {
                    self.apply_update(order_id, update)?;
                }
                None => {
                    return Ok(self
                        .get(order_id)
                        .ok_or_else(|| OrderError::UnknownOrder(order_id.clone()))?
                        .status);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::models::{DriverInfo, OrderLine};
    use chrono::Utc;
    use gursha_core::{
        AddressId, CurrencyCode, DriverId, Money, PaymentMethodId, RestaurantId,
    };
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn etb(s: &str) -> Money {
        Money::new(Decimal::from_str(s).unwrap(), CurrencyCode::ETB)
    }

    fn sample_order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            restaurant_id: RestaurantId::new("r1"),
            lines: vec![OrderLine {
                name: "Doro Wat".to_string(),
                unit_price: etb("14.99"),
                quantity: 2,
                instructions: None,
            }],
            status,
            address_id: AddressId::new("a1"),
            payment_method_id: PaymentMethodId::new("p1"),
            subtotal: etb("45.94"),
            delivery_fee: etb("2.99"),
            tax: etb("6.89"),
            tip: etb("5.00"),
            total: etb("60.82"),
            driver: None,
            placed_at: Utc::now(),
        }
    }

    fn store() -> OrderStore {
        let config = ClientConfig::for_base_url("http://localhost:1/api/v1").unwrap();
        OrderStore::new(ApiGateway::new(&config))
    }

    #[test]
    fn test_advance_walks_the_chain() {
        let mut store = store();
        store.track(sample_order("o1", OrderStatus::Pending));
        let id = OrderId::new("o1");

        assert_eq!(store.advance_status(&id).unwrap(), OrderStatus::Confirmed);
        assert_eq!(store.advance_status(&id).unwrap(), OrderStatus::Preparing);
        assert_eq!(
            store.advance_status(&id).unwrap(),
            OrderStatus::OutForDelivery
        );
        assert_eq!(store.advance_status(&id).unwrap(), OrderStatus::Delivered);
        assert!(matches!(
            store.advance_status(&id),
            Err(OrderError::Transition(TransitionError::Terminal(
                OrderStatus::Delivered
            )))
        ));
    }

    #[test]
    fn test_apply_update_accepts_forward_jump() {
        let mut store = store();
        store.track(sample_order("o1", OrderStatus::Pending));
        let id = OrderId::new("o1");

        let status = store
            .apply_update(
                &id,
                StatusUpdate {
                    status: OrderStatus::Preparing,
                    driver: None,
                },
            )
            .unwrap();
        assert_eq!(status, OrderStatus::Preparing);
    }

    #[test]
    fn test_apply_update_rejects_backwards() {
        let mut store = store();
        store.track(sample_order("o1", OrderStatus::Preparing));
        let id = OrderId::new("o1");

        let err = store
            .apply_update(
                &id,
                StatusUpdate {
                    status: OrderStatus::Confirmed,
                    driver: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, OrderError::Transition(_)));
        assert_eq!(store.get(&id).unwrap().status, OrderStatus::Preparing);
    }

    #[test]
    fn test_apply_update_attaches_driver() {
        let mut store = store();
        store.track(sample_order("o1", OrderStatus::Preparing));
        let id = OrderId::new("o1");

        store
            .apply_update(
                &id,
                StatusUpdate {
                    status: OrderStatus::OutForDelivery,
                    driver: Some(DriverInfo {
                        id: DriverId::new("d1"),
                        name: "Mulugeta".to_string(),
                        phone: "+251911222333".to_string(),
                        vehicle: Some("motorbike".to_string()),
                    }),
                },
            )
            .unwrap();
        let order = store.get(&id).unwrap();
        assert_eq!(order.status, OrderStatus::OutForDelivery);
        assert_eq!(order.driver.as_ref().unwrap().name, "Mulugeta");
    }

    #[tokio::test]
    async fn test_cancel_delivered_fails_fast_and_leaves_status() {
        let mut store = store();
        store.track(sample_order("o1", OrderStatus::Delivered));
        let id = OrderId::new("o1");

        // Rejected locally before any network call; the bogus gateway
        // address proves no request was attempted.
        let err = store.cancel(&id).await.unwrap_err();
        assert!(matches!(
            err,
            OrderError::Transition(TransitionError::Terminal(OrderStatus::Delivered))
        ));
        assert_eq!(store.get(&id).unwrap().status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_cancel_out_for_delivery_rejected() {
        let mut store = store();
        store.track(sample_order("o1", OrderStatus::OutForDelivery));
        let id = OrderId::new("o1");
        assert!(matches!(
            store.cancel(&id).await.unwrap_err(),
            OrderError::Transition(TransitionError::Illegal { .. })
        ));
    }

    #[test]
    fn test_unknown_order() {
        let mut store = store();
        let id = OrderId::new("nope");
        assert!(matches!(
            store.advance_status(&id),
            Err(OrderError::UnknownOrder(_))
        ));
    }
}
