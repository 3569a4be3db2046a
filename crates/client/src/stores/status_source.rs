//! Where order status changes come from.
//!
//! The order store applies updates identically regardless of origin, so
//! "next status" is a trait with two implementations: a timer-driven
//! simulation for development and tests, and backend polling for
//! production. The simulation is a stand-in for server push, never a
//! source of truth - it only ever proposes the single legal forward step.

use std::time::Duration;

use crate::gateway::{ApiError, ApiGateway, StatusUpdate};
use crate::models::{DriverInfo, Order};

/// A source of status updates for one order.
pub trait StatusSource {
    /// Wait for and return the next update, or `None` when the source has
    /// nothing further to report.
    fn next_update(
        &mut self,
        order: &Order,
    ) -> impl Future<Output = Result<Option<StatusUpdate>, ApiError>> + Send;
}

/// Timer-driven simulation: proposes the next forward step at a fixed
/// interval, attaching the configured driver at out-for-delivery.
#[derive(Debug, Clone)]
pub struct SimulatedStatusSource {
    interval: Duration,
    driver: Option<DriverInfo>,
}

impl SimulatedStatusSource {
    /// Create a source stepping at the given interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            driver: None,
        }
    }

    /// Attach driver details to the out-for-delivery step.
    #[must_use]
    pub fn with_driver(mut self, driver: DriverInfo) -> Self {
        self.driver = Some(driver);
        self
    }
}

impl StatusSource for SimulatedStatusSource {
    async fn next_update(&mut self, order: &Order) -> Result<Option<StatusUpdate>, ApiError> {
        tokio::time::sleep(self.interval).await;
        Ok(order.status.next().map(|status| StatusUpdate {
            status,
            driver: if status == gursha_core::OrderStatus::OutForDelivery {
                self.driver.clone()
            } else {
                None
            },
        }))
    }
}

/// Backend polling at a fixed interval.
#[derive(Clone)]
pub struct PollingStatusSource {
    gateway: ApiGateway,
    interval: Duration,
}

impl PollingStatusSource {
    /// Create a source polling the backend at the given interval.
    #[must_use]
    pub const fn new(gateway: ApiGateway, interval: Duration) -> Self {
        Self { gateway, interval }
    }
}

impl StatusSource for PollingStatusSource {
    async fn next_update(&mut self, order: &Order) -> Result<Option<StatusUpdate>, ApiError> {
        if order.status.is_terminal() {
            return Ok(None);
        }
        tokio::time::sleep(self.interval).await;
        let update = self.gateway.order_status(&order.id).await?;
        Ok(Some(update))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::models::OrderLine;
    use crate::stores::OrderStore;
    use chrono::Utc;
    use gursha_core::{
        AddressId, CurrencyCode, DriverId, Money, OrderId, OrderStatus, PaymentMethodId,
        RestaurantId,
    };
    use rust_decimal::Decimal;

    fn sample_order(status: OrderStatus) -> Order {
        Order {
            id: OrderId::new("o1"),
            restaurant_id: RestaurantId::new("r1"),
            lines: vec![OrderLine {
                name: "Doro Wat".to_string(),
                unit_price: Money::new(Decimal::new(1499, 2), CurrencyCode::ETB),
                quantity: 2,
                instructions: None,
            }],
            status,
            address_id: AddressId::new("a1"),
            payment_method_id: PaymentMethodId::new("p1"),
            subtotal: Money::new(Decimal::new(2998, 2), CurrencyCode::ETB),
            delivery_fee: Money::zero(CurrencyCode::ETB),
            tax: Money::zero(CurrencyCode::ETB),
            tip: Money::zero(CurrencyCode::ETB),
            total: Money::new(Decimal::new(2998, 2), CurrencyCode::ETB),
            driver: None,
            placed_at: Utc::now(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_source_walks_to_delivered() {
        let config = ClientConfig::for_base_url("http://localhost:1/api/v1").unwrap();
        let mut store = OrderStore::new(crate::ApiGateway::new(&config));
        store.track(sample_order(OrderStatus::Pending));

        let driver = DriverInfo {
            id: DriverId::new("d1"),
            name: "Mulugeta".to_string(),
            phone: "+251911222333".to_string(),
            vehicle: None,
        };
        let mut source =
            SimulatedStatusSource::new(Duration::from_secs(30)).with_driver(driver);

        let id = OrderId::new("o1");
        let final_status = store.watch(&id, &mut source).await.unwrap();

        assert_eq!(final_status, OrderStatus::Delivered);
        let order = store.get(&id).unwrap();
        assert_eq!(order.driver.as_ref().unwrap().name, "Mulugeta");
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_source_stops_at_terminal() {
        let mut source = SimulatedStatusSource::new(Duration::from_secs(1));
        let order = sample_order(OrderStatus::Cancelled);
        assert_eq!(source.next_update(&order).await.unwrap(), None);
    }
}
