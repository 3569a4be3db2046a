//! Order commands: list and track.

use std::time::Duration;

use gursha_client::stores::{
    OrderError, OrderStore, PollingStatusSource, SimulatedStatusSource, StatusSource,
};
use gursha_core::OrderId;

use super::{CliError, Context};

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const SIMULATE_INTERVAL: Duration = Duration::from_secs(2);

/// List the signed-in user's orders.
pub async fn list() -> Result<(), CliError> {
    let context = Context::load().await?;
    context.require_session()?;

    let mut store = OrderStore::new(context.gateway.clone());
    store.load().await?;

    for order in store.orders() {
        tracing::info!(
            "{} {} - {} ({} lines, placed {})",
            order.id,
            order.status,
            order.total.display(),
            order.lines.len(),
            order.placed_at.format("%Y-%m-%d %H:%M")
        );
    }
    tracing::info!("{} orders", store.orders().len());
    Ok(())
}

/// Follow an order until it reaches a terminal state.
pub async fn track(order_id: &str, simulate: bool) -> Result<(), CliError> {
    let context = Context::load().await?;
    context.require_session()?;

    let mut store = OrderStore::new(context.gateway.clone());
    store.load().await?;
    let id = OrderId::new(order_id);

    if simulate {
        let mut source = SimulatedStatusSource::new(SIMULATE_INTERVAL);
        follow(&mut store, &id, &mut source).await
    } else {
        let mut source = PollingStatusSource::new(context.gateway.clone(), POLL_INTERVAL);
        follow(&mut store, &id, &mut source).await
    }
}

async fn follow<S: StatusSource>(
    store: &mut OrderStore,
    id: &OrderId,
    source: &mut S,
) -> Result<(), CliError> {
    let mut driver_seen = false;
    loop {
        let order = store
            .get(id)
            .cloned()
            .ok_or_else(|| OrderError::UnknownOrder(id.clone()))?;

        tracing::info!("{} is {}", order.id, order.status);
        if let Some(driver) = &order.driver
            && !driver_seen
        {
            tracing::info!("Driver assigned: {} ({})", driver.name, driver.phone);
            driver_seen = true;
        }
        if order.status.is_terminal() {
            return Ok(());
        }

        match source.next_update(&order).await? {
            Some(update) => {
                store.apply_update(id, update)?;
            }
            None => return Ok(()),
        }
    }
}
