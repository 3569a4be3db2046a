//! Browsing commands: restaurants, menu, search.

use gursha_client::stores::RestaurantStore;
use gursha_core::RestaurantId;

use super::{CliError, Context};

/// List restaurants.
pub async fn restaurants() -> Result<(), CliError> {
    let context = Context::load().await?;
    let mut store = RestaurantStore::new(context.gateway.clone());
    store.load().await?;

    for restaurant in store.restaurants() {
        tracing::info!(
            "{} [{}] {} - rating {:.1}, delivery {}{}",
            restaurant.id,
            restaurant.cuisine,
            restaurant.name,
            restaurant.rating,
            restaurant.delivery_fee.display(),
            if restaurant.is_open { "" } else { " (closed)" }
        );
    }
    tracing::info!("{} restaurants", store.restaurants().len());
    Ok(())
}

/// Show one restaurant's menu, optionally bypassing the cached copy.
pub async fn menu(restaurant_id: &str, refresh: bool) -> Result<(), CliError> {
    let context = Context::load().await?;
    let store = RestaurantStore::new(context.gateway.clone());
    let id = RestaurantId::new(restaurant_id);
    let items = if refresh {
        store.refresh_menu(&id).await?
    } else {
        store.menu(&id).await?
    };

    for item in &items {
        tracing::info!(
            "{} {} - {}{}",
            item.id,
            item.name,
            item.price.display(),
            if item.available { "" } else { " (unavailable)" }
        );
    }
    tracing::info!("{} menu items", items.len());
    Ok(())
}

/// Search restaurants by name or cuisine.
pub async fn search(query: &str) -> Result<(), CliError> {
    let context = Context::load().await?;
    let mut store = RestaurantStore::new(context.gateway.clone());
    store.search(query).await?;

    for restaurant in store.search_results() {
        tracing::info!("{} [{}] {}", restaurant.id, restaurant.cuisine, restaurant.name);
    }
    tracing::info!("{} results for \"{query}\"", store.search_results().len());
    Ok(())
}
