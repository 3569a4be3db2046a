//! Restaurant and menu endpoints.

use tracing::{debug, instrument};

use gursha_core::RestaurantId;

use crate::models::{MenuItem, Restaurant};

use super::cache::CacheValue;
use super::{ApiError, ApiGateway};

impl ApiGateway {
    // =========================================================================
    // Restaurant Methods (read-mostly, cached)
    // =========================================================================

    /// Get the restaurant listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        let cache_key = "restaurants".to_string();

        if let Some(CacheValue::Restaurants(restaurants)) = self.cache_get(&cache_key).await {
            debug!("Cache hit for restaurants");
            return Ok(restaurants);
        }

        let restaurants: Vec<Restaurant> = self.get("restaurants").await?;

        self.cache_put(cache_key, CacheValue::Restaurants(restaurants.clone()))
            .await;

        Ok(restaurants)
    }

    /// Get one restaurant by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the restaurant does not exist.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn get_restaurant(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Restaurant, ApiError> {
        self.get(&format!("restaurants/{restaurant_id}")).await
    }

    /// Get a restaurant's menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn menu(&self, restaurant_id: &RestaurantId) -> Result<Vec<MenuItem>, ApiError> {
        let cache_key = format!("menu:{restaurant_id}");

        if let Some(CacheValue::Menu(items)) = self.cache_get(&cache_key).await {
            debug!("Cache hit for menu");
            return Ok(items);
        }

        let items: Vec<MenuItem> = self
            .get(&format!("restaurants/{restaurant_id}/menu"))
            .await?;

        self.cache_put(cache_key, CacheValue::Menu(items.clone()))
            .await;

        Ok(items)
    }

    /// Search restaurants by name or cuisine. Never cached: results are
    /// query-specific and the search box invalidates fast.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_restaurants(&self, query: &str) -> Result<Vec<Restaurant>, ApiError> {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.get(&format!("restaurants/search?q={encoded}")).await
    }

    /// Invalidate the cached menu for one restaurant.
    pub(crate) async fn invalidate_menu(&self, restaurant_id: &RestaurantId) {
        self.cache_invalidate(&format!("menu:{restaurant_id}")).await;
    }
}
