//! Restaurant browsing store.
//!
//! Read-only state: the listing, a per-restaurant menu passthrough, and
//! the search box. Reads degrade instead of blocking - a failed refresh
//! keeps whatever was on screen and records the error for a banner.
//!
//! Search is raced: the user types faster than the network answers, so
//! every query takes a generation ticket and a completion only lands if
//! its ticket is still the newest. A stale result is dropped silently.

use tracing::{debug, instrument, warn};

use gursha_core::RestaurantId;

use crate::gateway::{ApiError, ApiGateway};
use crate::models::{MenuItem, Restaurant};

/// Generation token for one search request. Obtained from
/// [`RestaurantStore::begin_search`]; a completion carrying a superseded
/// ticket is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// The restaurant browsing store.
pub struct RestaurantStore {
    gateway: ApiGateway,
    restaurants: Vec<Restaurant>,
    search_results: Vec<Restaurant>,
    search_generation: u64,
    last_error: Option<String>,
}

impl RestaurantStore {
    /// Create an empty store.
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            restaurants: Vec::new(),
            search_results: Vec::new(),
            search_generation: 0,
            last_error: None,
        }
    }

    /// The restaurant listing as last successfully fetched.
    #[must_use]
    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    /// Results of the most recent completed search.
    #[must_use]
    pub fn search_results(&self) -> &[Restaurant] {
        &self.search_results
    }

    /// The last read failure, for banner display. Cleared by the next
    /// successful refresh.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Refresh the listing. Degrades on failure: the previous listing
    /// stays on screen and the error is recorded.
    ///
    /// # Errors
    ///
    /// The error is returned as well as recorded, so callers can retry.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), ApiError> {
        match self.gateway.list_restaurants().await {
            Ok(restaurants) => {
                self.restaurants = restaurants;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Restaurant listing refresh failed, keeping previous data");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// One restaurant from the cached listing, without a network call.
    #[must_use]
    pub fn get(&self, restaurant_id: &RestaurantId) -> Option<&Restaurant> {
        self.restaurants.iter().find(|r| r.id == *restaurant_id)
    }

    /// Fetch a restaurant's menu. Passthrough: menus belong to the menu
    /// screen's lifetime, not this store's, so nothing is retained here.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn menu(&self, restaurant_id: &RestaurantId) -> Result<Vec<MenuItem>, ApiError> {
        self.gateway.menu(restaurant_id).await
    }

    /// Fetch a restaurant's menu, bypassing any cached copy. Backs the
    /// pull-to-refresh gesture on the menu screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn refresh_menu(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<MenuItem>, ApiError> {
        self.gateway.invalidate_menu(restaurant_id).await;
        self.gateway.menu(restaurant_id).await
    }

    /// Claim the next search generation. Call once per keystroke-debounced
    /// query, before the request goes out.
    pub fn begin_search(&mut self) -> SearchTicket {
        self.search_generation += 1;
        SearchTicket(self.search_generation)
    }

    /// Land a completed search. Returns `true` if the results were
    /// applied, `false` if a newer query had already superseded them.
    pub fn apply_search(&mut self, ticket: SearchTicket, results: Vec<Restaurant>) -> bool {
        if ticket.0 == self.search_generation {
            self.search_results = results;
            true
        } else {
            debug!(
                ticket = ticket.0,
                current = self.search_generation,
                "Dropping stale search results"
            );
            false
        }
    }

    /// Run a search end to end: claim a ticket, query the backend, land
    /// the results if still current. Returns whether they were applied.
    ///
    /// An empty query clears the results without touching the network.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; previous results are kept.
    #[instrument(skip(self))]
    pub async fn search(&mut self, query: &str) -> Result<bool, ApiError> {
        if query.trim().is_empty() {
            self.begin_search();
            self.search_results.clear();
            return Ok(true);
        }
        let ticket = self.begin_search();
        let results = self.gateway.search_restaurants(query).await?;
        Ok(self.apply_search(ticket, results))
    }

    /// Clear search state, e.g. when leaving the search screen.
    pub fn clear_search(&mut self) {
        self.begin_search();
        self.search_results.clear();
    }
}
