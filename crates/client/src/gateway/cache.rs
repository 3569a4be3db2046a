//! Cache value types for the gateway's moka cache.

use crate::models::{MenuItem, Recipe, Restaurant};

/// Cached API responses. Only read-mostly resources are cached; cart,
/// order, and auth responses never are.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Restaurants(Vec<Restaurant>),
    Menu(Vec<MenuItem>),
    Recipes(Vec<Recipe>),
}
