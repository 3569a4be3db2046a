//! Restaurant and menu types.

use serde::{Deserialize, Serialize};

use gursha_core::{MenuItemId, Money, RestaurantId};

/// A restaurant listed in the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Unique restaurant ID.
    pub id: RestaurantId,
    /// Display name.
    pub name: String,
    /// Short description shown on the card.
    #[serde(default)]
    pub description: String,
    /// Cuisine tag (e.g., "traditional", "fasting").
    #[serde(default)]
    pub cuisine: String,
    /// Aggregate rating, 0.0 when unrated.
    #[serde(default)]
    pub rating: f32,
    /// Base delivery fee quoted on the listing.
    pub delivery_fee: Money,
    /// Whether the restaurant currently accepts orders.
    #[serde(default = "default_open")]
    pub is_open: bool,
}

const fn default_open() -> bool {
    true
}

/// An item on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique menu item ID.
    pub id: MenuItemId,
    /// Restaurant this item belongs to.
    pub restaurant_id: RestaurantId,
    /// Dish name (e.g., "Doro Wat").
    pub name: String,
    /// Description shown on the detail sheet.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Money,
    /// Image URL, if the restaurant uploaded one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Whether the item can currently be ordered.
    #[serde(default = "default_open")]
    pub available: bool,
}
