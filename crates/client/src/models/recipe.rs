//! Recipe-sharing types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gursha_core::{CommentId, RecipeId, UserId};

/// A shared recipe.
///
/// `liked` and `saved` are scoped to the current viewer; the backend
/// resolves them from the bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe ID.
    pub id: RecipeId,
    /// Author reference.
    pub author_id: UserId,
    /// Recipe title (e.g., "Misir Wat").
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Ingredient list, one entry per line.
    pub ingredients: Vec<String>,
    /// Preparation steps, in order.
    pub steps: Vec<String>,
    /// Running mean of all ratings.
    #[serde(default)]
    pub rating: f32,
    /// Number of ratings behind the mean.
    #[serde(default)]
    pub rating_count: u32,
    /// Total likes across all users.
    #[serde(default)]
    pub likes: u32,
    /// Whether the current viewer liked this recipe.
    #[serde(default)]
    pub liked: bool,
    /// Whether the current viewer saved this recipe.
    #[serde(default)]
    pub saved: bool,
    /// Comment thread, newest last.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A comment on a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author_id: UserId,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// The server-confirmed rating aggregate returned after submitting a
/// rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub rating: f32,
    pub rating_count: u32,
}
