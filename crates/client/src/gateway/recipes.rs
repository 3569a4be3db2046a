//! Recipe endpoints.

use serde::Deserialize;
use tracing::{debug, instrument};

use gursha_core::RecipeId;

use crate::models::{Comment, RatingSummary, Recipe};

use super::cache::CacheValue;
use super::{ApiError, ApiGateway};

/// Server-confirmed like state after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LikeState {
    pub liked: bool,
    pub likes: u32,
}

/// Server-confirmed save state after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SaveState {
    pub saved: bool,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    comment: Comment,
}

impl ApiGateway {
    // =========================================================================
    // Recipe Methods (listing cached; mutations invalidate)
    // =========================================================================

    /// Get the recipe feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let cache_key = "recipes".to_string();

        if let Some(CacheValue::Recipes(recipes)) = self.cache_get(&cache_key).await {
            debug!("Cache hit for recipes");
            return Ok(recipes);
        }

        let recipes: Vec<Recipe> = self.get("recipes").await?;

        self.cache_put(cache_key, CacheValue::Recipes(recipes.clone()))
            .await;

        Ok(recipes)
    }

    /// Get one recipe with its full comment thread.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the recipe does not exist.
    #[instrument(skip(self), fields(recipe_id = %recipe_id))]
    pub async fn get_recipe(&self, recipe_id: &RecipeId) -> Result<Recipe, ApiError> {
        self.get(&format!("recipes/{recipe_id}")).await
    }

    /// Toggle the viewer's like on a recipe.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(recipe_id = %recipe_id))]
    pub async fn like_recipe(&self, recipe_id: &RecipeId) -> Result<LikeState, ApiError> {
        let state = self
            .post_empty(&format!("recipes/{recipe_id}/like"))
            .await?;
        self.cache_invalidate("recipes").await;
        Ok(state)
    }

    /// Toggle the viewer's save on a recipe.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(recipe_id = %recipe_id))]
    pub async fn save_recipe(&self, recipe_id: &RecipeId) -> Result<SaveState, ApiError> {
        let state = self
            .post_empty(&format!("recipes/{recipe_id}/save"))
            .await?;
        self.cache_invalidate("recipes").await;
        Ok(state)
    }

    /// Submit a rating; the response is the new server-side aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(recipe_id = %recipe_id))]
    pub async fn rate_recipe(
        &self,
        recipe_id: &RecipeId,
        stars: u8,
    ) -> Result<RatingSummary, ApiError> {
        let body = serde_json::json!({ "stars": stars });
        let summary = self
            .post(&format!("recipes/{recipe_id}/rate"), &body)
            .await?;
        self.cache_invalidate("recipes").await;
        Ok(summary)
    }

    /// Post a comment; the response is the server-confirmed comment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, body), fields(recipe_id = %recipe_id))]
    pub async fn comment_recipe(
        &self,
        recipe_id: &RecipeId,
        body: &str,
    ) -> Result<Comment, ApiError> {
        let payload = serde_json::json!({ "body": body });
        let data: CommentData = self
            .post(&format!("recipes/{recipe_id}/comments"), &payload)
            .await?;
        self.cache_invalidate("recipes").await;
        Ok(data.comment)
    }
}
