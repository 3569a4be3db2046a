//! Recipe feed store.
//!
//! Like and save are the highest-frequency taps in the app, so they flip
//! optimistically and reconcile to the server-confirmed counts; a failed
//! toggle rolls back to the pre-tap snapshot. Ratings and comments are
//! confirmed writes: nothing lands locally until the backend acks.

use thiserror::Error;
use tracing::{instrument, warn};

use gursha_core::RecipeId;

use crate::error::ValidationError;
use crate::gateway::{ApiError, ApiGateway};
use crate::models::{Comment, Recipe};

/// Errors from recipe operations.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// The referenced recipe is not in the loaded feed.
    #[error("unknown recipe: {0}")]
    UnknownRecipe(RecipeId),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The recipe feed store.
pub struct RecipeStore {
    gateway: ApiGateway,
    recipes: Vec<Recipe>,
    last_error: Option<String>,
}

impl RecipeStore {
    /// Create an empty store.
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            recipes: Vec::new(),
            last_error: None,
        }
    }

    /// The feed as last successfully fetched.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// One recipe from the loaded feed.
    #[must_use]
    pub fn get(&self, recipe_id: &RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == *recipe_id)
    }

    /// The last read failure, for banner display.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Refresh the feed. Degrades on failure: the previous feed stays on
    /// screen and the error is recorded.
    ///
    /// # Errors
    ///
    /// The error is returned as well as recorded, so callers can retry.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), RecipeError> {
        match self.gateway.list_recipes().await {
            Ok(recipes) => {
                self.recipes = recipes;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Recipe feed refresh failed, keeping previous data");
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Fetch one recipe with its comment thread and refresh our copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(recipe_id = %recipe_id))]
    pub async fn refresh(&mut self, recipe_id: &RecipeId) -> Result<&Recipe, RecipeError> {
        let recipe = self.gateway.get_recipe(recipe_id).await?;
        self.upsert(recipe);
        self.get(recipe_id)
            .ok_or_else(|| RecipeError::UnknownRecipe(recipe_id.clone()))
    }

    /// Toggle the viewer's like. Optimistic: the heart flips and the
    /// count adjusts immediately, then both reconcile to the
    /// server-confirmed state; on failure the pre-tap snapshot comes back.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after rollback.
    #[instrument(skip(self), fields(recipe_id = %recipe_id))]
    pub async fn toggle_like(&mut self, recipe_id: &RecipeId) -> Result<(), RecipeError> {
        let index = self.index_of(recipe_id)?;
        let snapshot = (self.recipes[index].liked, self.recipes[index].likes);

        {
            let recipe = &mut self.recipes[index];
            recipe.liked = !recipe.liked;
            recipe.likes = if recipe.liked {
                recipe.likes.saturating_add(1)
            } else {
                recipe.likes.saturating_sub(1)
            };
        }

        match self.gateway.like_recipe(recipe_id).await {
            Ok(state) => {
                let recipe = &mut self.recipes[index];
                recipe.liked = state.liked;
                recipe.likes = state.likes;
                Ok(())
            }
            Err(e) => {
                let recipe = &mut self.recipes[index];
                (recipe.liked, recipe.likes) = snapshot;
                Err(e.into())
            }
        }
    }

    /// Toggle the viewer's save. Same optimistic policy as
    /// [`toggle_like`](Self::toggle_like).
    ///
    /// # Errors
    ///
    /// Returns the gateway error after rollback.
    #[instrument(skip(self), fields(recipe_id = %recipe_id))]
    pub async fn toggle_save(&mut self, recipe_id: &RecipeId) -> Result<(), RecipeError> {
        let index = self.index_of(recipe_id)?;
        let snapshot = self.recipes[index].saved;

        self.recipes[index].saved = !snapshot;

        match self.gateway.save_recipe(recipe_id).await {
            Ok(state) => {
                self.recipes[index].saved = state.saved;
                Ok(())
            }
            Err(e) => {
                self.recipes[index].saved = snapshot;
                Err(e.into())
            }
        }
    }

    /// Submit a star rating. Confirmed: stars are validated locally
    /// (1 through 5), then the server-confirmed aggregate replaces the
    /// local mean - the client never computes the average itself.
    ///
    /// # Errors
    ///
    /// Out-of-range stars fail before any network call.
    #[instrument(skip(self), fields(recipe_id = %recipe_id, stars))]
    pub async fn rate(&mut self, recipe_id: &RecipeId, stars: u8) -> Result<(), RecipeError> {
        if !(1..=5).contains(&stars) {
            return Err(ValidationError::new("stars", "must be between 1 and 5").into());
        }
        let index = self.index_of(recipe_id)?;

        let summary = self.gateway.rate_recipe(recipe_id, stars).await?;
        let recipe = &mut self.recipes[index];
        recipe.rating = summary.rating;
        recipe.rating_count = summary.rating_count;
        Ok(())
    }

    /// Post a comment. Confirmed: the server-assigned comment (with its
    /// id and timestamp) is appended and returned, never a provisional
    /// local copy.
    ///
    /// # Errors
    ///
    /// Empty comments fail before any network call.
    #[instrument(skip(self, body), fields(recipe_id = %recipe_id))]
    pub async fn add_comment(
        &mut self,
        recipe_id: &RecipeId,
        body: &str,
    ) -> Result<Comment, RecipeError> {
        if body.trim().is_empty() {
            return Err(ValidationError::new("comment", "must not be empty").into());
        }
        let index = self.index_of(recipe_id)?;

        let comment = self.gateway.comment_recipe(recipe_id, body).await?;
        self.recipes[index].comments.push(comment.clone());
        Ok(comment)
    }

    fn index_of(&self, recipe_id: &RecipeId) -> Result<usize, RecipeError> {
        self.recipes
            .iter()
            .position(|r| r.id == *recipe_id)
            .ok_or_else(|| RecipeError::UnknownRecipe(recipe_id.clone()))
    }

    fn upsert(&mut self, recipe: Recipe) {
        if let Some(existing) = self.recipes.iter_mut().find(|r| r.id == recipe.id) {
            *existing = recipe;
        } else {
            self.recipes.push(recipe);
        }
    }

    #[cfg(test)]
    pub(crate) fn seed(&mut self, recipes: Vec<Recipe>) {
        self.recipes = recipes;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use gursha_core::UserId;

    fn store() -> RecipeStore {
        let config = ClientConfig::for_base_url("http://localhost:1/api/v1").unwrap();
        RecipeStore::new(ApiGateway::new(&config))
    }

    fn recipe(id: &str, likes: u32, liked: bool) -> Recipe {
        Recipe {
            id: RecipeId::new(id),
            author_id: UserId::new("u1"),
            title: "Misir Wat".to_string(),
            description: String::new(),
            ingredients: vec!["red lentils".to_string(), "berbere".to_string()],
            steps: vec!["Simmer until thick".to_string()],
            rating: 4.0,
            rating_count: 3,
            likes,
            liked,
            saved: false,
            comments: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_toggle_like_rolls_back_on_failure() {
        let mut store = store();
        store.seed(vec![recipe("rc1", 10, false)]);

        // Gateway is unreachable, so the optimistic flip must roll back.
        let result = store.toggle_like(&RecipeId::new("rc1")).await;
        assert!(result.is_err());
        let recipe = store.get(&RecipeId::new("rc1")).unwrap();
        assert!(!recipe.liked);
        assert_eq!(recipe.likes, 10);
    }

    #[tokio::test]
    async fn test_toggle_save_rolls_back_on_failure() {
        let mut store = store();
        store.seed(vec![recipe("rc1", 0, false)]);

        assert!(store.toggle_save(&RecipeId::new("rc1")).await.is_err());
        assert!(!store.get(&RecipeId::new("rc1")).unwrap().saved);
    }

    #[tokio::test]
    async fn test_rate_rejects_out_of_range_stars() {
        let mut store = store();
        store.seed(vec![recipe("rc1", 0, false)]);
        let id = RecipeId::new("rc1");

        // Fails fast: the bogus gateway address proves no request was made.
        for stars in [0, 6] {
            let err = store.rate(&id, stars).await.unwrap_err();
            assert!(matches!(err, RecipeError::Validation(_)));
        }
        assert_eq!(store.get(&id).unwrap().rating_count, 3);
    }

    #[tokio::test]
    async fn test_blank_comment_rejected() {
        let mut store = store();
        store.seed(vec![recipe("rc1", 0, false)]);
        let err = store
            .add_comment(&RecipeId::new("rc1"), "  \n")
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_recipe() {
        let mut store = store();
        assert!(matches!(
            store.toggle_like(&RecipeId::new("nope")).await,
            Err(RecipeError::UnknownRecipe(_))
        ));
    }
}
