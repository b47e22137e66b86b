use std::sync::Arc;

use tracing::{debug, warn};

use crate::api_connection::connection::{RecipeSource, ReviewBackend};
use crate::api_connection::endpoints::{PageParams, Recipe, Review};
use crate::error::{FetchError, ReviewError};
use crate::identity::Identity;
use crate::reviews::{Reconciler, RecipeSnapshot, ReviewDraft, ReviewStore, SubmissionState};

/// Which part of the review section the viewer gets to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPanel {
    LoginPrompt,
    Form,
    AlreadyReviewed,
}

/// One mounted recipe detail view: the recipe, its reviews and the review form.
///
/// Both fetches run concurrently on mount and either may fail without taking
/// the other down.
#[derive(Debug)]
pub struct RecipePage {
    recipe: Result<Recipe, FetchError>,
    review_error: Option<FetchError>,
    reconciler: Reconciler,
    draft: ReviewDraft,
}

impl RecipePage {
    pub async fn mount(
        recipes: &dyn RecipeSource,
        reviews: Arc<dyn ReviewBackend>,
        recipe_id: &str,
        page: PageParams,
    ) -> Self {
        let (recipe, fetched) = tokio::join!(
            recipes.fetch_recipe(recipe_id),
            reviews.fetch_reviews(recipe_id, page)
        );

        if let Err(e) = &recipe {
            warn!(recipe_id, error = %e, "recipe failed to load");
        }
        let (store, review_error) = match fetched {
            Ok(list) => (ReviewStore::from_reviews(list), None),
            Err(e) => {
                warn!(recipe_id, error = %e, "reviews failed to load, showing none");
                (ReviewStore::new(), Some(e))
            }
        };
        debug!(recipe_id, reviews = store.len(), "page mounted");

        Self {
            recipe,
            review_error,
            reconciler: Reconciler::with_reviews(reviews, recipe_id, store),
            draft: ReviewDraft::default(),
        }
    }

    pub fn recipe_id(&self) -> &str {
        self.reconciler.recipe_id()
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        self.recipe.as_ref().ok()
    }

    pub fn recipe_error(&self) -> Option<&FetchError> {
        self.recipe.as_ref().err()
    }

    pub fn review_error(&self) -> Option<&FetchError> {
        self.review_error.as_ref()
    }

    pub fn reviews(&self) -> &ReviewStore {
        self.reconciler.reviews()
    }

    pub fn has_reviewed(&self, identity: &Identity) -> bool {
        self.reconciler.has_reviewed(identity)
    }

    pub fn review_panel(&self, identity: &Identity) -> ReviewPanel {
        if !identity.is_authenticated() {
            ReviewPanel::LoginPrompt
        } else if self.has_reviewed(identity) {
            ReviewPanel::AlreadyReviewed
        } else {
            ReviewPanel::Form
        }
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ReviewDraft {
        &mut self.draft
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.reconciler.state()
    }

    pub fn acknowledge(&mut self) -> Option<SubmissionState> {
        self.reconciler.acknowledge()
    }

    /// Submits the current draft. The draft is cleared only on success.
    pub async fn submit_review(&mut self, identity: &Identity) -> Result<Review, ReviewError> {
        let snapshot = self.snapshot();
        let review = self
            .reconciler
            .submit(identity, self.draft.grade, &self.draft.comment, snapshot)
            .await?;
        self.draft.reset();
        Ok(review)
    }

    pub async fn edit_review(
        &mut self,
        identity: &Identity,
        grade: u8,
        comment: &str,
    ) -> Result<Review, ReviewError> {
        let snapshot = self.snapshot();
        self.reconciler
            .edit_review(identity, grade, comment, snapshot)
            .await
    }

    /// Tears the view down; its review list goes with it.
    pub fn unmount(self) {
        debug!(recipe_id = self.recipe_id(), "page unmounted");
    }

    fn snapshot(&self) -> RecipeSnapshot {
        self.recipe().map(RecipeSnapshot::from).unwrap_or_default()
    }
}
