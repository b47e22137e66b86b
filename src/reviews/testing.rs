//! In-memory stand-ins for the external collaborators, used by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api_connection::connection::{RecipeSource, ReviewBackend};
use crate::api_connection::endpoints::{
    Ingredient, PageParams, Recipe, RecipeSummary, Review, ReviewPayload,
};
use crate::error::{FetchError, SubmitError};
use crate::identity::Session;

#[derive(Debug, Clone)]
pub struct PostedReview {
    pub user_id: String,
    pub token: String,
    pub recipe_id: String,
    pub payload: ReviewPayload,
}

#[derive(Debug, Clone)]
enum PostBehavior {
    Accept,
    Echo(Review),
    Reject(StatusCode, String),
    Hang,
}

#[derive(Debug)]
pub struct FakeReviewBackend {
    reviews: Option<Vec<Review>>,
    behavior: PostBehavior,
    posted: Mutex<Vec<PostedReview>>,
    fetches: Mutex<Vec<(String, PageParams)>>,
}

impl Default for FakeReviewBackend {
    fn default() -> Self {
        Self::with_reviews(Vec::new())
    }
}

impl FakeReviewBackend {
    pub fn with_reviews(reviews: Vec<Review>) -> Self {
        Self {
            reviews: Some(reviews),
            behavior: PostBehavior::Accept,
            posted: Mutex::new(Vec::new()),
            fetches: Mutex::new(Vec::new()),
        }
    }

    /// Every fetch fails with a 500.
    pub fn failing_fetch() -> Self {
        Self {
            reviews: None,
            ..Self::default()
        }
    }

    pub fn echoing(review: Review) -> Self {
        Self {
            behavior: PostBehavior::Echo(review),
            ..Self::default()
        }
    }

    pub fn rejecting(status: StatusCode, body: &str) -> Self {
        Self {
            behavior: PostBehavior::Reject(status, body.to_string()),
            ..Self::default()
        }
    }

    /// Submissions never resolve.
    pub fn pending() -> Self {
        Self {
            behavior: PostBehavior::Hang,
            ..Self::default()
        }
    }

    pub fn posted(&self) -> Vec<PostedReview> {
        self.posted.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> Vec<(String, PageParams)> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewBackend for FakeReviewBackend {
    async fn fetch_reviews(
        &self,
        recipe_id: &str,
        page: PageParams,
    ) -> Result<Vec<Review>, FetchError> {
        self.fetches
            .lock()
            .unwrap()
            .push((recipe_id.to_string(), page));
        match &self.reviews {
            Some(reviews) => Ok(reviews.clone()),
            None => Err(FetchError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "review service unavailable".into(),
            }),
        }
    }

    async fn post_review(
        &self,
        session: &Session,
        recipe_id: &str,
        payload: &ReviewPayload,
    ) -> Result<Option<Review>, SubmitError> {
        self.posted.lock().unwrap().push(PostedReview {
            user_id: session.user_id.clone(),
            token: session.token.clone(),
            recipe_id: recipe_id.to_string(),
            payload: payload.clone(),
        });
        match &self.behavior {
            PostBehavior::Accept => Ok(None),
            PostBehavior::Echo(review) => Ok(Some(review.clone())),
            PostBehavior::Reject(status, body) => Err(SubmitError::Rejected {
                status: *status,
                body: body.clone(),
            }),
            PostBehavior::Hang => {
                std::future::pending::<()>().await;
                Ok(None)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeRecipeSource {
    recipe: Option<Recipe>,
    calls: AtomicUsize,
}

impl FakeRecipeSource {
    pub fn serving(recipe: Recipe) -> Self {
        Self {
            recipe: Some(recipe),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every fetch fails with a 404.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeSource for FakeRecipeSource {
    async fn fetch_recipe(&self, _recipe_id: &str) -> Result<Recipe, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.recipe.clone().ok_or_else(|| FetchError::Api {
            status: StatusCode::NOT_FOUND,
            body: "recipe not found".into(),
        })
    }

    async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSummary>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .recipe
            .iter()
            .filter(|r| r.title.to_lowercase().contains(&query.to_lowercase()))
            .map(|r| RecipeSummary {
                id: r.id,
                title: r.title.clone(),
                image: r.image.clone(),
            })
            .collect())
    }
}

pub fn sample_recipe() -> Recipe {
    Recipe {
        id: 716429,
        title: "Pasta with Garlic".into(),
        image: Some("https://img.example/716429.jpg".into()),
        servings: 2,
        ready_in_minutes: 45,
        ingredients: vec![
            Ingredient {
                id: Some(1001),
                amount: 1.5,
                unit: "tbsp".into(),
                name: "butter".into(),
            },
            Ingredient {
                id: Some(11215),
                amount: 2.0,
                unit: "".into(),
                name: "garlic cloves".into(),
            },
        ],
        instructions: Some("<ol><li>Boil the pasta.</li><li>Add garlic &amp; butter.</li></ol>".into()),
    }
}
