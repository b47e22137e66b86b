use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use tracing::{debug, info, warn};
use url::ParseError;

use super::endpoints::{
    PageParams, Recipe, RecipeSearchResponse, RecipeSummary, Review, ReviewPayload,
};
use crate::config::{normalize_base_url, Config};
use crate::error::{FetchError, SubmitError};
use crate::identity::Session;

/// Read-only access to recipe details.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn fetch_recipe(&self, recipe_id: &str) -> Result<Recipe, FetchError>;

    async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSummary>, FetchError>;
}

/// The first-party review backend.
#[async_trait]
pub trait ReviewBackend: Send + Sync {
    async fn fetch_reviews(
        &self,
        recipe_id: &str,
        page: PageParams,
    ) -> Result<Vec<Review>, FetchError>;

    /// Create-or-update the review keyed by `(session.user_id, recipe_id)`.
    ///
    /// Returns the review echoed by the backend when the response body carries
    /// one, `None` when it does not.
    async fn post_review(
        &self,
        session: &Session,
        recipe_id: &str,
        payload: &ReviewPayload,
    ) -> Result<Option<Review>, SubmitError>;
}

/// HTTP client for the third-party recipe provider. The API key travels as the
/// `apiKey` query parameter.
#[derive(Debug, Clone)]
pub struct RecipeProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RecipeProvider {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.recipe_api_url, config.recipe_api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RecipeSource for RecipeProvider {
    async fn fetch_recipe(&self, recipe_id: &str) -> Result<Recipe, FetchError> {
        let url = endpoint(&self.base_url, &["recipes", recipe_id, "information"])?;
        info!(url = %url, "fetching recipe");

        let response = self
            .client
            .get(url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;
        let recipe: Recipe = read_json(response).await?;
        debug!(title = %recipe.title, ingredients = recipe.ingredients.len(), "recipe fetched");
        Ok(recipe)
    }

    async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSummary>, FetchError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("empty search query, skipping request");
            return Ok(Vec::new());
        }

        let url = endpoint(&self.base_url, &["recipes", "complexSearch"])?;
        info!(url = %url, query = %query, "searching recipes");

        let response = self
            .client
            .get(url)
            .query(&[("query", query), ("apiKey", self.api_key.as_str())])
            .send()
            .await?;
        let page: RecipeSearchResponse = read_json(response).await?;
        info!(count = page.results.len(), "search complete");
        Ok(page.results)
    }
}

/// HTTP client for the review backend.
#[derive(Debug, Clone)]
pub struct ReviewApi {
    client: Client,
    base_url: String,
}

impl ReviewApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.review_api_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ReviewBackend for ReviewApi {
    async fn fetch_reviews(
        &self,
        recipe_id: &str,
        page: PageParams,
    ) -> Result<Vec<Review>, FetchError> {
        let url = endpoint(&self.base_url, &["recipe", recipe_id, "reviews"])?;
        info!(url = %url, limit = page.limit, offset = page.offset, "fetching reviews");

        let response = self.client.get(url).query(&page).send().await?;
        let reviews: Vec<Review> = read_json(response).await?;
        info!(count = reviews.len(), "reviews fetched");
        Ok(reviews)
    }

    async fn post_review(
        &self,
        session: &Session,
        recipe_id: &str,
        payload: &ReviewPayload,
    ) -> Result<Option<Review>, SubmitError> {
        let url = endpoint(
            &self.base_url,
            &["user", session.user_id.as_str(), recipe_id, "reviews"],
        )?;
        info!(url = %url, grade = payload.grade, "submitting review");

        let response = self
            .client
            .post(url)
            .bearer_auth(&session.token)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            warn!(%status, body = %body, "review submission rejected");
            return Err(SubmitError::Rejected { status, body });
        }

        let body = response.text().await?;

        if body.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Review>(&body) {
            Ok(review) => Ok(Some(review)),
            Err(e) => {
                debug!(error = %e, "submission response carried no review");
                Ok(None)
            }
        }
    }
}

/// Appends `segments` to `base`, percent-encoding each one so ids cannot
/// change the shape of the path.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, ParseError> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        return Err(FetchError::Api { status, body });
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
