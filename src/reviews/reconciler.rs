use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::store::{MergeOutcome, ReviewStore};
use crate::api_connection::connection::ReviewBackend;
use crate::api_connection::endpoints::{Recipe, Review, ReviewPayload};
use crate::error::ReviewError;
use crate::identity::{Identity, Session};

/// A star grade, 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Grade(u8);

impl Grade {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Grade {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Grade(value))
        } else {
            Err(ReviewError::InvalidGrade(value))
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Single-flight submission lifecycle.
///
/// `Idle -> Submitting -> {Succeeded, Failed} -> Idle`; new submissions are
/// only accepted in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// The recipe fields copied into a review so a "my reviews" listing can show
/// them without refetching the recipe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeSnapshot {
    pub title: Option<String>,
    pub image: Option<String>,
}

impl From<&Recipe> for RecipeSnapshot {
    fn from(recipe: &Recipe) -> Self {
        Self {
            title: Some(recipe.title.clone()),
            image: recipe.image.clone(),
        }
    }
}

/// Unsaved review form contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub grade: u8,
    pub comment: String,
}

impl ReviewDraft {
    pub const DEFAULT_GRADE: u8 = 3;

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self {
            grade: Self::DEFAULT_GRADE,
            comment: String::new(),
        }
    }
}

/// Puts the state machine back to `Idle` if the submission future is dropped
/// before it settles.
struct InFlight<'a> {
    state: &'a mut SubmissionState,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn begin(state: &'a mut SubmissionState) -> Self {
        *state = SubmissionState::Submitting;
        Self {
            state,
            settled: false,
        }
    }

    fn finish(mut self, outcome: SubmissionState) {
        *self.state = outcome;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("submission dropped before completion, discarding result");
            *self.state = SubmissionState::Idle;
        }
    }
}

/// Owns the review list of one recipe and is its only writer.
pub struct Reconciler {
    backend: Arc<dyn ReviewBackend>,
    recipe_id: String,
    store: ReviewStore,
    state: SubmissionState,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("recipe_id", &self.recipe_id)
            .field("store", &self.store)
            .field("state", &self.state)
            .finish()
    }
}

impl Reconciler {
    pub fn new(backend: Arc<dyn ReviewBackend>, recipe_id: impl Into<String>) -> Self {
        Self::with_reviews(backend, recipe_id, ReviewStore::new())
    }

    pub fn with_reviews(
        backend: Arc<dyn ReviewBackend>,
        recipe_id: impl Into<String>,
        store: ReviewStore,
    ) -> Self {
        Self {
            backend,
            recipe_id: recipe_id.into(),
            store,
            state: SubmissionState::Idle,
        }
    }

    pub fn recipe_id(&self) -> &str {
        &self.recipe_id
    }

    pub fn reviews(&self) -> &ReviewStore {
        &self.store
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn has_reviewed(&self, identity: &Identity) -> bool {
        self.store.has_reviewed(identity)
    }

    /// Moves a settled submission back to `Idle`, returning the settled state.
    pub fn acknowledge(&mut self) -> Option<SubmissionState> {
        match self.state {
            SubmissionState::Succeeded | SubmissionState::Failed => {
                let settled = self.state;
                self.state = SubmissionState::Idle;
                Some(settled)
            }
            SubmissionState::Idle | SubmissionState::Submitting => None,
        }
    }

    /// Submits the caller's first review of this recipe.
    ///
    /// Nothing is sent when the caller is anonymous, already has a review here,
    /// picked a grade outside 1..=5, or another submission has not settled.
    /// The local list only changes once the backend accepts the review.
    pub async fn submit(
        &mut self,
        identity: &Identity,
        grade: u8,
        comment: &str,
        snapshot: RecipeSnapshot,
    ) -> Result<Review, ReviewError> {
        let session = identity.session().ok_or(ReviewError::AuthRequired)?.clone();
        if self.store.contains_user(&session.user_id) {
            return Err(ReviewError::AlreadyReviewed);
        }
        let payload = self.prepare(grade, comment, snapshot)?;
        self.send(session, payload).await
    }

    /// Replaces the caller's existing review of this recipe.
    pub async fn edit_review(
        &mut self,
        identity: &Identity,
        grade: u8,
        comment: &str,
        snapshot: RecipeSnapshot,
    ) -> Result<Review, ReviewError> {
        let session = identity.session().ok_or(ReviewError::AuthRequired)?.clone();
        if !self.store.contains_user(&session.user_id) {
            return Err(ReviewError::NotReviewed);
        }
        let payload = self.prepare(grade, comment, snapshot)?;
        self.send(session, payload).await
    }

    fn prepare(
        &self,
        grade: u8,
        comment: &str,
        snapshot: RecipeSnapshot,
    ) -> Result<ReviewPayload, ReviewError> {
        let grade = Grade::try_from(grade)?;
        if self.state != SubmissionState::Idle {
            return Err(ReviewError::SubmissionInFlight);
        }
        Ok(ReviewPayload {
            grade: grade.get(),
            comment: comment.to_string(),
            title: snapshot.title,
            recipe_image: snapshot.image,
        })
    }

    async fn send(&mut self, session: Session, payload: ReviewPayload) -> Result<Review, ReviewError> {
        let flight = InFlight::begin(&mut self.state);

        match self
            .backend
            .post_review(&session, &self.recipe_id, &payload)
            .await
        {
            Ok(echo) => {
                let review = accepted_review(echo, &session.user_id, payload);
                let outcome = self.store.upsert(review.clone());
                flight.finish(SubmissionState::Succeeded);
                match outcome {
                    MergeOutcome::Replaced { position } => {
                        info!(recipe_id = %self.recipe_id, user_id = %session.user_id, position, "review updated")
                    }
                    MergeOutcome::Appended { position } => {
                        info!(recipe_id = %self.recipe_id, user_id = %session.user_id, position, "review added")
                    }
                }
                Ok(review)
            }
            Err(e) => {
                error!(recipe_id = %self.recipe_id, user_id = %session.user_id, error = %e, "review submission failed");
                flight.finish(SubmissionState::Failed);
                Err(e.into())
            }
        }
    }
}

/// Prefers the backend's echo; falls back to the submitted values when the
/// echo is missing or belongs to someone else.
fn accepted_review(echo: Option<Review>, user_id: &str, payload: ReviewPayload) -> Review {
    match echo {
        Some(review) if review.user_id == user_id => review,
        Some(review) => {
            warn!(expected = %user_id, got = %review.user_id, "backend echoed another user's review, using submitted values");
            payload.into_review(user_id)
        }
        None => payload.into_review(user_id),
    }
}
