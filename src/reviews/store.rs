use std::collections::HashMap;

use crate::api_connection::endpoints::Review;
use crate::identity::Identity;

/// What happened to the local list when a review was merged into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Replaced { position: usize },
    Appended { position: usize },
}

/// The review list of one recipe, holding at most one review per user.
///
/// Reviews are keyed by user id; the keyed index points into an ordered
/// sequence so callers still see the backend's order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewStore {
    ordered: Vec<Review>,
    by_user: HashMap<String, usize>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the store from a fetched list. A user appearing more than once
    /// keeps the position of their first entry and the values of their last.
    pub fn from_reviews(reviews: impl IntoIterator<Item = Review>) -> Self {
        let mut store = Self::new();
        for review in reviews {
            store.upsert(review);
        }
        store
    }

    /// Replaces the user's existing review in place, or appends a new one.
    pub fn upsert(&mut self, review: Review) -> MergeOutcome {
        match self.by_user.get(&review.user_id) {
            Some(&position) => {
                self.ordered[position] = review;
                MergeOutcome::Replaced { position }
            }
            None => {
                let position = self.ordered.len();
                self.by_user.insert(review.user_id.clone(), position);
                self.ordered.push(review);
                MergeOutcome::Appended { position }
            }
        }
    }

    pub fn get(&self, user_id: &str) -> Option<&Review> {
        self.by_user.get(user_id).map(|&position| &self.ordered[position])
    }

    pub fn contains_user(&self, user_id: &str) -> bool {
        self.by_user.contains_key(user_id)
    }

    /// True iff `identity` is authenticated and owns a review in this list.
    pub fn has_reviewed(&self, identity: &Identity) -> bool {
        identity
            .user_id()
            .is_some_and(|user_id| self.contains_user(user_id))
    }

    pub fn reviews(&self) -> &[Review] {
        &self.ordered
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Review> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl<'a> IntoIterator for &'a ReviewStore {
    type Item = &'a Review;
    type IntoIter = std::slice::Iter<'a, Review>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
pub(crate) fn review(user_id: &str, grade: u8) -> Review {
    Review {
        user_id: user_id.to_string(),
        grade,
        comment: format!("comment from {user_id}"),
        title: None,
        recipe_image: None,
    }
}
