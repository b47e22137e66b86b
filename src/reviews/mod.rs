pub mod reconciler;
pub mod store;
#[cfg(test)]
pub(crate) mod testing;

pub use reconciler::{Grade, Reconciler, RecipeSnapshot, ReviewDraft, SubmissionState};
pub use store::{MergeOutcome, ReviewStore};
