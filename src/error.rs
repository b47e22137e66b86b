use reqwest::StatusCode;
use thiserror::Error;

/// Retrieval of a recipe, a search page or a review list failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The review backend rejected the submission or it never arrived.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("submission rejected with {status}: {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("login required to review a recipe")]
    AuthRequired,
    #[error("user has already reviewed this recipe")]
    AlreadyReviewed,
    #[error("user has no review for this recipe to edit")]
    NotReviewed,
    #[error("grade {0} is outside 1..=5")]
    InvalidGrade(u8),
    #[error("another submission is pending or not yet acknowledged")]
    SubmissionInFlight,
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable not set: {0}")]
    MissingVar(String),
}
