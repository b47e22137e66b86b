use dotenv::dotenv;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::ConfigError;

pub const RECIPE_API_KEY_ENV_VAR: &str = "RECIPE_API_KEY";
pub const RECIPE_API_URL_ENV_VAR: &str = "RECIPE_API_URL";
pub const REVIEW_API_URL_ENV_VAR: &str = "REVIEW_API_URL";
pub const REVIEW_PAGE_LIMIT_ENV_VAR: &str = "REVIEW_PAGE_LIMIT";

const DEFAULT_RECIPE_API_URL: &str = "https://api.spoonacular.com";
const DEFAULT_REVIEW_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_REVIEW_PAGE_LIMIT: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub recipe_api_url: String,
    pub recipe_api_key: String,
    pub review_api_url: String,
    pub review_page_limit: u32,
}

impl Config {
    /// Reads the configuration from the process environment, loading `.env` first.
    ///
    /// Only the recipe API key is mandatory; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let recipe_api_key = lookup(RECIPE_API_KEY_ENV_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar(RECIPE_API_KEY_ENV_VAR.to_string()))?;

        Ok(Self {
            recipe_api_url: normalize_base_url(
                &lookup(RECIPE_API_URL_ENV_VAR).unwrap_or_else(|| DEFAULT_RECIPE_API_URL.to_string()),
            ),
            recipe_api_key,
            review_api_url: normalize_base_url(
                &lookup(REVIEW_API_URL_ENV_VAR).unwrap_or_else(|| DEFAULT_REVIEW_API_URL.to_string()),
            ),
            review_page_limit: parse_or_default(
                REVIEW_PAGE_LIMIT_ENV_VAR,
                lookup(REVIEW_PAGE_LIMIT_ENV_VAR),
                DEFAULT_REVIEW_PAGE_LIMIT,
            ),
        })
    }
}

pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_or_default<T: FromStr + Display>(key: &str, raw: Option<String>, default: T) -> T
where
    T::Err: Display,
{
    match raw {
        None => {
            debug!("{key} not set, using default: {default}");
            default
        }
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
            default
        }),
    }
}
