pub mod connection;
pub mod endpoints;

pub use connection::{RecipeProvider, RecipeSource, ReviewApi, ReviewBackend};
pub use endpoints::{Ingredient, PageParams, Recipe, RecipeSummary, Review, ReviewPayload};
