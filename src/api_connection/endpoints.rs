use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_REVIEW_PAGE_LIMIT;

/// Recipe details as returned by the recipe provider's `/recipes/{id}/information`.
/// Only the fields we display are read; everything else in the body is ignored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub servings: u32,
    #[serde(default)]
    pub ready_in_minutes: u32,
    #[serde(rename = "extendedIngredients", default)]
    pub ingredients: Vec<Ingredient>,
    /// HTML fragment, may be absent for some recipes.
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ingredient {
    /// The provider sends `-1` for ingredients it could not match.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecipeSearchResponse {
    #[serde(default)]
    pub results: Vec<RecipeSummary>,
}

/// One user's review of one recipe, as stored by the review backend.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub user_id: String,
    pub grade: u8,
    #[serde(default)]
    pub comment: String,
    /// Recipe title captured at submission time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_image: Option<String>,
}

/// Body of the create-or-update request sent to `/user/{user}/{recipe}/reviews`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    pub grade: u8,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_image: Option<String>,
}

impl ReviewPayload {
    /// The review this payload becomes once accepted for `user_id`.
    pub fn into_review(self, user_id: &str) -> Review {
        Review {
            user_id: user_id.to_string(),
            grade: self.grade,
            comment: self.comment,
            title: self.title,
            recipe_image: self.recipe_image,
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub limit: u32,
    pub offset: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_REVIEW_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl PageParams {
    pub fn first(limit: u32) -> Self {
        Self { limit, offset: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_reads_provider_shape() {
        let json = r#"{
            "id": 716429,
            "title": "Pasta with Garlic",
            "image": "https://img.example/716429.jpg",
            "servings": 2,
            "readyInMinutes": 45,
            "vegan": false,
            "extendedIngredients": [
                {"id": 1001, "amount": 1.5, "unit": "tbsp", "name": "butter", "aisle": "Milk"},
                {"amount": 2, "unit": "", "name": "garlic cloves"}
            ],
            "instructions": "<ol><li>Boil.</li></ol>"
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.title, "Pasta with Garlic");
        assert_eq!(recipe.ready_in_minutes, 45);
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].id, Some(1001));
        assert_eq!(recipe.ingredients[1].id, None);
        assert_eq!(recipe.ingredients[1].amount, 2.0);
    }

    #[test]
    fn test_unmatched_ingredient_id_does_not_fail_recipe() {
        let json = r#"{
            "title": "Soup",
            "extendedIngredients": [
                {"id": -1, "amount": 1, "unit": "pinch", "name": "love"},
                {"id": 11282, "amount": 1, "unit": "", "name": "onion"}
            ]
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].id, Some(-1));
        assert_eq!(recipe.ingredients[0].name, "love");
        assert_eq!(recipe.ingredients[1].id, Some(11282));
    }

    #[test]
    fn test_recipe_null_instructions() {
        let json = r#"{"title": "Toast", "instructions": null, "extendedIngredients": []}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert!(recipe.instructions.is_none());
        assert!(recipe.image.is_none());
    }

    #[test]
    fn test_review_camel_case_fields() {
        let json = r#"{"userId": "u1", "grade": 4, "comment": "good", "recipeImage": "x.jpg"}"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.user_id, "u1");
        assert_eq!(review.recipe_image.as_deref(), Some("x.jpg"));
        assert!(review.title.is_none());
    }

    #[test]
    fn test_payload_omits_missing_snapshot() {
        let payload = ReviewPayload {
            grade: 5,
            comment: "yum".into(),
            title: None,
            recipe_image: Some("a.jpg".into()),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["grade"], 5);
        assert_eq!(value["recipeImage"], "a.jpg");
        assert!(value.get("title").is_none());
    }

    #[test]
    fn test_default_page_is_first_ten() {
        assert_eq!(PageParams::default(), PageParams { limit: 10, offset: 0 });
    }
}
