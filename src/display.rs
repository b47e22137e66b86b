use crate::api_connection::endpoints::{Ingredient, Recipe, RecipeSummary, Review};
use crate::identity::Identity;
use crate::page::{RecipePage, ReviewPanel};
use crate::reviews::Grade;

pub fn stars(grade: u8) -> String {
    let filled = grade.min(Grade::MAX) as usize;
    let empty = Grade::MAX as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        let rounded = (amount * 100.0).round() / 100.0;
        format!("{}", rounded)
    }
}

pub fn ingredient_line(ingredient: &Ingredient) -> String {
    [format_amount(ingredient.amount), ingredient.unit.clone(), ingredient.name.clone()]
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turns the provider's instruction HTML into plain text lines.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut tag = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let name = tag
                    .trim_start_matches('/')
                    .split(|c: char| c.is_whitespace() || c == '/')
                    .next()
                    .unwrap_or("")
                    .to_ascii_lowercase();
                if matches!(name.as_str(), "br" | "p" | "li" | "ol" | "ul" | "div")
                    && !text.ends_with('\n')
                    && !text.is_empty()
                {
                    text.push('\n');
                }
            }
            _ if in_tag => tag.push(c),
            _ => text.push(c),
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_recipe(recipe: &Recipe) -> String {
    finish(recipe_lines(recipe))
}

fn recipe_lines(recipe: &Recipe) -> Vec<String> {
    let mut lines = vec![recipe.title.clone()];
    if let Some(image) = &recipe.image {
        lines.push(format!("Image: {}", image));
    }
    lines.push(format!("Serves: {}", recipe.servings));
    lines.push(format!("Ready in: {} minutes", recipe.ready_in_minutes));

    lines.push(String::new());
    lines.push("Ingredients:".to_string());
    lines.extend(
        recipe
            .ingredients
            .iter()
            .map(|ingredient| format!("  - {}", ingredient_line(ingredient))),
    );

    lines.push(String::new());
    lines.push("Instructions:".to_string());
    match recipe.instructions.as_deref().map(strip_html) {
        Some(steps) if !steps.is_empty() => {
            lines.extend(steps.lines().map(|line| format!("  {}", line)));
        }
        _ => lines.push("  (no instructions provided)".to_string()),
    }
    lines
}

pub fn render_review(review: &Review) -> String {
    format!("{} {}/5  {}", stars(review.grade), review.grade, review.comment)
}

pub fn render_page(page: &RecipePage, identity: &Identity) -> String {
    let mut lines = Vec::new();
    match (page.recipe(), page.recipe_error()) {
        (Some(recipe), _) => lines.extend(recipe_lines(recipe)),
        (None, Some(e)) => lines.push(format!(
            "Recipe {} could not be loaded: {}",
            page.recipe_id(),
            e
        )),
        (None, None) => {}
    }

    lines.push(String::new());
    lines.push("Reviews:".to_string());
    if let Some(e) = page.review_error() {
        lines.push(format!("  (reviews could not be loaded: {})", e));
    }
    if page.reviews().is_empty() {
        lines.push("  No reviews yet.".to_string());
    }
    lines.extend(
        page.reviews()
            .iter()
            .map(|review| format!("  {}", render_review(review))),
    );

    lines.push(String::new());
    lines.push(match page.review_panel(identity) {
        ReviewPanel::LoginPrompt => "Log in to review this recipe.".to_string(),
        ReviewPanel::AlreadyReviewed => {
            "You have already reviewed this recipe. Use `edit` to change your review.".to_string()
        }
        ReviewPanel::Form => format!(
            "Leave a review with `review {} --grade <1-5> --comment <text>`.",
            page.recipe_id()
        ),
    });
    finish(lines)
}

pub fn render_search_results(results: &[RecipeSummary]) -> String {
    if results.is_empty() {
        return "No recipes found.\n".to_string();
    }
    finish(
        results
            .iter()
            .map(|summary| format!("{:>8}  {}", summary.id, summary.title))
            .collect(),
    )
}

/// Joins rendered lines, each terminated by a newline.
fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
