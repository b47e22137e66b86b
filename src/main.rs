use anyhow::{Context, Result};
use recipe_reviews::api_connection::{PageParams, RecipeProvider, RecipeSource, ReviewApi};
use recipe_reviews::cli::{parse_args, Command};
use recipe_reviews::config::Config;
use recipe_reviews::display::{render_page, render_review, render_search_results};
use recipe_reviews::identity::Identity;
use recipe_reviews::page::RecipePage;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn mount_page(config: &Config, recipe_id: &str) -> RecipePage {
    let recipes = RecipeProvider::from_config(config);
    let reviews = Arc::new(ReviewApi::from_config(config));
    RecipePage::mount(
        &recipes,
        reviews,
        recipe_id,
        PageParams::first(config.review_page_limit),
    )
    .await
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Load .env before clap reads env-backed flags

    let cli = parse_args();
    init_logging(&cli.log_level);

    let config = Config::from_env().context("Failed to load configuration")?;
    let identity = Identity::from_parts(cli.user_id, cli.token);
    info!(authenticated = identity.is_authenticated(), "starting");

    match cli.command {
        Command::Show { recipe_id } => {
            let page = mount_page(&config, &recipe_id).await;
            print!("{}", render_page(&page, &identity));
            page.unmount();
        }
        Command::Review {
            recipe_id,
            grade,
            comment,
        } => {
            let mut page = mount_page(&config, &recipe_id).await;
            page.draft_mut().grade = grade;
            page.draft_mut().comment = comment;
            let review = page
                .submit_review(&identity)
                .await
                .with_context(|| format!("Failed to review recipe {}", recipe_id))?;
            page.acknowledge();
            println!("Review saved: {}", render_review(&review));
            page.unmount();
        }
        Command::Edit {
            recipe_id,
            grade,
            comment,
        } => {
            let mut page = mount_page(&config, &recipe_id).await;
            let review = page
                .edit_review(&identity, grade, &comment)
                .await
                .with_context(|| format!("Failed to edit review of recipe {}", recipe_id))?;
            page.acknowledge();
            println!("Review updated: {}", render_review(&review));
            page.unmount();
        }
        Command::Search { query } => {
            let recipes = RecipeProvider::from_config(&config);
            let results = recipes
                .search_recipes(&query)
                .await
                .with_context(|| format!("Failed to search recipes for '{}'", query))?;
            print!("{}", render_search_results(&results));
        }
    }

    Ok(())
}
