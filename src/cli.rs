use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Recipe details and reviews", long_about = None)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Id of the logged-in user
    #[arg(long, env = "REVIEW_USER_ID", global = true)]
    pub user_id: Option<String>,

    /// Bearer token of the logged-in user
    #[arg(long, env = "REVIEW_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a recipe with its reviews
    Show {
        recipe_id: String,
    },
    /// Review a recipe you have not reviewed yet
    Review {
        recipe_id: String,
        /// Stars, 1 to 5
        #[arg(short, long, default_value_t = 3)]
        grade: u8,
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Change your existing review of a recipe
    Edit {
        recipe_id: String,
        #[arg(short, long)]
        grade: u8,
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Search recipes by name
    Search {
        query: String,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
