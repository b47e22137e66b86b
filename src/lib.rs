pub mod api_connection;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod identity;
pub mod page;
pub mod reviews;
