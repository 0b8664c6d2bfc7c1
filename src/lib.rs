pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod output;
pub mod server;
pub mod tools;

use cli::Cli;
use error::AppResult;

pub use envelope::{Envelope, StatusEnvelope};
pub use tools::Outlook;

pub async fn run(cli: Cli) -> AppResult<()> {
    app::run(cli).await
}
