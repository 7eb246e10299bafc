//! Requests a GitHub Pages build for a repository as a CI pipeline step.
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod github;

pub use error::{PagesError, Result};

use log::*;

use crate::{config::Config, github::client::GithubClient};

/// Request one page build for the configured repository.
pub async fn run(config: &Config) -> Result<()> {
    let client = GithubClient::new(config)?;
    client.request_page_build(&config.owner, &config.repo).await?;
    info!("Requested page build for {}/{}", config.owner, config.repo);
    Ok(())
}
