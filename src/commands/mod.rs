use anyhow::Result;
use std::path::PathBuf;

use crate::runtime::Runtime;

pub mod config;
mod fetch;
pub mod services;

pub use fetch::{FetchOptions, fetch, save_asset};

use config::Config;
use services::build_github;

/// Resolves configuration, builds the GitHub client and downloads the asset.
#[tracing::instrument(skip(runtime, token, api_url))]
pub async fn run<R: Runtime>(
    runtime: R,
    options: FetchOptions,
    token: Option<String>,
    api_url: Option<String>,
) -> Result<PathBuf> {
    let config = Config::load(&runtime, token, api_url)?;
    let github = build_github(&config)?;
    fetch(&runtime, &github, &options).await
}
