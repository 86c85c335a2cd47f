//! Service factory for building the HTTP stack from configuration.

use anyhow::Result;
use reqwest::{Client, redirect::Policy};

use crate::{github::GitHub, http::HttpClient};

use super::config::Config;

const USER_AGENT: &str = concat!("gh-release-asset/", env!("GH_RELEASE_ASSET_VERSION"));

/// Build the HTTP client pair. Credentials are attached per request by
/// [`GitHub`], never as client-wide default headers.
pub fn build_http_client() -> Result<HttpClient> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;

    let no_redirect = Client::builder()
        .user_agent(USER_AGENT)
        .redirect(Policy::none())
        .build()?;

    Ok(HttpClient::new(client, no_redirect))
}

/// Build a GitHub client from configuration
pub fn build_github(config: &Config) -> Result<GitHub> {
    let http_client = build_http_client()?;
    GitHub::new(
        http_client,
        Some(config.api_url.clone()),
        config.token.as_deref(),
    )
}
