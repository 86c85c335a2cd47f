//! HTTP client wrapper used by the GitHub API layer.

use log::debug;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// Thin wrapper around two reqwest clients: one that follows redirects the
/// usual way and one that hands every 3xx response back to the caller.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    no_redirect: Client,
}

impl HttpClient {
    /// `no_redirect` must be built with `redirect::Policy::none()`.
    pub fn new(client: Client, no_redirect: Client) -> Self {
        Self {
            client,
            no_redirect,
        }
    }

    /// Returns a reference to the redirect-following reqwest Client.
    #[cfg(test)]
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request and deserializes the JSON response.
    /// Any non-success status is reported as an error.
    #[tracing::instrument(skip(self, headers))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> reqwest::Result<T> {
        debug!("GET JSON from {}...", url);

        self.client
            .get(url)
            .headers(headers)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }

    /// Performs a GET request without following redirects and returns the
    /// response as-is, whatever its status.
    #[tracing::instrument(skip(self, headers))]
    pub async fn get_unfollowed(&self, url: &str, headers: HeaderMap) -> reqwest::Result<Response> {
        debug!("GET (no redirects) {}...", url);

        self.no_redirect.get(url).headers(headers).send().await
    }

    /// Performs a GET request and buffers the raw response body.
    /// Any non-success status is reported as an error.
    #[tracing::instrument(skip(self, headers))]
    pub async fn get_bytes(&self, url: &str, headers: HeaderMap) -> reqwest::Result<Vec<u8>> {
        debug!("GET bytes from {}...", url);

        let response = self.client.get(url).headers(headers).send().await?;
        debug!("asset request status: {}", response.status());

        let body = response.error_for_status()?.bytes().await?;

        debug!(
            "Downloaded {:.2} MB",
            body.len() as f64 / (1024.0 * 1024.0)
        );

        Ok(body.to_vec())
    }
}
