use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::debug;
use reqwest::{StatusCode, Url};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LOCATION};

use crate::http::HttpClient;

use super::error::FetchError;
use super::repo::RepoId;
use super::types::Release;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const OCTET_STREAM: &str = "application/octet-stream";

/// The two network operations the download pipeline is built from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseApi: Send + Sync {
    /// Looks up the release published under `version`.
    ///
    /// `Ok(None)` means the API answered with a `null` body. HTTP errors,
    /// including 404, come back as [`FetchError::Transport`].
    async fn resolve_release(
        &self,
        repo: &RepoId,
        version: &str,
    ) -> Result<Option<Release>, FetchError>;

    /// Downloads the binary behind an asset API URL.
    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct GitHub {
    http_client: HttpClient,
    api_url: String,
    base_url: Url,
    auth: Option<HeaderValue>,
}

impl GitHub {
    /// An empty or missing token sends no `Authorization` header at all.
    #[tracing::instrument(skip(http_client, api_url, token))]
    pub fn new(
        http_client: HttpClient,
        api_url: Option<String>,
        token: Option<&str>,
    ) -> Result<Self> {
        let api_url = api_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let base_url = Url::parse(&api_url)
            .with_context(|| format!("Invalid GitHub API URL '{}'", api_url))?;
        if base_url.cannot_be_a_base() {
            bail!("GitHub API URL '{}' cannot carry a path", api_url);
        }

        let auth = match token.filter(|t| !t.is_empty()) {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("token {}", token))
                    .context("Access token contains characters not allowed in a header")?;
                value.set_sensitive(true);
                Some(value)
            }
            None => None,
        };

        Ok(Self {
            http_client,
            api_url,
            base_url,
            auth,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Each segment is percent-encoded, so a tag such as `v1#2` cannot turn
    /// into a fragment or an extra path component.
    fn release_url(&self, repo: &RepoId, version: &str) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "repos",
                repo.owner.as_str(),
                repo.repo.as_str(),
                "releases",
                "tags",
                version,
            ]);
        }
        url
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(auth) = &self.auth {
            headers.insert(AUTHORIZATION, auth.clone());
        }
        headers
    }
}

#[async_trait]
impl ReleaseApi for GitHub {
    #[tracing::instrument(skip(self))]
    async fn resolve_release(
        &self,
        repo: &RepoId,
        version: &str,
    ) -> Result<Option<Release>, FetchError> {
        let url = self.release_url(repo, version);
        debug!("Fetching release {}@{} from {}...", repo, version, url);

        let release = self
            .http_client
            .get_json::<Option<Release>>(url.as_str(), self.auth_headers())
            .await?;

        Ok(release)
    }

    /// GitHub answers an `application/octet-stream` request for an asset with a
    /// 302 to object storage, and that storage rejects requests that still
    /// carry the API token. The redirect is therefore followed by hand so the
    /// second request goes out without `Authorization`.
    #[tracing::instrument(skip(self))]
    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut headers = self.auth_headers();
        headers.insert(ACCEPT, HeaderValue::from_static(OCTET_STREAM));

        let response = self.http_client.get_unfollowed(url, headers).await?;

        let status = response.status();
        if status != StatusCode::FOUND {
            return Err(FetchError::ProtocolViolation {
                url: url.to_string(),
                status,
            });
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| response.url().join(value).ok())
            .ok_or_else(|| FetchError::MissingLocation {
                url: url.to_string(),
            })?;

        debug!("Got asset redirect to {}", location);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(OCTET_STREAM));

        let bytes = self
            .http_client
            .get_bytes(location.as_str(), headers)
            .await?;

        Ok(bytes)
    }
}
