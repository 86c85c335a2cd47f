use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while resolving and downloading a release asset.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failures, non-success statuses and undecodable bodies.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The asset endpoint answered with something other than a `302 Found`.
    #[error("Expected a 302 redirect from {url}, got {status}")]
    ProtocolViolation { url: String, status: StatusCode },

    /// The asset endpoint redirected without a usable `location` header.
    #[error("Redirect from {url} has no location header")]
    MissingLocation { url: String },

    #[error("Could not find release: {repo} @ {version}")]
    ReleaseNotFound { repo: String, version: String },

    #[error("Could not find assets for release: {repo} @ {version}")]
    AssetsNotFound { repo: String, version: String },

    #[error("Could not find {asset} in {repo}@{version}")]
    AssetNotFound {
        asset: String,
        repo: String,
        version: String,
    },
}
