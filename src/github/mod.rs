//! GitHub release lookup and asset download.
//!
//! The download is a fixed pipeline: resolve the release for a tag, pick the
//! asset by name, then run the two-hop fetch on the asset's API URL.

mod client;
mod error;
mod repo;
mod types;

use log::debug;

pub use client::{DEFAULT_API_URL, GitHub, ReleaseApi};
#[cfg(test)]
pub use client::MockReleaseApi;
pub use error::FetchError;
pub use repo::RepoId;
pub use types::{Asset, Release};

/// Returns the first asset named exactly `name`.
///
/// GitHub does not guarantee unique asset names; later duplicates are ignored.
pub fn select_asset<'a>(assets: &'a [Asset], name: &str) -> Option<&'a Asset> {
    assets.iter().find(|asset| asset.name == name)
}

/// Fetches a release asset by name for a given repo and tag.
#[tracing::instrument(skip(api))]
pub async fn fetch_asset_from_release<A: ReleaseApi + ?Sized>(
    api: &A,
    repo: &RepoId,
    version: &str,
    asset_name: &str,
) -> Result<Vec<u8>, FetchError> {
    let release = api
        .resolve_release(repo, version)
        .await?
        .ok_or_else(|| FetchError::ReleaseNotFound {
            repo: repo.to_string(),
            version: version.to_string(),
        })?;

    let assets = release
        .assets
        .as_deref()
        .ok_or_else(|| FetchError::AssetsNotFound {
            repo: repo.to_string(),
            version: version.to_string(),
        })?;

    let asset = select_asset(assets, asset_name).ok_or_else(|| FetchError::AssetNotFound {
        asset: asset_name.to_string(),
        repo: repo.to_string(),
        version: version.to_string(),
    })?;

    debug!("Fetching asset {} (id {}) at {}", asset.name, asset.id, asset.url);

    api.fetch_asset(&asset.url).await
}
