use serde::Deserialize;

/// Represents a GitHub release asset.
///
/// `url` is the API endpoint for the asset, not the binary itself; it has to be
/// resolved through [`ReleaseApi::fetch_asset`](super::ReleaseApi::fetch_asset).
#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct Asset {
    pub url: String,
    pub id: u64,
    pub name: String,
}

/// Represents a GitHub release
#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct Release {
    pub url: String,
    pub assets: Option<Vec<Asset>>,
}
