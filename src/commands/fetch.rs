use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::{
    github::{ReleaseApi, RepoId, fetch_asset_from_release},
    runtime::Runtime,
};

/// What to download and where to put it.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    pub repo: RepoId,
    pub version: String,
    pub asset_name: String,
    pub save_as: Option<PathBuf>,
}

impl FetchOptions {
    /// `save_as` when given, otherwise the asset name in the working directory.
    pub fn destination(&self) -> PathBuf {
        self.save_as
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.asset_name))
    }
}

/// Downloads the requested asset and saves it, returning the saved path.
#[tracing::instrument(skip(runtime, api))]
pub async fn fetch<R: Runtime, A: ReleaseApi + ?Sized>(
    runtime: &R,
    api: &A,
    options: &FetchOptions,
) -> Result<PathBuf> {
    let bytes = fetch_asset_from_release(
        api,
        &options.repo,
        &options.version,
        &options.asset_name,
    )
    .await
    .with_context(|| {
        format!(
            "Failed to fetch {} from {}@{}",
            options.asset_name, options.repo, options.version
        )
    })?;

    let dest = options.destination();
    save_asset(runtime, &dest, &bytes, options.save_as.is_some())?;
    info!(
        "saved {} to file system as {}",
        options.asset_name,
        dest.display()
    );

    emit_output(runtime, &dest)?;

    Ok(dest)
}

/// Writes `bytes` to `<dest>.part` and renames it onto `dest`, so `dest`
/// never holds a truncated file.
#[tracing::instrument(skip(runtime, bytes))]
pub fn save_asset<R: Runtime>(
    runtime: &R,
    dest: &Path,
    bytes: &[u8],
    create_parent: bool,
) -> Result<()> {
    if create_parent
        && let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty())
        && !runtime.exists(parent)
    {
        debug!("Creating directory {:?}", parent);
        runtime
            .create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    let temp_path = part_path(dest);
    debug!("Writing {} bytes to {:?}", bytes.len(), temp_path);

    let result = runtime
        .write(&temp_path, bytes)
        .and_then(|_| runtime.rename(&temp_path, dest));

    if let Err(e) = result {
        if runtime.exists(&temp_path)
            && let Err(cleanup) = runtime.remove_file(&temp_path)
        {
            warn!("Failed to remove {:?}: {}", temp_path, cleanup);
        }
        return Err(e.context(format!("Failed to save asset to {:?}", dest)));
    }

    Ok(())
}

/// Publishes the saved path as the `location` step output when running under
/// GitHub Actions.
fn emit_output<R: Runtime>(runtime: &R, dest: &Path) -> Result<()> {
    let Ok(output_file) = runtime.env_var("GITHUB_OUTPUT") else {
        return Ok(());
    };
    if output_file.is_empty() {
        return Ok(());
    }

    debug!("Writing location output to {}", output_file);
    runtime
        .append(
            Path::new(&output_file),
            format!("location={}\n", dest.display()).as_bytes(),
        )
        .context("Failed to write step output")
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(dest.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}
