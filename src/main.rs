use anyhow::Result;
use clap::Parser;
use gh_release_asset::commands::{FetchOptions, run};
use gh_release_asset::github::RepoId;
use gh_release_asset::runtime::{RealRuntime, Runtime};
use log::debug;
use std::path::PathBuf;

/// gh-release-asset - download a single asset from a GitHub release
///
/// Every option can also be supplied through the matching `INPUT_*`
/// environment variable, which is how GitHub Actions passes step inputs.
/// When no token is given, GITHUB_TOKEN is used if set.
///
/// Examples:
///   gh-release-asset --repo owner/repo --version v1.0.0 --asset-name build.zip
#[derive(Parser, Debug)]
#[command(
    author,
    version = env!("GH_RELEASE_ASSET_VERSION"),
    about,
    disable_version_flag = true
)]
struct Cli {
    /// The GitHub repository in the format "owner/repo"
    #[arg(long, env = "INPUT_REPO", value_name = "OWNER/REPO")]
    repo: RepoId,

    /// The release tag to fetch the asset from
    #[arg(long, env = "INPUT_VERSION", value_name = "TAG")]
    version: String,

    /// Exact name of the asset to download
    #[arg(long, env = "INPUT_ASSET_NAME", value_name = "NAME")]
    asset_name: String,

    /// Where to save the asset (defaults to the asset name)
    #[arg(long, env = "INPUT_SAVE_AS", value_name = "PATH")]
    save_as: Option<String>,

    /// Access token (falls back to GITHUB_TOKEN)
    #[arg(long, env = "INPUT_ACCESS_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", env = "INPUT_API_URL", value_name = "URL")]
    api_url: Option<String>,
}

impl Cli {
    fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            repo: self.repo.clone(),
            version: self.version.clone(),
            asset_name: self.asset_name.clone(),
            save_as: self
                .save_as
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Escapes a message for a workflow command, so a newline in an error chain
/// cannot end the `::error::` line and start a new command.
fn escape_workflow_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,gh_release_asset=info"),
    )
    .init();
    debug!("gh-release-asset {}", env!("GH_RELEASE_ASSET_VERSION"));

    let cli = Cli::parse();
    let runtime = RealRuntime;
    let in_actions = runtime.env_var("GITHUB_ACTIONS").is_ok_and(|v| v == "true");

    let options = cli.fetch_options();
    if let Err(e) = run(runtime, options, cli.token, cli.api_url).await {
        if in_actions {
            println!("::error::{}", escape_workflow_data(&format!("{:#}", e)));
        }
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_workflow_data() {
        assert_eq!(escape_workflow_data("plain message"), "plain message");
        assert_eq!(
            escape_workflow_data("line one\r\n::set-output name=x::y"),
            "line one%0D%0A::set-output name=x::y"
        );
        assert_eq!(escape_workflow_data("100% done\n"), "100%25 done%0A");
        assert_eq!(escape_workflow_data("%0A"), "%250A");
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "gh-release-asset",
            "--repo",
            "owner/repo",
            "--version",
            "v1.0.0",
            "--asset-name",
            "build.zip",
        ])
        .unwrap();

        assert_eq!(cli.repo.to_string(), "owner/repo");
        assert_eq!(cli.version, "v1.0.0");
        assert_eq!(cli.asset_name, "build.zip");

        let options = cli.fetch_options();
        assert_eq!(options.destination(), PathBuf::from("build.zip"));
    }

    #[test]
    fn test_cli_save_as_and_token() {
        let cli = Cli::try_parse_from([
            "gh-release-asset",
            "--repo",
            "owner/repo",
            "--version",
            "v1.0.0",
            "--asset-name",
            "build.zip",
            "--save-as",
            "dist/out.zip",
            "--token",
            "abc",
            "--api-url",
            "http://localhost:8080",
        ])
        .unwrap();

        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(
            cli.fetch_options().save_as,
            Some(PathBuf::from("dist/out.zip"))
        );
    }

    #[test]
    fn test_cli_empty_save_as_is_unset() {
        let cli = Cli::try_parse_from([
            "gh-release-asset",
            "--repo",
            "owner/repo",
            "--version",
            "v1.0.0",
            "--asset-name",
            "build.zip",
            "--save-as",
            "",
        ])
        .unwrap();

        assert_eq!(cli.fetch_options().save_as, None);
    }

    #[test]
    fn test_cli_invalid_repo_fails() {
        let result = Cli::try_parse_from([
            "gh-release-asset",
            "--repo",
            "not-a-repo",
            "--version",
            "v1.0.0",
            "--asset-name",
            "build.zip",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_missing_asset_name_fails() {
        let result = Cli::try_parse_from([
            "gh-release-asset",
            "--repo",
            "owner/repo",
            "--version",
            "v1.0.0",
        ]);
        // INPUT_ASSET_NAME is not set in the test environment
        if std::env::var("INPUT_ASSET_NAME").is_err() {
            assert!(result.is_err());
        }
    }
}
