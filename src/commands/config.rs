use anyhow::Result;
use log::debug;

use crate::{github::DEFAULT_API_URL, runtime::Runtime};

/// Resolved settings for talking to the GitHub API.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub token: Option<String>,
}

impl Config {
    /// An explicit token wins; an empty or missing one falls back to `GITHUB_TOKEN`.
    pub fn load<R: Runtime>(
        runtime: &R,
        token: Option<String>,
        api_url: Option<String>,
    ) -> Result<Self> {
        let token = token
            .filter(|t| !t.is_empty())
            .or_else(|| runtime.env_var("GITHUB_TOKEN").ok())
            .filter(|t| !t.is_empty());

        match &token {
            Some(token) => debug!("Using access token for authentication: {}", mask(token)),
            None => debug!("No access token configured, sending unauthenticated requests"),
        }

        let api_url = api_url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self { api_url, token })
    }
}

fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    fn runtime_with_env_token(token: Option<&'static str>) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq("GITHUB_TOKEN"))
            .returning(move |_| {
                token
                    .map(|t| t.to_string())
                    .ok_or(std::env::VarError::NotPresent)
            });
        runtime
    }

    #[test]
    fn test_explicit_token_wins() {
        // No expectations: GITHUB_TOKEN must not be consulted
        let runtime = MockRuntime::new();

        let config = Config::load(&runtime, Some("explicit".into()), None).unwrap();

        assert_eq!(config.token.as_deref(), Some("explicit"));
        assert_eq!(config.api_url, "https://api.github.com");
    }

    #[test]
    fn test_falls_back_to_github_token() {
        let runtime = runtime_with_env_token(Some("from_env"));

        let config = Config::load(&runtime, None, None).unwrap();
        assert_eq!(config.token.as_deref(), Some("from_env"));
    }

    #[test]
    fn test_empty_token_falls_back_to_github_token() {
        let runtime = runtime_with_env_token(Some("from_env"));

        let config = Config::load(&runtime, Some(String::new()), None).unwrap();
        assert_eq!(config.token.as_deref(), Some("from_env"));
    }

    #[test]
    fn test_no_token_anywhere() {
        let runtime = runtime_with_env_token(None);

        let config = Config::load(&runtime, None, None).unwrap();
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_empty_github_token_is_ignored() {
        let runtime = runtime_with_env_token(Some(""));

        let config = Config::load(&runtime, None, None).unwrap();
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_custom_api_url() {
        let runtime = runtime_with_env_token(None);

        let config =
            Config::load(&runtime, None, Some("https://ghe.example.com/api/v3".into())).unwrap();
        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");

        let config = Config::load(&runtime, None, Some(String::new())).unwrap();
        assert_eq!(config.api_url, "https://api.github.com");
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("short"), "*********");
        assert_eq!(mask("ghp_abcdefghijklmnop"), "ghp_*********mnop");
    }
}
