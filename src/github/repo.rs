use anyhow::{Result, anyhow};
use std::str::FromStr;

/// Repository identifier (owner/repo format).
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            Err(anyhow!(
                "Invalid repository format '{}'. Expected 'owner/repo'.",
                s
            ))
        } else {
            Ok(RepoId {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}
