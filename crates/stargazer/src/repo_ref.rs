//! Repository reference parsing.
//!
//! Accepts the bare `owner/repo` form and any github.com URL a user is
//! likely to paste, including the repository's stargazers page itself.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// A GitHub repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

/// Error for repository references that cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized repository reference: {0} (expected owner/repo or a github.com URL)")]
pub struct RepoRefError(pub String);

impl RepoRef {
    /// Parse a repository reference from `owner/repo` or a github.com URL.
    pub fn parse(input: &str) -> Result<Self, RepoRefError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RepoRefError(input.to_string()));
        }

        if !trimmed.contains("github.com") && !trimmed.contains("://") {
            return Self::parse_bare(trimmed).ok_or_else(|| RepoRefError(input.to_string()));
        }

        Self::parse_url(trimmed).ok_or_else(|| RepoRefError(input.to_string()))
    }

    fn parse_bare(input: &str) -> Option<Self> {
        let mut parts = input.trim_matches('/').split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Some(Self {
                    owner: owner.to_string(),
                    name: name.trim_end_matches(".git").to_string(),
                })
            }
            _ => None,
        }
    }

    fn parse_url(input: &str) -> Option<Self> {
        let normalized = if input.contains("://") {
            input.to_string()
        } else {
            format!("https://{input}")
        };

        let url = Url::parse(&normalized).ok()?;
        match url.host_str()? {
            "github.com" | "www.github.com" => {}
            _ => return None,
        }

        let mut segments: Vec<&str> = url
            .path_segments()?
            .filter(|s| !s.is_empty())
            .collect();
        // A pasted stargazers page points at the same repository.
        segments.retain(|s| *s != "stargazers");

        match segments.as_slice() {
            [owner, name, ..] => Some(Self {
                owner: (*owner).to_string(),
                name: name.trim_end_matches(".git").to_string(),
            }),
            _ => None,
        }
    }
}

impl FromStr for RepoRef {
    type Err = RepoRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
