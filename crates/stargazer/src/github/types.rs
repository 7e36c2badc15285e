//! GitHub API data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One star on a repository: who starred it and when.
///
/// This is the unit the paginator produces and the shape of raw artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarEvent {
    /// GitHub login of the account that starred the repository.
    pub username: String,
    /// When the star was given.
    pub starred_at: DateTime<Utc>,
}

/// Wire shape of one stargazer listing entry when requested with the
/// `application/vnd.github.v3.star+json` media type.
#[derive(Debug, Clone, Deserialize)]
pub struct StarredBy {
    pub starred_at: DateTime<Utc>,
    pub user: AccountRef,
}

/// Minimal account reference embedded in listing responses.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRef {
    pub login: String,
}

impl From<StarredBy> for StarEvent {
    fn from(entry: StarredBy) -> Self {
        Self {
            username: entry.user.login,
            starred_at: entry.starred_at,
        }
    }
}

/// Public profile attributes from `GET /users/{username}`.
///
/// Everything except the login is at the account owner's discretion, so
/// every field is optional and deserializes to `None` when absent or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub twitter_username: Option<String>,
    pub public_repos: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
}

/// A single rate limit resource entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitResource {
    /// Maximum requests allowed per period.
    pub limit: usize,
    /// Requests used in the current period.
    pub used: usize,
    /// Remaining requests in the current period.
    pub remaining: usize,
    /// Unix timestamp when the rate limit resets.
    pub reset: u64,
}

impl RateLimitResource {
    /// Get the reset time as a DateTime.
    pub fn reset_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.reset as i64, 0).unwrap_or_else(Utc::now)
    }
}

/// Rate limit resources reported by `GET /rate_limit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimits {
    /// Core API rate limit (non-search REST endpoints).
    pub core: RateLimitResource,
    /// Search API rate limit.
    #[serde(default)]
    pub search: Option<RateLimitResource>,
}

/// Full rate limit response from GitHub's API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitResponse {
    /// All rate limit resources.
    pub resources: RateLimits,
}
