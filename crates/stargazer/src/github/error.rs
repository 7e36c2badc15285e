//! GitHub API error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur when talking to the GitHub REST API.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limit exhausted. Window resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("Authentication required or token rejected")]
    AuthRequired,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("GitHub API returned status {status}: {body}")]
    Status { status: u16, body: String },
}

impl GitHubError {
    /// Check if this error is a rate limit signal (retryable after waiting).
    #[inline]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Extract a short error message suitable for display.
///
/// Takes the first line of an error message, which is useful for errors
/// that include multi-line response bodies. This provides a concise
/// message for progress reporting and logging.
#[inline]
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    full.lines().next().unwrap_or(&full).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_rate_limited() {
        let rate_limited = GitHubError::RateLimited {
            reset_at: Utc::now(),
        };
        assert!(rate_limited.is_rate_limited());

        let not_found = GitHubError::NotFound("/users/ghost".to_string());
        assert!(!not_found.is_rate_limited());

        let auth_required = GitHubError::AuthRequired;
        assert!(!auth_required.is_rate_limited());

        let status = GitHubError::Status {
            status: 500,
            body: "server error".to_string(),
        };
        assert!(!status.is_rate_limited());
    }

    #[test]
    fn test_short_error_message_takes_first_line() {
        let status = GitHubError::Status {
            status: 422,
            body: "validation failed\ndetails on a second line".to_string(),
        };
        let short = short_error_message(&status);
        assert!(short.contains("422"));
        assert!(!short.contains("second line"));
    }

    #[test]
    fn test_error_display() {
        let err = GitHubError::NotFound("/repos/foo/bar/stargazers".to_string());
        assert_eq!(
            err.to_string(),
            "Not found: /repos/foo/bar/stargazers"
        );
    }
}
