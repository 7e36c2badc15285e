//! GitHub REST API integration: client, pacing, and pagination.

pub mod client;
pub mod error;
pub mod pacing;
pub mod pagination;
pub mod types;

pub use client::{API_ROOT, GitHubClient, JSON_MEDIA_TYPE, MAX_QUOTA_WAIT, STAR_MEDIA_TYPE};
pub use error::{GitHubError, short_error_message};
pub use pacing::{ApiRateLimiter, COURTESY_RPS};
pub use pagination::PageBounds;
pub use types::{RateLimitResponse, StarEvent, UserProfile};
