//! Enriched stargazer records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::github::{StarEvent, UserProfile};

/// One stargazer with star metadata, public profile attributes, and the
/// extracted LinkedIn profile URL. The atomic unit of enriched output.
///
/// Every field except `username` is optional and serializes as an
/// explicit `null` rather than a missing key, so all records in an
/// artifact carry the same column set regardless of what the account
/// disclosed. Deserialization defaults missing keys to `None`, which
/// also lets the merge engine read raw star artifacts leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichedRecord {
    pub username: String,
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
    pub starred_at: Option<DateTime<Utc>>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    pub linkedin_url: Option<String>,
}

impl Default for EnrichedRecord {
    fn default() -> Self {
        Self {
            username: String::new(),
            name: None,
            company: None,
            blog: None,
            location: None,
            email: None,
            bio: None,
            twitter_username: None,
            public_repos: None,
            followers: None,
            following: None,
            created_at: None,
            starred_at: None,
            avatar_url: None,
            html_url: None,
            linkedin_url: None,
        }
    }
}

impl EnrichedRecord {
    /// A degraded record carrying only star metadata. Used when the
    /// account's profile cannot be fetched (deleted or renamed since
    /// starring) so one bad account does not fail the batch.
    pub fn from_star_event(event: &StarEvent) -> Self {
        Self {
            username: event.username.clone(),
            starred_at: Some(event.starred_at),
            ..Self::default()
        }
    }

    /// Merge star metadata with a fetched profile.
    pub fn with_profile(event: &StarEvent, profile: UserProfile) -> Self {
        Self {
            username: event.username.clone(),
            name: profile.name,
            company: profile.company,
            blog: profile.blog,
            location: profile.location,
            email: profile.email,
            bio: profile.bio,
            twitter_username: profile.twitter_username,
            public_repos: profile.public_repos,
            followers: profile.followers,
            following: profile.following,
            created_at: profile.created_at,
            starred_at: Some(event.starred_at),
            avatar_url: profile.avatar_url,
            html_url: profile.html_url,
            linkedin_url: None,
        }
    }
}
