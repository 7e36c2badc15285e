//! Stargazer - capture and enrich GitHub repository stargazers.
//!
//! This library lists the accounts that starred a repository (with their
//! starring timestamps), enriches each one with its public profile,
//! heuristically extracts a LinkedIn profile URL from free-text profile
//! fields, and persists everything as durable JSON artifacts. Long runs
//! are partitioned into batches, survive interruption through atomic
//! checkpoints, and the partial outputs merge back into one
//! deduplicated dataset.
//!
//! # Example
//!
//! ```ignore
//! use stargazer::{ApiRateLimiter, COURTESY_RPS, GitHubClient, PageBounds};
//! use stargazer::enrich::{EnrichOptions, enrich_stargazers};
//!
//! let client = GitHubClient::new(Some(&token), Some(ApiRateLimiter::new(COURTESY_RPS)))?;
//! let events = client
//!     .list_stargazers("rust-lang", "rust", 100, PageBounds::all(), None)
//!     .await?;
//! let outcome = enrich_stargazers(&client, &events, &EnrichOptions::default(), None).await;
//! println!("enriched {} stargazers", outcome.records.len());
//! ```

pub mod artifact;
pub mod enrich;
pub mod github;
pub mod linkedin;
pub mod merge;
pub mod record;
pub mod repo_ref;
pub mod retry;
pub mod slice;

pub use artifact::{ArtifactError, ArtifactKind, artifact_path, write_json_atomic};
pub use enrich::{
    EnrichOptions, EnrichOutcome, ProgressCallback, RunProgress, emit, enrich_stargazers,
};
pub use github::{
    ApiRateLimiter, COURTESY_RPS, GitHubClient, GitHubError, PageBounds, StarEvent, UserProfile,
};
pub use merge::{MergeError, MergeOutcome};
pub use record::EnrichedRecord;
pub use repo_ref::{RepoRef, RepoRefError};
pub use slice::{SliceError, SliceSpec};
