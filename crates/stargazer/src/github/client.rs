//! GitHub API client with header-driven rate limit handling.
//!
//! The client owns the quota bookkeeping for one token (or for the
//! unauthenticated quota): after every response it records
//! `x-ratelimit-remaining` / `x-ratelimit-reset`, and before the next
//! request it sleeps until the advertised window reset if the quota is
//! exhausted. That sleep is the only long suspension point in a run.
//! Quota state lives behind the client instance, never in a global, so
//! independent clients (and tests) do not interfere with each other.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, USER_AGENT};
use serde::de::DeserializeOwned;

use crate::enrich::{ProgressCallback, RunProgress, emit};
use crate::retry::with_retry;

use super::error::{GitHubError, short_error_message};
use super::pacing::ApiRateLimiter;
use super::types::RateLimitResponse;

/// Base URL of the GitHub REST API.
pub const API_ROOT: &str = "https://api.github.com";

/// Media type that annotates stargazer listings with starring timestamps.
pub const STAR_MEDIA_TYPE: &str = "application/vnd.github.v3.star+json";

/// Default media type for all other endpoints.
pub const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

/// User agent sent with every request (GitHub rejects anonymous agents).
const CLIENT_USER_AGENT: &str = concat!("stargazer/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on a single quota wait. GitHub windows are one hour; a
/// reset timestamp further out than this indicates clock skew or a
/// garbage header, and sleeping longer would just hang the run.
pub const MAX_QUOTA_WAIT: Duration = Duration::from_secs(65 * 60);

/// Slack added past the advertised reset instant before retrying.
const RESET_SLACK: Duration = Duration::from_secs(1);

/// Fallback wait when a 403/429 response carries no usable reset header.
const EXHAUSTED_FALLBACK_WAIT: Duration = Duration::from_secs(60);

/// Last-seen quota window, updated from response headers.
#[derive(Debug, Clone, Copy, Default)]
struct QuotaState {
    remaining: Option<u32>,
    reset_at: Option<DateTime<Utc>>,
}

/// GitHub REST API client.
///
/// Cloning is cheap and clones share quota state and the pacer, so a
/// clone observes the same rate limit window as the original.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_root: Arc<String>,
    token: Option<Arc<String>>,
    pacer: Option<ApiRateLimiter>,
    quota: Arc<Mutex<QuotaState>>,
}

impl GitHubClient {
    /// Create a client, optionally authenticated with a personal access
    /// token. Authentication only changes the quota ceiling (60 vs 5000
    /// requests per hour); client behavior is otherwise identical.
    pub fn new(token: Option<&str>, pacer: Option<ApiRateLimiter>) -> Result<Self, GitHubError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_root: Arc::new(API_ROOT.to_string()),
            token: token.map(|t| Arc::new(t.to_string())),
            pacer,
            quota: Arc::new(Mutex::new(QuotaState::default())),
        })
    }

    /// Whether this client sends an authorization token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Point the client at a different API root (e.g. GitHub Enterprise).
    #[must_use]
    pub fn with_api_root(mut self, api_root: &str) -> Self {
        self.api_root = Arc::new(api_root.trim_end_matches('/').to_string());
        self
    }

    /// GET a route and deserialize the JSON response.
    ///
    /// Quota exhaustion (403/429 or an exhausted window from a previous
    /// response) is handled internally: the client sleeps until the
    /// window resets and retries once. Any other non-2xx response is
    /// surfaced as a terminal [`GitHubError`] for this call.
    pub async fn get<T: DeserializeOwned>(
        &self,
        route: &str,
        accept: &str,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<T, GitHubError> {
        with_retry(
            || self.send_once(route, accept, on_progress),
            GitHubError::is_rate_limited,
            short_error_message,
            route,
            on_progress,
        )
        .await
    }

    /// Fetch the current rate limit status.
    ///
    /// This endpoint does not count against the quota.
    pub async fn rate_limit(&self) -> Result<RateLimitResponse, GitHubError> {
        self.get("/rate_limit", JSON_MEDIA_TYPE, None).await
    }

    /// Issue one request: wait out an exhausted quota window, pace, send,
    /// record the new quota, and map the response status.
    async fn send_once<T: DeserializeOwned>(
        &self,
        route: &str,
        accept: &str,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<T, GitHubError> {
        self.wait_for_quota(on_progress).await;

        if let Some(pacer) = &self.pacer {
            pacer.wait().await;
        }

        let url = format!("{}{}", self.api_root, route);
        let mut request = self
            .http
            .get(&url)
            .header(ACCEPT, accept)
            .header(USER_AGENT, CLIENT_USER_AGENT);

        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token.as_str()));
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        self.record_quota(&headers);

        match status {
            s if s.is_success() => Ok(response.json::<T>().await?),
            StatusCode::UNAUTHORIZED => Err(GitHubError::AuthRequired),
            StatusCode::NOT_FOUND => Err(GitHubError::NotFound(route.to_string())),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                // Treat as exhausted quota rather than a terminal failure;
                // the retry layer re-enters wait_for_quota and sleeps.
                let reset_at = self.mark_exhausted(&headers);
                Err(GitHubError::RateLimited { reset_at })
            }
            s => {
                let body = response.text().await.unwrap_or_default();
                Err(GitHubError::Status {
                    status: s.as_u16(),
                    body,
                })
            }
        }
    }

    /// If the last response reported an exhausted window, sleep until it
    /// resets, then forget the stale state so the next response's headers
    /// are authoritative again.
    async fn wait_for_quota(&self, on_progress: Option<&ProgressCallback>) {
        let exhausted_until = {
            let quota = self.quota.lock().unwrap_or_else(|e| e.into_inner());
            match (quota.remaining, quota.reset_at) {
                (Some(0), Some(reset_at)) => Some(reset_at),
                _ => None,
            }
        };

        let Some(reset_at) = exhausted_until else {
            return;
        };

        let wait = quota_wait(reset_at, Utc::now());
        if !wait.is_zero() {
            emit(
                on_progress,
                RunProgress::QuotaWait {
                    reset_at,
                    wait_secs: wait.as_secs(),
                },
            );
            tracing::info!(
                wait_secs = wait.as_secs(),
                %reset_at,
                "Rate limit exhausted, sleeping until window resets"
            );
            tokio::time::sleep(wait).await;
        }

        let mut quota = self.quota.lock().unwrap_or_else(|e| e.into_inner());
        quota.remaining = None;
        quota.reset_at = None;
    }

    /// Record the quota window advertised by response headers and log the
    /// remaining budget.
    fn record_quota(&self, headers: &HeaderMap) {
        let (remaining, reset_at, limit) = parse_quota_headers(headers);

        if remaining.is_some() || reset_at.is_some() {
            let mut quota = self.quota.lock().unwrap_or_else(|e| e.into_inner());
            if remaining.is_some() {
                quota.remaining = remaining;
            }
            if reset_at.is_some() {
                quota.reset_at = reset_at;
            }
        }

        if let Some(remaining) = remaining {
            tracing::debug!(remaining, limit = ?limit, "GitHub quota after request");
        }
    }

    /// Force the quota state to exhausted after a 403/429 response and
    /// return the instant the retry should wait for.
    fn mark_exhausted(&self, headers: &HeaderMap) -> DateTime<Utc> {
        let (_, reset_at, _) = parse_quota_headers(headers);
        let reset_at = reset_at
            .or_else(|| retry_after(headers).map(|d| Utc::now() + d))
            .unwrap_or_else(|| Utc::now() + EXHAUSTED_FALLBACK_WAIT);

        let mut quota = self.quota.lock().unwrap_or_else(|e| e.into_inner());
        quota.remaining = Some(0);
        quota.reset_at = Some(reset_at);
        reset_at
    }
}

/// How long to sleep for a window that resets at `reset_at`.
///
/// Never negative, padded by one second past the reset instant, and
/// clamped to [`MAX_QUOTA_WAIT`].
fn quota_wait(reset_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let until_reset = (reset_at - now).to_std().unwrap_or(Duration::ZERO);
    if until_reset.is_zero() {
        return Duration::ZERO;
    }
    (until_reset + RESET_SLACK).min(MAX_QUOTA_WAIT)
}

/// Parse `x-ratelimit-remaining`, `x-ratelimit-reset`, and
/// `x-ratelimit-limit` from response headers.
fn parse_quota_headers(
    headers: &HeaderMap,
) -> (Option<u32>, Option<DateTime<Utc>>, Option<u32>) {
    let header_u64 = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
    };

    let remaining = header_u64("x-ratelimit-remaining").map(|v| v as u32);
    let limit = header_u64("x-ratelimit-limit").map(|v| v as u32);
    let reset_at = header_u64("x-ratelimit-reset")
        .and_then(|epoch| DateTime::from_timestamp(epoch as i64, 0));

    (remaining, reset_at, limit)
}

/// Parse a `Retry-After: <seconds>` header.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}
