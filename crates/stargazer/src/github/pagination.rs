//! Paginated stargazer listing.
//!
//! Walks `GET /repos/{owner}/{repo}/stargazers` from page 1 (or from the
//! first page a skip bound lands in) until a page comes back with fewer
//! than `per_page` entries. The whole listing is materialized in memory;
//! at the tens-of-thousands scale this tool targets, that is a deliberate
//! trade of memory for simplicity. Any error aborts the listing; there
//! is no partial pagination cache, resumption goes through a saved raw
//! artifact instead.

use std::future::Future;

use crate::enrich::{ProgressCallback, RunProgress, emit};

use super::client::{GitHubClient, STAR_MEDIA_TYPE};
use super::error::GitHubError;
use super::types::{StarEvent, StarredBy};

/// Bounds pushed down into pagination so a batch run does not fetch
/// pages it would immediately discard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageBounds {
    /// Number of leading star events to skip.
    pub skip: usize,
    /// Maximum number of star events to return.
    pub limit: Option<usize>,
}

impl PageBounds {
    /// The unbounded listing.
    pub fn all() -> Self {
        Self::default()
    }

    /// First page (1-indexed) that contains any wanted entry.
    fn start_page(&self, per_page: usize) -> u32 {
        (self.skip / per_page) as u32 + 1
    }

    /// Entries to drop from the front of the first fetched page.
    fn first_page_drop(&self, per_page: usize) -> usize {
        self.skip % per_page
    }
}

impl GitHubClient {
    /// List the stargazers of `owner/repo` in page order, with starring
    /// timestamps, bounded by `bounds`.
    pub async fn list_stargazers(
        &self,
        owner: &str,
        repo: &str,
        per_page: usize,
        bounds: PageBounds,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<Vec<StarEvent>, GitHubError> {
        emit(
            on_progress,
            RunProgress::FetchingStargazers {
                repo: format!("{owner}/{repo}"),
            },
        );

        let fetch = |page: u32| {
            let route =
                format!("/repos/{owner}/{repo}/stargazers?per_page={per_page}&page={page}");
            async move {
                let entries: Vec<StarredBy> =
                    self.get(&route, STAR_MEDIA_TYPE, on_progress).await?;
                Ok(entries.into_iter().map(StarEvent::from).collect())
            }
        };

        collect_pages(per_page, bounds, fetch, on_progress).await
    }
}

/// Accumulate pages from `fetch` until a short page or the limit bound.
///
/// Split from [`GitHubClient::list_stargazers`] so the walk and its
/// bounds arithmetic are testable without a network.
async fn collect_pages<F, Fut>(
    per_page: usize,
    bounds: PageBounds,
    mut fetch: F,
    on_progress: Option<&ProgressCallback>,
) -> Result<Vec<StarEvent>, GitHubError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<StarEvent>, GitHubError>>,
{
    let mut events: Vec<StarEvent> = Vec::new();
    let start_page = bounds.start_page(per_page);
    let mut page = start_page;

    loop {
        if let Some(limit) = bounds.limit
            && events.len() >= limit
        {
            break;
        }

        let mut batch = fetch(page).await?;
        let count = batch.len();

        if page == start_page {
            let drop = bounds.first_page_drop(per_page).min(batch.len());
            batch.drain(..drop);
        }

        events.extend(batch);

        emit(
            on_progress,
            RunProgress::FetchedPage {
                page,
                count,
                total_so_far: events.len(),
            },
        );

        // A short page is the terminal condition.
        if count < per_page {
            break;
        }

        page += 1;
    }

    if let Some(limit) = bounds.limit {
        events.truncate(limit);
    }

    emit(
        on_progress,
        RunProgress::FetchComplete {
            total: events.len(),
        },
    );

    Ok(events)
}
