//! Progress reporting types for fetch, enrichment, and merge runs.
//!
//! The library emits these events through an optional callback; the CLI
//! renders them as progress bars on a TTY or structured log lines
//! otherwise.

use chrono::{DateTime, Utc};

/// Progress events emitted during a run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum RunProgress {
    /// Starting to list stargazers for a repository.
    FetchingStargazers {
        /// `owner/repo` being listed.
        repo: String,
    },

    /// Fetched a page of stargazers.
    FetchedPage {
        /// Page number (1-indexed).
        page: u32,
        /// Number of entries on this page.
        count: usize,
        /// Running total of star events collected so far.
        total_so_far: usize,
    },

    /// Finished listing stargazers.
    FetchComplete {
        /// Total star events collected.
        total: usize,
    },

    /// Star events loaded from an existing raw artifact instead of the API.
    LoadedExisting {
        /// Path of the raw artifact.
        path: String,
        /// Events in the artifact before slicing.
        total: usize,
    },

    /// Starting profile enrichment.
    EnrichingUsers {
        /// Number of accounts to enrich.
        total: usize,
        /// Batch label, when running in batch mode.
        label: Option<String>,
    },

    /// One account processed (enriched or degraded).
    EnrichedUser {
        /// The account's login.
        username: String,
        /// 1-based position within this run.
        processed: usize,
        /// Number of accounts in this run.
        total: usize,
        /// Whether a LinkedIn profile URL was extracted.
        profile_link_found: bool,
    },

    /// Profile fetch failed for one account; its record is degraded.
    ProfileError {
        /// The account's login.
        username: String,
        /// Short error message.
        error: String,
    },

    /// Partial results checkpointed to disk.
    CheckpointSaved {
        /// Checkpoint path.
        path: String,
        /// Records in the checkpoint.
        records: usize,
    },

    /// Quota exhausted; sleeping until the window resets.
    QuotaWait {
        /// When the window resets.
        reset_at: DateTime<Utc>,
        /// Seconds the run will sleep.
        wait_secs: u64,
    },

    /// A quota-limited call is being retried.
    QuotaRetry {
        /// Route or operation being retried.
        context: String,
        /// Delay before the retry (ms).
        retry_after_ms: u64,
        /// Current attempt number.
        attempt: u32,
    },

    /// Enrichment finished.
    EnrichComplete {
        /// Records produced.
        enriched: usize,
        /// Records degraded to star data only.
        degraded: usize,
        /// Records with an extracted profile link.
        with_profile_link: usize,
    },

    /// Shutdown was requested; the run stopped at a record boundary.
    Interrupted {
        /// Records processed before stopping.
        processed: usize,
        /// Records this run was asked to process.
        total: usize,
    },

    /// Starting to merge batch files.
    MergingFiles {
        /// Number of files to merge.
        count: usize,
    },

    /// One batch file folded into the merge.
    MergedFile {
        /// Path of the merged file.
        path: String,
        /// Records read from this file.
        records: usize,
        /// Unique records accumulated so far.
        total_so_far: usize,
    },

    /// A batch file was skipped because it could not be parsed.
    SkippedFile {
        /// Path of the skipped file.
        path: String,
        /// Why it was skipped.
        error: String,
    },

    /// Merge finished.
    MergeComplete {
        /// Unique records in the merged output.
        unique: usize,
        /// Files merged.
        files: usize,
        /// Files skipped.
        skipped: usize,
    },

    /// Warning message (non-fatal).
    Warning {
        /// Warning message.
        message: String,
    },
}

/// Callback for progress updates during a run.
pub type ProgressCallback = Box<dyn Fn(RunProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: RunProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emit_with_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let callback: ProgressCallback = Box::new(move |_event| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        emit(Some(&callback), RunProgress::FetchComplete { total: 10 });
        emit(
            Some(&callback),
            RunProgress::EnrichComplete {
                enriched: 10,
                degraded: 0,
                with_profile_link: 3,
            },
        );

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_emit_without_callback() {
        // Must not panic when no callback is installed.
        emit(None, RunProgress::FetchComplete { total: 10 });
    }

    #[test]
    fn test_events_are_cloneable_and_debuggable() {
        let event = RunProgress::EnrichedUser {
            username: "octocat".to_string(),
            processed: 3,
            total: 10,
            profile_link_found: true,
        };

        let cloned = event.clone();
        let debug_str = format!("{:?}", cloned);
        assert!(debug_str.contains("EnrichedUser"));
        assert!(debug_str.contains("octocat"));
    }

    #[test]
    fn test_ordered_event_sequence() {
        let events = Arc::new(std::sync::Mutex::new(Vec::new()));
        let events_clone = Arc::clone(&events);

        let callback: ProgressCallback = Box::new(move |event| {
            events_clone
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(format!("{:?}", event));
        });

        emit(
            Some(&callback),
            RunProgress::FetchingStargazers {
                repo: "rust-lang/rust".to_string(),
            },
        );
        emit(
            Some(&callback),
            RunProgress::FetchedPage {
                page: 1,
                count: 100,
                total_so_far: 100,
            },
        );
        emit(Some(&callback), RunProgress::FetchComplete { total: 100 });

        let recorded = events.lock().unwrap_or_else(|e| e.into_inner());
        assert_eq!(recorded.len(), 3);
        assert!(recorded[0].contains("FetchingStargazers"));
        assert!(recorded[1].contains("FetchedPage"));
        assert!(recorded[2].contains("FetchComplete"));
    }
}
