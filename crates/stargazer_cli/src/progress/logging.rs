use stargazer::RunProgress;

/// Logging reporter using tracing for structured output.
pub(crate) struct LoggingReporter;

impl LoggingReporter {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn handle(&self, event: RunProgress) {
        match event {
            RunProgress::FetchingStargazers { repo } => {
                tracing::info!(repo = %repo, "Fetching stargazers");
            }

            RunProgress::FetchedPage {
                page,
                count,
                total_so_far,
            } => {
                tracing::info!(page, count, total_so_far, "Fetched page");
            }

            RunProgress::FetchComplete { total } => {
                tracing::info!(total, "Fetch complete");
            }

            RunProgress::LoadedExisting { path, total } => {
                tracing::info!(path = %path, total, "Loaded star list from existing artifact");
            }

            RunProgress::EnrichingUsers { total, label } => {
                tracing::info!(total, label = ?label, "Enriching stargazers");
            }

            RunProgress::EnrichedUser {
                username,
                processed,
                total,
                profile_link_found,
            } => {
                tracing::info!(
                    user = %username,
                    processed,
                    total,
                    profile_link_found,
                    "Enriched"
                );
            }

            RunProgress::ProfileError { username, error } => {
                tracing::warn!(user = %username, error = %error, "Profile fetch failed");
            }

            RunProgress::CheckpointSaved { path, records } => {
                tracing::debug!(path = %path, records, "Checkpoint saved");
            }

            RunProgress::QuotaWait {
                reset_at,
                wait_secs,
            } => {
                tracing::warn!(
                    %reset_at,
                    wait_secs,
                    "Rate limit exhausted, waiting for window reset"
                );
            }

            RunProgress::QuotaRetry {
                context,
                retry_after_ms,
                attempt,
            } => {
                tracing::warn!(context = %context, retry_after_ms, attempt, "Retrying after rate limit");
            }

            RunProgress::EnrichComplete {
                enriched,
                degraded,
                with_profile_link,
            } => {
                tracing::info!(enriched, degraded, with_profile_link, "Enrichment complete");
            }

            RunProgress::Interrupted { processed, total } => {
                tracing::warn!(processed, total, "Run interrupted, partial results checkpointed");
            }

            RunProgress::MergingFiles { count } => {
                tracing::info!(count, "Merging batch files");
            }

            RunProgress::MergedFile {
                path,
                records,
                total_so_far,
            } => {
                tracing::info!(path = %path, records, total_so_far, "Merged file");
            }

            RunProgress::SkippedFile { path, error } => {
                tracing::warn!(path = %path, error = %error, "Skipped unreadable file");
            }

            RunProgress::MergeComplete {
                unique,
                files,
                skipped,
            } => {
                tracing::info!(unique, files, skipped, "Merge complete");
            }

            RunProgress::Warning { message } => {
                tracing::warn!(message = %message, "Warning");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
