//! The sequential enrichment loop.
//!
//! Enrichment is deliberately single-file: every profile fetch draws on
//! the same rate-limit budget, and sequential processing keeps the
//! client's quota bookkeeping consistent. One account that cannot be
//! fetched degrades to a star-only record instead of failing the batch,
//! and accumulated results are checkpointed at a fixed interval so an
//! interrupted run can resume from the last checkpoint via
//! `use_existing` plus a skip.

use std::future::Future;
use std::sync::atomic::Ordering;

use crate::artifact::write_json_atomic;
use crate::github::{
    GitHubClient, GitHubError, JSON_MEDIA_TYPE, StarEvent, UserProfile, short_error_message,
};
use crate::linkedin::extract_profile_url;
use crate::record::EnrichedRecord;

use super::progress::{ProgressCallback, RunProgress, emit};
use super::types::{EnrichOptions, EnrichOutcome};

/// Enrich every star event with the account's public profile and the
/// extracted LinkedIn URL, strictly in order.
pub async fn enrich_stargazers(
    client: &GitHubClient,
    events: &[StarEvent],
    options: &EnrichOptions,
    on_progress: Option<&ProgressCallback>,
) -> EnrichOutcome {
    let fetch = |event: &StarEvent| {
        let route = format!("/users/{}", event.username);
        async move {
            client
                .get::<UserProfile>(&route, JSON_MEDIA_TYPE, on_progress)
                .await
        }
    };

    enrich_with(events, options, fetch, on_progress).await
}

/// The loop itself, generic over the profile fetch so it can be driven
/// by tests without a network.
pub(crate) async fn enrich_with<F, Fut>(
    events: &[StarEvent],
    options: &EnrichOptions,
    mut fetch: F,
    on_progress: Option<&ProgressCallback>,
) -> EnrichOutcome
where
    F: FnMut(&StarEvent) -> Fut,
    Fut: Future<Output = Result<UserProfile, GitHubError>>,
{
    let total = events.len();
    emit(
        on_progress,
        RunProgress::EnrichingUsers {
            total,
            label: options.label.clone(),
        },
    );

    let mut outcome = EnrichOutcome::default();

    for event in events {
        if let Some(flag) = &options.shutdown
            && flag.load(Ordering::Acquire)
        {
            tracing::info!(
                processed = outcome.records.len(),
                total,
                "Shutdown requested, stopping at record boundary"
            );
            emit(
                on_progress,
                RunProgress::Interrupted {
                    processed: outcome.records.len(),
                    total,
                },
            );
            outcome.interrupted = true;
            break;
        }

        let mut record = match fetch(event).await {
            Ok(profile) => EnrichedRecord::with_profile(event, profile),
            Err(e) => {
                // One unavailable account must not fail the run.
                let error = short_error_message(&e);
                tracing::warn!(
                    username = %event.username,
                    error = %error,
                    "Profile fetch failed, keeping star data only"
                );
                emit(
                    on_progress,
                    RunProgress::ProfileError {
                        username: event.username.clone(),
                        error: error.clone(),
                    },
                );
                outcome.degraded.push((event.username.clone(), error));
                EnrichedRecord::from_star_event(event)
            }
        };

        record.linkedin_url = extract_profile_url(
            record.bio.as_deref(),
            record.blog.as_deref(),
            record.company.as_deref(),
        );
        let profile_link_found = record.linkedin_url.is_some();
        outcome.records.push(record);

        emit(
            on_progress,
            RunProgress::EnrichedUser {
                username: event.username.clone(),
                processed: outcome.records.len(),
                total,
                profile_link_found,
            },
        );

        if options.checkpoint_interval > 0
            && outcome.records.len() % options.checkpoint_interval == 0
        {
            checkpoint(&mut outcome, options, on_progress);
        }
    }

    // Completion checkpoint, so the final state is recoverable even if
    // the caller fails before writing the enriched artifact.
    if !outcome.records.is_empty() {
        checkpoint(&mut outcome, options, on_progress);
    }

    emit(
        on_progress,
        RunProgress::EnrichComplete {
            enriched: outcome.records.len(),
            degraded: outcome.degraded.len(),
            with_profile_link: outcome.with_profile_link(),
        },
    );

    outcome
}

/// Atomically replace the checkpoint file with the records so far. A
/// failed checkpoint write is a warning, not a run failure.
fn checkpoint(
    outcome: &mut EnrichOutcome,
    options: &EnrichOptions,
    on_progress: Option<&ProgressCallback>,
) {
    let Some(path) = &options.checkpoint_path else {
        return;
    };

    match write_json_atomic(path, &outcome.records) {
        Ok(()) => {
            outcome.checkpoints += 1;
            tracing::debug!(
                path = %path.display(),
                records = outcome.records.len(),
                "Checkpointed partial results"
            );
            emit(
                on_progress,
                RunProgress::CheckpointSaved {
                    path: path.display().to_string(),
                    records: outcome.records.len(),
                },
            );
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Checkpoint write failed, continuing"
            );
            emit(
                on_progress,
                RunProgress::Warning {
                    message: format!("checkpoint write failed: {e}"),
                },
            );
        }
    }
}
