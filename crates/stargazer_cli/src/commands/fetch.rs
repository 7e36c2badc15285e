//! The fetch command: list stargazers, enrich, persist artifacts.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use console::Term;

use stargazer::artifact::{self, ArtifactKind, artifact_path, write_json_atomic};
use stargazer::enrich::{EnrichOptions, enrich_stargazers};
use stargazer::github::{ApiRateLimiter, COURTESY_RPS, GitHubClient, PageBounds, StarEvent};
use stargazer::{ProgressCallback, RepoRef, RunProgress, SliceSpec, emit};

use crate::FetchOptions;
use crate::config::Config;
use crate::progress::ProgressReporter;
use crate::shutdown;

pub(crate) async fn handle_fetch(
    repo: &str,
    opts: FetchOptions,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo_ref = RepoRef::parse(repo)?;
    let slice = SliceSpec::from_options(
        opts.batch_size,
        opts.batch_number,
        opts.skip,
        opts.limit,
        config.run.batch_size,
    )?;

    let is_tty = Term::stdout().is_term();
    let token = opts.token.clone().or_else(|| config.github_token());
    if token.is_none() {
        if is_tty {
            eprintln!(
                "No GitHub token configured; running unauthenticated (60 requests/hour). \
                 Set STARGAZER_GITHUB_TOKEN to raise the quota to 5000/hour."
            );
        } else {
            tracing::warn!("No GitHub token configured; quota is 60 requests/hour");
        }
    }

    let pacer = (!opts.no_pacing).then(|| ApiRateLimiter::new(COURTESY_RPS));
    let client = GitHubClient::new(token.as_deref(), pacer)?;

    let reporter = Arc::new(ProgressReporter::new());
    let callback: ProgressCallback = {
        let reporter = Arc::clone(&reporter);
        Box::new(move |event| reporter.handle(event))
    };

    let started = Local::now();
    let clock = Instant::now();

    let events: Vec<StarEvent> = match &opts.use_existing {
        Some(path) => {
            let all = artifact::load_star_events(path)?;
            emit(
                Some(&callback),
                RunProgress::LoadedExisting {
                    path: path.display().to_string(),
                    total: all.len(),
                },
            );
            slice.apply(all)
        }
        None => {
            let (skip, limit) = slice.bounds();
            client
                .list_stargazers(
                    &repo_ref.owner,
                    &repo_ref.name,
                    config.run.per_page,
                    PageBounds { skip, limit },
                    Some(&callback),
                )
                .await?
        }
    };

    let prefix = opts.output.as_deref().unwrap_or(&config.run.output);
    let label = slice.label();
    let out_dir = Path::new(".");

    let raw_path = artifact_path(out_dir, prefix, ArtifactKind::Raw, label.as_deref(), started);
    write_json_atomic(&raw_path, &events)?;
    report(
        is_tty,
        format!(
            "Raw star data for {} saved to {} ({} events)",
            repo_ref,
            raw_path.display(),
            events.len()
        ),
    );

    if opts.skip_enrichment {
        return Ok(());
    }

    let checkpoint_path = artifact_path(
        out_dir,
        prefix,
        ArtifactKind::Checkpoint,
        label.as_deref(),
        started,
    );
    let enrich_options = EnrichOptions {
        checkpoint_interval: config.run.checkpoint_interval,
        checkpoint_path: Some(checkpoint_path),
        label: label.clone(),
        shutdown: Some(shutdown::shutdown_flag()),
    };

    let outcome = enrich_stargazers(&client, &events, &enrich_options, Some(&callback)).await;

    let enriched_path = artifact_path(
        out_dir,
        prefix,
        ArtifactKind::Enriched,
        label.as_deref(),
        started,
    );
    write_json_atomic(&enriched_path, &outcome.records)?;

    reporter.finish();
    report(
        is_tty,
        format!(
            "Enriched data for {} stargazers saved to {} ({} with LinkedIn URLs, {} degraded, {:.1}s)",
            outcome.records.len(),
            enriched_path.display(),
            outcome.with_profile_link(),
            outcome.degraded.len(),
            clock.elapsed().as_secs_f64()
        ),
    );

    if outcome.interrupted {
        report(
            is_tty,
            format!(
                "Run was interrupted; resume with --use-existing {} --skip {}",
                raw_path.display(),
                outcome.records.len()
            ),
        );
    }

    Ok(())
}

/// Summary lines go to stdout on a TTY and through tracing otherwise.
/// Bars for the preceding phase are already finished at each call site.
fn report(is_tty: bool, line: String) {
    if is_tty {
        println!("{line}");
    } else {
        tracing::info!("{line}");
    }
}
