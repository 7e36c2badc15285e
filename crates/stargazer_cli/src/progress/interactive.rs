use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use stargazer::RunProgress;

/// Bars live for one phase each; the fetch spinner runs during
/// pagination and the enrich bar during enrichment.
#[derive(Default)]
struct ProgressState {
    fetch_bar: Option<ProgressBar>,
    enrich_bar: Option<ProgressBar>,
}

/// Interactive progress reporter using indicatif.
pub(crate) struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub(crate) fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            state: Mutex::new(ProgressState::default()),
        }
    }

    pub(crate) fn handle(&self, event: RunProgress) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        match event {
            RunProgress::FetchingStargazers { repo } => {
                let bar = self.multi.add(ProgressBar::new_spinner());
                bar.set_style(spinner_style());
                bar.enable_steady_tick(Duration::from_millis(100));
                bar.set_message(format!("Fetching stargazers for {repo}..."));
                state.fetch_bar = Some(bar);
            }

            RunProgress::FetchedPage {
                page, total_so_far, ..
            } => {
                if let Some(bar) = &state.fetch_bar {
                    bar.set_message(format!(
                        "Fetching stargazers... page {page}, {total_so_far} so far"
                    ));
                }
            }

            RunProgress::FetchComplete { total } => {
                if let Some(bar) = state.fetch_bar.take() {
                    bar.finish_with_message(format!("Fetched {total} stargazers"));
                }
            }

            RunProgress::LoadedExisting { path, total } => {
                self.println(format!("Loaded {total} stargazers from {path}"));
            }

            RunProgress::EnrichingUsers { total, label } => {
                let bar = self.multi.add(ProgressBar::new(total as u64));
                bar.set_style(bar_style());
                match label {
                    Some(label) => bar.set_message(format!("enriching ({label})")),
                    None => bar.set_message("enriching"),
                }
                state.enrich_bar = Some(bar);
            }

            RunProgress::EnrichedUser { username, .. } => {
                if let Some(bar) = &state.enrich_bar {
                    bar.inc(1);
                    bar.set_message(username);
                }
            }

            RunProgress::ProfileError { username, error } => {
                self.println(format!("  ! {username}: {error}"));
            }

            RunProgress::CheckpointSaved { records, .. } => {
                if let Some(bar) = &state.enrich_bar {
                    bar.set_message(format!("checkpointed {records}"));
                }
            }

            RunProgress::QuotaWait {
                reset_at,
                wait_secs,
            } => {
                let local = reset_at.with_timezone(&chrono::Local);
                self.println(format!(
                    "Rate limit exhausted; sleeping {wait_secs}s until {}",
                    local.format("%H:%M:%S")
                ));
            }

            RunProgress::QuotaRetry {
                context, attempt, ..
            } => {
                self.println(format!("Retrying {context} (attempt {attempt})"));
            }

            RunProgress::EnrichComplete {
                enriched,
                degraded,
                with_profile_link,
            } => {
                if let Some(bar) = state.enrich_bar.take() {
                    bar.finish_with_message(format!(
                        "enriched {enriched} ({with_profile_link} with LinkedIn, {degraded} degraded)"
                    ));
                }
            }

            RunProgress::Interrupted { processed, total } => {
                self.println(format!(
                    "Interrupted after {processed}/{total}; checkpointed results are saved"
                ));
            }

            RunProgress::MergingFiles { count } => {
                self.println(format!("Merging {count} files..."));
            }

            RunProgress::MergedFile {
                path,
                records,
                total_so_far,
            } => {
                self.println(format!("  + {records:>5} records from {path} ({total_so_far} unique)"));
            }

            RunProgress::SkippedFile { path, error } => {
                self.println(format!("  ! skipped {path}: {error}"));
            }

            RunProgress::MergeComplete {
                unique,
                files,
                skipped,
            } => {
                if skipped > 0 {
                    self.println(format!(
                        "Merged {unique} unique records from {files} files ({skipped} skipped)"
                    ));
                } else {
                    self.println(format!("Merged {unique} unique records from {files} files"));
                }
            }

            RunProgress::Warning { message } => {
                self.println(format!("Warning: {message}"));
            }

            _ => {}
        }
    }

    /// Clear any bars that are still live.
    pub(crate) fn finish(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(bar) = state.fetch_bar.take() {
            bar.finish_and_clear();
        }
        if let Some(bar) = state.enrich_bar.take() {
            bar.finish_and_clear();
        }
    }

    /// Print a line above the live bars.
    fn println(&self, line: String) {
        let _ = self.multi.println(line);
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{bar:30.cyan/dim} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}
