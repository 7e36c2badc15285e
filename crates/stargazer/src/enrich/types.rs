//! Options, results, and tuning constants for enrichment runs.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Stargazers fetched per listing page. GitHub's maximum.
pub const DEFAULT_PER_PAGE: usize = 100;

/// Default batch size when batch mode is used without an explicit size.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Checkpoint the accumulated records after this many enriched accounts.
pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 10;

/// Options for one enrichment run.
#[derive(Debug, Clone, Default)]
pub struct EnrichOptions {
    /// Records between checkpoint writes. Zero disables interval
    /// checkpoints (the completion checkpoint is still written).
    pub checkpoint_interval: usize,
    /// Where to checkpoint partial results. No checkpointing when unset.
    pub checkpoint_path: Option<PathBuf>,
    /// Batch label carried into progress events.
    pub label: Option<String>,
    /// Cooperative shutdown flag, polled between records.
    pub shutdown: Option<Arc<AtomicBool>>,
}

impl EnrichOptions {
    /// Options with the default checkpoint interval and a checkpoint path.
    pub fn checkpointing_to(path: PathBuf) -> Self {
        Self {
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            checkpoint_path: Some(path),
            ..Self::default()
        }
    }
}

/// What an enrichment run produced.
#[derive(Debug, Default)]
#[must_use = "EnrichOutcome may record failures that should be reported"]
pub struct EnrichOutcome {
    /// One record per processed star event, in input order.
    pub records: Vec<crate::record::EnrichedRecord>,
    /// Accounts whose profile fetch failed: (username, short error).
    /// Their records are degraded, not dropped.
    pub degraded: Vec<(String, String)>,
    /// Checkpoints written during the run.
    pub checkpoints: usize,
    /// Whether the run stopped early on a shutdown request.
    pub interrupted: bool,
}

impl EnrichOutcome {
    /// Records with an extracted LinkedIn profile URL.
    pub fn with_profile_link(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.linkedin_url.is_some())
            .count()
    }
}
