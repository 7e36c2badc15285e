//! Stargazer enrichment pipeline.
//!
//! # Module Structure
//!
//! - [`types`] - Options, results, and tuning constants
//! - [`progress`] - Progress reporting: `RunProgress`, `ProgressCallback`, `emit()`
//! - [`engine`] - The sequential enrichment loop with checkpointing

pub mod engine;
mod progress;
mod types;

pub use engine::enrich_stargazers;
pub use progress::{ProgressCallback, RunProgress, emit};
pub use types::{
    DEFAULT_BATCH_SIZE, DEFAULT_CHECKPOINT_INTERVAL, DEFAULT_PER_PAGE, EnrichOptions,
    EnrichOutcome,
};
