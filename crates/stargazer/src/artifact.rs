//! Durable JSON artifacts and atomic writes.
//!
//! Every artifact a run produces (raw star lists, enriched datasets,
//! checkpoints, merged outputs) is a JSON array written through
//! [`write_json_atomic`]: serialize to a sibling temporary path, then
//! rename over the target. A crash mid-write can never leave a truncated
//! file as the only copy, so the last checkpoint is always a valid
//! recovery point.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::github::StarEvent;
use crate::record::EnrichedRecord;

/// Errors reading or writing artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The role of an artifact within a run's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Star events as fetched, before enrichment.
    Raw,
    /// Fully enriched records for one run or batch.
    Enriched,
    /// In-progress enrichment state, replaced on every checkpoint.
    Checkpoint,
    /// Deduplicated union of several enriched artifacts.
    Merged,
}

impl ArtifactKind {
    fn tag(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Enriched => "enriched",
            Self::Checkpoint => "checkpoint",
            Self::Merged => "merged",
        }
    }
}

/// Build an artifact path: `{prefix}_{kind}[_{label}]_{timestamp}.json`,
/// where `label` is the batch label and the timestamp makes sibling runs
/// unique.
pub fn artifact_path(
    dir: &Path,
    prefix: &str,
    kind: ArtifactKind,
    label: Option<&str>,
    at: DateTime<Local>,
) -> PathBuf {
    let stamp = at.format("%Y%m%d_%H%M%S");
    let name = match label {
        Some(label) => format!("{prefix}_{}_{label}_{stamp}.json", kind.tag()),
        None => format!("{prefix}_{}_{stamp}.json", kind.tag()),
    };
    dir.join(name)
}

/// Serialize `value` to `path` atomically.
///
/// Writes to a sibling `.tmp` path in the same directory (so the rename
/// never crosses a filesystem boundary) and renames into place.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let body = serde_json::to_vec_pretty(value).map_err(|source| ArtifactError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = tmp_path(path);
    fs::write(&tmp, &body).map_err(|source| ArtifactError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Parse a JSON artifact.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let body = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&body).map_err(|source| ArtifactError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a raw star-event artifact (the `use_existing` input).
pub fn load_star_events(path: &Path) -> Result<Vec<StarEvent>, ArtifactError> {
    read_json(path)
}

/// Load an enriched artifact.
pub fn load_records(path: &Path) -> Result<Vec<EnrichedRecord>, ArtifactError> {
    read_json(path)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
