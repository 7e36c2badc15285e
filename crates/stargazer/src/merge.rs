//! Merging enriched batch artifacts into one deduplicated dataset.
//!
//! Records are folded into a map keyed by username: when the same
//! account appears in more than one file, the record from the later file
//! in merge order replaces the earlier one wholesale. Output order is
//! first appearance, so a fixed input order gives a deterministic result.
//! Pattern resolution is a separate step from the fold itself, so the
//! fold can be tested against an explicit path list.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;

use crate::artifact::{self, ArtifactError};
use crate::enrich::{ProgressCallback, RunProgress, emit};
use crate::record::EnrichedRecord;

/// Errors during a merge run.
#[derive(Debug, Error)]
pub enum MergeError {
    /// An empty match set would masquerade as a successful merge of a
    /// real dataset, so it is an error rather than an empty output.
    #[error("no files match pattern {0}")]
    NoMatch(String),

    #[error("cannot read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Result of folding a set of batch files.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// Deduplicated records in first-appearance order.
    pub records: Vec<EnrichedRecord>,
    /// Files successfully folded in.
    pub merged_files: usize,
    /// Malformed files skipped with a warning.
    pub skipped_files: usize,
}

/// Resolve a shell-style file name pattern (`*` and `?` wildcards)
/// against one directory. Matches are sorted by name so merge order,
/// and therefore conflict resolution, is deterministic.
pub fn resolve_pattern(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, MergeError> {
    let matcher = wildcard_regex(pattern);

    let entries = fs::read_dir(dir).map_err(|source| MergeError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| matcher.is_match(name))
        })
        .map(|entry| entry.path())
        .collect();

    paths.sort();
    Ok(paths)
}

/// Fold records from an already-resolved list of paths.
///
/// A file that fails to parse is skipped with a warning; one corrupt
/// batch must not discard its valid siblings.
pub fn merge_paths(paths: &[PathBuf], on_progress: Option<&ProgressCallback>) -> MergeOutcome {
    emit(on_progress, RunProgress::MergingFiles { count: paths.len() });

    let mut outcome = MergeOutcome::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for path in paths {
        match artifact::load_records(path) {
            Ok(records) => {
                let count = records.len();
                for record in records {
                    match index.get(&record.username) {
                        Some(&at) => outcome.records[at] = record,
                        None => {
                            index.insert(record.username.clone(), outcome.records.len());
                            outcome.records.push(record);
                        }
                    }
                }
                outcome.merged_files += 1;
                emit(
                    on_progress,
                    RunProgress::MergedFile {
                        path: path.display().to_string(),
                        records: count,
                        total_so_far: outcome.records.len(),
                    },
                );
            }
            Err(e) => {
                outcome.skipped_files += 1;
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Skipping unreadable batch file"
                );
                emit(
                    on_progress,
                    RunProgress::SkippedFile {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    },
                );
            }
        }
    }

    emit(
        on_progress,
        RunProgress::MergeComplete {
            unique: outcome.records.len(),
            files: outcome.merged_files,
            skipped: outcome.skipped_files,
        },
    );

    outcome
}

/// Resolve `pattern` in `dir` and fold every match.
pub fn merge_pattern(
    dir: &Path,
    pattern: &str,
    on_progress: Option<&ProgressCallback>,
) -> Result<MergeOutcome, MergeError> {
    let paths = resolve_pattern(dir, pattern)?;
    if paths.is_empty() {
        return Err(MergeError::NoMatch(pattern.to_string()));
    }
    Ok(merge_paths(&paths, on_progress))
}

/// Translate a `*`/`?` wildcard pattern into an anchored regex.
fn wildcard_regex(pattern: &str) -> Regex {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');
    Regex::new(&expr).expect("wildcard pattern must translate to a valid regex")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::write_json_atomic;

    fn record(username: &str, company: &str) -> EnrichedRecord {
        EnrichedRecord {
            username: username.to_string(),
            company: Some(company.to_string()),
            ..EnrichedRecord::default()
        }
    }

    fn write_batch(dir: &Path, name: &str, records: &[EnrichedRecord]) -> PathBuf {
        let path = dir.join(name);
        write_json_atomic(&path, &records.to_vec()).unwrap();
        path
    }

    #[test]
    fn test_wildcard_regex() {
        let re = wildcard_regex("stargazers_enriched_*.json");
        assert!(re.is_match("stargazers_enriched_batch_1_20240301_120000.json"));
        assert!(!re.is_match("stargazers_raw_20240301_120000.json"));
        // The dot is literal, not a regex wildcard.
        assert!(!re.is_match("stargazers_enriched_Xjson"));

        let re = wildcard_regex("batch_?.json");
        assert!(re.is_match("batch_1.json"));
        assert!(!re.is_match("batch_12.json"));
    }

    #[test]
    fn test_resolve_pattern_sorted_and_files_only() {
        let dir = tempfile::tempdir().unwrap();
        write_batch(dir.path(), "enriched_b.json", &[]);
        write_batch(dir.path(), "enriched_a.json", &[]);
        fs::create_dir(dir.path().join("enriched_dir.json")).unwrap();

        let paths = resolve_pattern(dir.path(), "enriched_*.json").unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["enriched_a.json", "enriched_b.json"]);
    }

    #[test]
    fn test_merge_last_file_wins_on_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_batch(dir.path(), "b1.json", &[record("a", "one"), record("b", "one")]),
            write_batch(dir.path(), "b2.json", &[record("b", "two"), record("c", "two")]),
            write_batch(
                dir.path(),
                "b3.json",
                &[record("c", "three"), record("d", "three")],
            ),
        ];

        let outcome = merge_paths(&paths, None);

        let usernames: Vec<_> = outcome.records.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(usernames, vec!["a", "b", "c", "d"]);

        let by_name: HashMap<_, _> = outcome
            .records
            .iter()
            .map(|r| (r.username.as_str(), r.company.as_deref().unwrap()))
            .collect();
        assert_eq!(by_name["a"], "one");
        assert_eq!(by_name["b"], "two");
        assert_eq!(by_name["c"], "three");
        assert_eq!(by_name["d"], "three");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let batch = write_batch(dir.path(), "b.json", &[record("a", "x"), record("b", "y")]);

        let outcome = merge_paths(&[batch.clone(), batch], None);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.merged_files, 2);
    }

    #[test]
    fn test_merge_key_set_is_order_independent() {
        let dir = tempfile::tempdir().unwrap();
        let b1 = write_batch(dir.path(), "b1.json", &[record("a", "1"), record("b", "1")]);
        let b2 = write_batch(dir.path(), "b2.json", &[record("b", "2"), record("c", "2")]);

        let forward = merge_paths(&[b1.clone(), b2.clone()], None);
        let reverse = merge_paths(&[b2, b1], None);

        let mut forward_keys: Vec<_> =
            forward.records.iter().map(|r| r.username.clone()).collect();
        let mut reverse_keys: Vec<_> =
            reverse.records.iter().map(|r| r.username.clone()).collect();
        forward_keys.sort();
        reverse_keys.sort();
        assert_eq!(forward_keys, reverse_keys);
    }

    #[test]
    fn test_malformed_file_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_batch(dir.path(), "good.json", &[record("a", "x")]);
        let bad = dir.path().join("bad.json");
        fs::write(&bad, b"{ not json").unwrap();
        let good2 = write_batch(dir.path(), "good2.json", &[record("b", "y")]);

        let outcome = merge_paths(&[good, bad, good2], None);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.merged_files, 2);
        assert_eq!(outcome.skipped_files, 1);
    }

    #[test]
    fn test_merge_pattern_no_match_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = merge_pattern(dir.path(), "enriched_*.json", None).unwrap_err();
        assert!(matches!(err, MergeError::NoMatch(_)));
    }

    #[test]
    fn test_merge_pattern_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_batch(dir.path(), "enriched_1.json", &[record("a", "x")]);
        write_batch(dir.path(), "enriched_2.json", &[record("a", "y"), record("b", "y")]);
        write_batch(dir.path(), "unrelated.txt", &[record("z", "z")]);

        let outcome = merge_pattern(dir.path(), "enriched_*.json", None).unwrap();
        assert_eq!(outcome.records.len(), 2);
        // Sorted name order makes enriched_2 the later file.
        let a = outcome
            .records
            .iter()
            .find(|r| r.username == "a")
            .unwrap();
        assert_eq!(a.company.as_deref(), Some("y"));
    }
}
