//! The merge command: fold enriched batch files into one dataset.

use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use console::Term;

use stargazer::artifact::{ArtifactKind, artifact_path, write_json_atomic};
use stargazer::merge::merge_pattern;
use stargazer::ProgressCallback;

use crate::config::Config;
use crate::progress::ProgressReporter;

pub(crate) fn handle_merge(
    pattern: &str,
    output: Option<&str>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let reporter = Arc::new(ProgressReporter::new());
    let callback: ProgressCallback = {
        let reporter = Arc::clone(&reporter);
        Box::new(move |event| reporter.handle(event))
    };

    let outcome = merge_pattern(Path::new("."), pattern, Some(&callback))?;

    let prefix = output.unwrap_or(&config.run.output);
    let merged_path = artifact_path(
        Path::new("."),
        prefix,
        ArtifactKind::Merged,
        None,
        Local::now(),
    );
    write_json_atomic(&merged_path, &outcome.records)?;

    reporter.finish();
    let summary = format!(
        "Merged {} unique records from {} files into {}",
        outcome.records.len(),
        outcome.merged_files,
        merged_path.display()
    );
    if Term::stdout().is_term() {
        println!("{summary}");
        if outcome.skipped_files > 0 {
            eprintln!(
                "{} file(s) could not be parsed and were skipped",
                outcome.skipped_files
            );
        }
    } else {
        tracing::info!(
            unique = outcome.records.len(),
            files = outcome.merged_files,
            skipped = outcome.skipped_files,
            path = %merged_path.display(),
            "Merge complete"
        );
    }

    Ok(())
}
