//! Progress reporting for runs.
//!
//! Two modes:
//! - Interactive mode (TTY): animated progress bars using indicatif
//! - Logging mode (non-TTY): structured logging using tracing
//!
//! Bars are organized as a fetch spinner for pagination and a
//! determinate bar for enrichment; merge activity is line-based.

mod interactive;
mod logging;

use console::Term;
use stargazer::RunProgress;

pub(crate) use interactive::InteractiveReporter;
pub(crate) use logging::LoggingReporter;

/// Progress reporter that handles both interactive and logging modes.
pub(crate) enum ProgressReporter {
    /// Interactive progress bars for a TTY.
    Interactive(InteractiveReporter),
    /// Structured logging for non-TTY (CI, pipes).
    Logging(LoggingReporter),
}

impl ProgressReporter {
    /// Create a new progress reporter, auto-detecting TTY mode.
    pub(crate) fn new() -> Self {
        if Term::stdout().is_term() {
            Self::Interactive(InteractiveReporter::new())
        } else {
            Self::Logging(LoggingReporter::new())
        }
    }

    /// Handle a progress event.
    pub(crate) fn handle(&self, event: RunProgress) {
        match self {
            Self::Interactive(r) => r.handle(event),
            Self::Logging(r) => r.handle(event),
        }
    }

    /// Tear down any live bars so summary output prints cleanly.
    pub(crate) fn finish(&self) {
        if let Self::Interactive(r) = self {
            r.finish();
        }
    }
}
