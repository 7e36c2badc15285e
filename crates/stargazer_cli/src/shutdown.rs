use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

use console::Term;

/// Global shutdown flag for graceful termination.
static SHUTDOWN: LazyLock<Arc<AtomicBool>> = LazyLock::new(|| Arc::new(AtomicBool::new(false)));

/// Handle to the shutdown flag, polled by the enrichment loop.
pub(crate) fn shutdown_flag() -> Arc<AtomicBool> {
    Arc::clone(&SHUTDOWN)
}

/// Set up the Ctrl+C handler for graceful shutdown.
pub(crate) fn setup_shutdown_handler() {
    tokio::spawn(async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        if Term::stdout().is_term() {
            eprintln!("\n\nShutdown requested, finishing the current record...");
            eprintln!("Checkpointed results will be saved before exiting.");
        } else {
            tracing::warn!("Shutdown requested, finishing the current record");
        }

        SHUTDOWN.store(true, Ordering::Release);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_handles_share_state() {
        let a = shutdown_flag();
        let b = shutdown_flag();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!a.load(Ordering::Acquire));
    }
}
