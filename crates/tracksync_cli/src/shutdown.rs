use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration as StdDuration;

use console::Term;

/// Global shutdown flag for graceful termination.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Check if shutdown has been requested.
#[inline]
pub(crate) fn is_shutdown_requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::Acquire)
}

/// Request shutdown.
#[inline]
fn request_shutdown() {
    SHUTDOWN_REQUESTED.store(true, Ordering::Release);
}

/// Set up the Ctrl+C handler for graceful shutdown.
///
/// Shutdown is observed between cycles: the in-flight cycle runs to
/// completion before the worker exits. A second Ctrl+C force-quits.
pub(crate) fn setup_shutdown_handler() {
    tokio::spawn(async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        let is_tty = Term::stdout().is_term();
        if is_tty {
            eprintln!("\n\nShutdown requested, finishing current cycle...");
            eprintln!("Press Ctrl+C again to force quit.");
        } else {
            tracing::warn!("shutdown requested, finishing current cycle");
        }

        request_shutdown();

        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install second Ctrl+C handler");

        if is_tty {
            eprintln!("Force quit!");
        }
        std::process::exit(130);
    });
}

/// Sleep for `duration`, waking early if shutdown is requested.
///
/// Returns `true` when shutdown was requested. Polls the flag at a short
/// interval; sub-second shutdown latency is plenty for a worker that idles
/// minutes between cycles.
pub(crate) async fn sleep_interruptible(duration: StdDuration) -> bool {
    const POLL: StdDuration = StdDuration::from_millis(500);

    let deadline = tokio::time::Instant::now() + duration;
    loop {
        if is_shutdown_requested() {
            return true;
        }
        let now = tokio::time::Instant::now();
        if now >= deadline {
            return false;
        }
        tokio::time::sleep((deadline - now).min(POLL)).await;
    }
}
