//! Background tasks module
//!
//! This module contains the per-timer background tasks: the ticker that
//! drives a countdown and the beeper that repeats the finish alert.

pub mod beeper;
pub mod ticker;

// Re-export main types
pub use beeper::Beeper;
pub(crate) use ticker::ticker_task;

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::warn;

/// Wait for a background task to stop, giving up after `timeout`.
///
/// A task that misses the deadline is aborted and logged; teardown always
/// proceeds (the caller is typically a UI command and must not hang).
pub(crate) async fn join_with_timeout(mut handle: JoinHandle<()>, timeout: Duration, what: &str) {
    match tokio::time::timeout(timeout, &mut handle).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("{} task ended abnormally: {}", what, e),
        Err(_) => {
            warn!("{} task did not stop within {:?}, aborting it", what, timeout);
            handle.abort();
        }
    }
}
