//! Remote change listener.
//!
//! Subscribes to the table-wide change feed and performs exactly one full
//! refetch per received event, regardless of which record changed or who
//! changed it. A local mutation therefore generally causes two refetches
//! (one from the dispatcher, one from the resulting notification); both are
//! idempotent full replaces.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::remote::backend::ChangeFeed;

/// Listens to the change feed for the lifetime of the view; `stop` (or drop)
/// is the teardown that unsubscribes.
pub struct ChangeListener {
    handle: Option<JoinHandle<()>>,
}

impl ChangeListener {
    /// Subscribes to the feed and spawns the refetch task.
    pub fn start(feed: &Arc<dyn ChangeFeed>, manager: Arc<BookmarkManager>) -> Self {
        let mut events = feed.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        tracing::debug!(kind = ?event.kind, table = %event.table, "remote change");
                        if let Err(e) = manager.refresh().await {
                            tracing::warn!("refetch after remote change failed: {}", e);
                        }
                    }
                    // Missed events collapse into the next refetch anyway.
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    /// Unsubscribes by aborting the refetch task.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for ChangeListener {
    fn drop(&mut self) {
        self.stop();
    }
}
