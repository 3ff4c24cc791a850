//! In-memory bookmark list cache.
//!
//! The cache is disposable: every refresh replaces the whole collection, and
//! there is no partial update or diffing. A broadcast channel fires after
//! every replace or clear so a view layer knows to re-render.

use std::sync::RwLock;

use tokio::sync::broadcast;

use crate::types::bookmark::Bookmark;

const REFRESH_CHANNEL_CAPACITY: usize = 32;

/// Full-replace cache of the most recently fetched bookmark list.
pub struct ListCache {
    entries: RwLock<Vec<Bookmark>>,
    refreshed: broadcast::Sender<()>,
}

impl ListCache {
    pub fn new() -> Self {
        let (refreshed, _) = broadcast::channel(REFRESH_CHANNEL_CAPACITY);
        Self {
            entries: RwLock::new(Vec::new()),
            refreshed,
        }
    }

    /// Replaces the entire collection with a freshly fetched one.
    pub fn replace_all(&self, entries: Vec<Bookmark>) {
        if let Ok(mut guard) = self.entries.write() {
            *guard = entries;
        }
        let _ = self.refreshed.send(());
    }

    /// Empties the cache (sign-out path).
    pub fn clear(&self) {
        if let Ok(mut guard) = self.entries.write() {
            guard.clear();
        }
        let _ = self.refreshed.send(());
    }

    /// Snapshot of the cached list, in fetch order.
    pub fn snapshot(&self) -> Vec<Bookmark> {
        self.entries.read().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fires after every replace or clear. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.refreshed.subscribe()
    }
}

impl Default for ListCache {
    fn default() -> Self {
        Self::new()
    }
}
