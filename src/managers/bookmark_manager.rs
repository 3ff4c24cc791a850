//! Bookmark mutation dispatcher and cache owner.
//!
//! Implements `BookmarkManagerTrait` — create/delete against the remote
//! store plus the wholesale refresh that follows every successful mutation.
//! Nothing here mutates the cache optimistically: the visible list changes
//! only after a successful server round-trip and refetch.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::managers::list_cache::ListCache;
use crate::remote::backend::BookmarkStore;
use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::StoreError;
use crate::types::identity::UserIdentity;

/// Trait defining bookmark dispatch operations.
#[async_trait]
pub trait BookmarkManagerTrait {
    /// Creates a bookmark owned by `owner` and refetches on success.
    ///
    /// Returns `Ok(false)` without sending anything when either field is
    /// empty; the caller surfaces no error for that case.
    async fn add_bookmark(
        &self,
        title: &str,
        url: &str,
        owner: &UserIdentity,
    ) -> Result<bool, StoreError>;

    /// Deletes exactly the record with the given id and refetches on success.
    async fn remove_bookmark(&self, id: &str) -> Result<(), StoreError>;

    /// Fetches all records and replaces the cache wholesale. On failure the
    /// previous cache contents are left untouched (stale but consistent).
    async fn refresh(&self) -> Result<(), StoreError>;

    /// Snapshot of the cached list, in fetch order.
    fn bookmarks(&self) -> Vec<Bookmark>;

    /// Empties the cache without touching the remote store.
    fn clear_cache(&self);
}

/// Bookmark manager backed by a remote store.
pub struct BookmarkManager {
    store: Arc<dyn BookmarkStore>,
    cache: ListCache,
}

impl BookmarkManager {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self {
            store,
            cache: ListCache::new(),
        }
    }

    /// Fires after every cache replace or clear.
    pub fn subscribe_refreshed(&self) -> broadcast::Receiver<()> {
        self.cache.subscribe()
    }
}

#[async_trait]
impl BookmarkManagerTrait for BookmarkManager {
    async fn add_bookmark(
        &self,
        title: &str,
        url: &str,
        owner: &UserIdentity,
    ) -> Result<bool, StoreError> {
        if title.is_empty() || url.is_empty() {
            return Ok(false);
        }

        let record = NewBookmark {
            title: title.to_string(),
            url: url.to_string(),
            user_id: owner.id.clone(),
        };
        self.store.insert(&record).await?;

        if let Err(e) = self.refresh().await {
            tracing::warn!("refetch after insert failed: {}", e);
        }
        Ok(true)
    }

    async fn remove_bookmark(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete_by_id(id).await?;

        if let Err(e) = self.refresh().await {
            tracing::warn!("refetch after delete failed: {}", e);
        }
        Ok(())
    }

    async fn refresh(&self) -> Result<(), StoreError> {
        let records = self.store.fetch_all().await?;
        self.cache.replace_all(records);
        Ok(())
    }

    fn bookmarks(&self) -> Vec<Bookmark> {
        self.cache.snapshot()
    }

    fn clear_cache(&self) {
        self.cache.clear();
    }
}
