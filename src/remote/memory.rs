//! In-memory backend for the demo binary and the test suite.
//!
//! Behaves like the hosted backend at the trait level: fetches come back in
//! creation order descending, mutations emit matching change events, and the
//! session is a single in-memory identity. Request counters and failure
//! injection switches exist so tests can observe exactly what was sent.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::remote::backend::{AuthBackend, BookmarkStore, ChangeFeed};
use crate::remote::client::BOOKMARKS_TABLE;
use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::{AuthError, StoreError};
use crate::types::event::{AuthChange, ChangeEvent, ChangeKind};
use crate::types::identity::UserIdentity;

const EVENT_CHANNEL_CAPACITY: usize = 32;

struct StoredRow {
    bookmark: Bookmark,
    seq: u64,
}

/// In-memory stand-in for the remote backend.
pub struct MemoryBackend {
    rows: Mutex<Vec<StoredRow>>,
    user: Mutex<Option<UserIdentity>>,
    seq: AtomicU64,
    fetch_count: AtomicUsize,
    insert_count: AtomicUsize,
    delete_count: AtomicUsize,
    fail_fetches: AtomicBool,
    fail_inserts: AtomicBool,
    fail_auth: AtomicBool,
    auth_events: broadcast::Sender<AuthChange>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (auth_events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (changes, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            rows: Mutex::new(Vec::new()),
            user: Mutex::new(None),
            seq: AtomicU64::new(0),
            fetch_count: AtomicUsize::new(0),
            insert_count: AtomicUsize::new(0),
            delete_count: AtomicUsize::new(0),
            fail_fetches: AtomicBool::new(false),
            fail_inserts: AtomicBool::new(false),
            fail_auth: AtomicBool::new(false),
            auth_events,
            changes,
        }
    }

    /// Installs a signed-in identity, as if an OAuth flow just completed.
    pub fn sign_in_as(&self, id: &str, email: Option<&str>) -> UserIdentity {
        let identity = UserIdentity {
            id: id.to_string(),
            email: email.map(str::to_string),
        };
        *self.user.lock().unwrap() = Some(identity.clone());
        let _ = self
            .auth_events
            .send(AuthChange::SignedIn(identity.clone()));
        identity
    }

    /// Simulates another client writing to the table: the row appears
    /// remotely and a change event is emitted, but no local request is made.
    pub fn push_remote(&self, title: &str, url: &str, user_id: &str) -> Bookmark {
        let bookmark = self.store_row(title, url, user_id);
        let _ = self.changes.send(ChangeEvent {
            kind: ChangeKind::Insert,
            table: BOOKMARKS_TABLE.to_string(),
        });
        bookmark
    }

    /// Emits a bare change event without touching the table.
    pub fn emit_change(&self, kind: ChangeKind) {
        let _ = self.changes.send(ChangeEvent {
            kind,
            table: BOOKMARKS_TABLE.to_string(),
        });
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn insert_count(&self) -> usize {
        self.insert_count.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.delete_count.load(Ordering::SeqCst)
    }

    /// Makes subsequent fetches fail until disabled.
    pub fn set_fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent inserts fail until disabled.
    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Makes identity resolution fail until disabled.
    pub fn set_fail_auth(&self, fail: bool) {
        self.fail_auth.store(fail, Ordering::SeqCst);
    }

    fn store_row(&self, title: &str, url: &str, user_id: &str) -> Bookmark {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let bookmark = Bookmark {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            url: url.to_string(),
            user_id: Some(user_id.to_string()),
            // Opaque, monotonically increasing; only the relative order matters.
            created_at: Some(format!("{:020}", seq)),
        };
        self.rows.lock().unwrap().push(StoredRow {
            bookmark: bookmark.clone(),
            seq,
        });
        bookmark
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthBackend for MemoryBackend {
    async fn current_user(&self) -> Result<Option<UserIdentity>, AuthError> {
        if self.fail_auth.load(Ordering::SeqCst) {
            return Err(AuthError::RequestFailed("injected auth failure".to_string()));
        }
        Ok(self.user.lock().unwrap().clone())
    }

    fn authorize_url(&self, provider: &str) -> String {
        format!("memory://authorize?provider={}", provider)
    }

    async fn begin_session(&self, access_token: &str) -> Result<UserIdentity, AuthError> {
        if access_token.is_empty() {
            return Err(AuthError::InvalidToken("empty token".to_string()));
        }
        // The token doubles as the user id; good enough for a stand-in.
        Ok(self.sign_in_as(access_token, None))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.user.lock().unwrap() = None;
        let _ = self.auth_events.send(AuthChange::SignedOut);
        Ok(())
    }

    fn subscribe_auth(&self) -> broadcast::Receiver<AuthChange> {
        self.auth_events.subscribe()
    }
}

#[async_trait]
impl BookmarkStore for MemoryBackend {
    async fn fetch_all(&self) -> Result<Vec<Bookmark>, StoreError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(StoreError::RequestFailed(
                "injected fetch failure".to_string(),
            ));
        }
        let rows = self.rows.lock().unwrap();
        let mut ordered: Vec<&StoredRow> = rows.iter().collect();
        ordered.sort_by(|a, b| b.seq.cmp(&a.seq));
        Ok(ordered.into_iter().map(|r| r.bookmark.clone()).collect())
    }

    async fn insert(&self, record: &NewBookmark) -> Result<(), StoreError> {
        self.insert_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::RequestFailed(
                "injected insert failure".to_string(),
            ));
        }
        self.store_row(&record.title, &record.url, &record.user_id);
        let _ = self.changes.send(ChangeEvent {
            kind: ChangeKind::Insert,
            table: BOOKMARKS_TABLE.to_string(),
        });
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.delete_count.fetch_add(1, Ordering::SeqCst);
        let removed = {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.bookmark.id != id);
            rows.len() != before
        };
        if removed {
            let _ = self.changes.send(ChangeEvent {
                kind: ChangeKind::Delete,
                table: BOOKMARKS_TABLE.to_string(),
            });
        }
        Ok(())
    }
}

impl ChangeFeed for MemoryBackend {
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}
