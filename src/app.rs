//! App Core for CloudMarks.
//!
//! Central struct wiring a backend into the four view-binding managers and
//! managing the startup/shutdown lifecycle. Every operation here follows the
//! same error-handling design: collaborator failures are reduced to a
//! diagnostic log line, never surfaced as error UI and never retried.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::managers::change_listener::ChangeListener;
use crate::managers::session_manager::{SessionManager, SessionManagerTrait};
use crate::remote::backend::{AuthBackend, BookmarkStore, ChangeFeed};
use crate::types::bookmark::Bookmark;
use crate::types::event::AuthChange;
use crate::types::identity::UserIdentity;

/// Central application struct.
///
/// All methods take `&self`; lifecycle state lives behind mutexes so the
/// whole struct can be shared as `Arc<App>` with a UI layer.
pub struct App {
    pub session_manager: Arc<SessionManager>,
    pub bookmark_manager: Arc<BookmarkManager>,
    feed: Arc<dyn ChangeFeed>,
    change_listener: Mutex<Option<ChangeListener>>,
    auth_watch: Mutex<Option<JoinHandle<()>>>,
}

impl App {
    /// Creates a new App over a backend implementing all three surfaces.
    pub fn new<B>(backend: Arc<B>) -> Self
    where
        B: AuthBackend + BookmarkStore + ChangeFeed + 'static,
    {
        let auth: Arc<dyn AuthBackend> = backend.clone();
        let store: Arc<dyn BookmarkStore> = backend.clone();
        let feed: Arc<dyn ChangeFeed> = backend;

        Self {
            session_manager: Arc::new(SessionManager::new(auth)),
            bookmark_manager: Arc::new(BookmarkManager::new(store)),
            feed,
            change_listener: Mutex::new(None),
            auth_watch: Mutex::new(None),
        }
    }

    /// Startup sequence: resolve the session, populate the list when signed
    /// in, start the change feed and listener, and watch identity changes.
    pub async fn startup(&self) {
        if let Some(user) = self.session_manager.resolve_identity().await {
            tracing::info!(user = %user.id, "session resolved");
            if let Err(e) = self.bookmark_manager.refresh().await {
                tracing::warn!("initial fetch failed: {}", e);
            }
        }

        self.feed.start();
        let listener = ChangeListener::start(&self.feed, self.bookmark_manager.clone());
        *self.change_listener.lock().unwrap() = Some(listener);

        let mut changes = self.session_manager.subscribe();
        let session_manager = self.session_manager.clone();
        let bookmark_manager = self.bookmark_manager.clone();
        let watch = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => {
                        session_manager.apply_change(&change);
                        match change {
                            AuthChange::SignedIn(_) => {
                                if let Err(e) = bookmark_manager.refresh().await {
                                    tracing::warn!("fetch after sign-in failed: {}", e);
                                }
                            }
                            AuthChange::SignedOut => bookmark_manager.clear_cache(),
                        }
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        });
        *self.auth_watch.lock().unwrap() = Some(watch);
    }

    /// Shutdown sequence: tear down the change listener and identity watch.
    pub fn shutdown(&self) {
        if let Some(mut listener) = self.change_listener.lock().unwrap().take() {
            listener.stop();
        }
        self.feed.stop();
        if let Some(watch) = self.auth_watch.lock().unwrap().take() {
            watch.abort();
        }
    }

    /// True while the change listener task is alive.
    pub fn is_listening(&self) -> bool {
        self.change_listener
            .lock()
            .unwrap()
            .as_ref()
            .map(|l| l.is_running())
            .unwrap_or(false)
    }

    pub fn current_identity(&self) -> Option<UserIdentity> {
        self.session_manager.current_identity()
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.bookmark_manager.bookmarks()
    }

    /// Fires whenever the visible list changes (refresh or clear).
    pub fn subscribe_refreshed(&self) -> broadcast::Receiver<()> {
        self.bookmark_manager.subscribe_refreshed()
    }

    pub fn sign_in_url(&self, provider: &str) -> String {
        self.session_manager.sign_in_url(provider)
    }

    /// Completes an OAuth flow; failure is logged only.
    pub async fn complete_sign_in(&self, access_token: &str) {
        match self.session_manager.complete_sign_in(access_token).await {
            Ok(user) => {
                tracing::info!(user = %user.id, "signed in");
                if let Err(e) = self.bookmark_manager.refresh().await {
                    tracing::warn!("fetch after sign-in failed: {}", e);
                }
            }
            Err(e) => tracing::warn!("sign-in failed: {}", e),
        }
    }

    /// Signs out and clears both the identity and the visible list.
    pub async fn sign_out(&self) {
        self.session_manager.sign_out().await;
        self.bookmark_manager.clear_cache();
    }

    /// Creates a bookmark for the signed-in user; failures are logged only.
    /// Empty title or url is a silent no-op.
    pub async fn add_bookmark(&self, title: &str, url: &str) {
        let Some(user) = self.session_manager.current_identity() else {
            tracing::warn!("add_bookmark with no signed-in user");
            return;
        };
        match self.bookmark_manager.add_bookmark(title, url, &user).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!("add_bookmark skipped: empty title or url"),
            Err(e) => tracing::warn!("insert failed: {}", e),
        }
    }

    /// Deletes a bookmark by id; failures are logged only.
    pub async fn delete_bookmark(&self, id: &str) {
        if let Err(e) = self.bookmark_manager.remove_bookmark(id).await {
            tracing::warn!("delete failed: {}", e);
        }
    }
}
