//! Trait seams for the three consumed surfaces of the remote backend:
//! auth, data query, and realtime change notification.
//!
//! The view-binding layer only ever sees these traits; whether they are
//! backed by HTTP or by an in-memory table is invisible to it.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::{AuthError, StoreError};
use crate::types::event::{AuthChange, ChangeEvent};
use crate::types::identity::UserIdentity;

/// The auth surface: current identity, OAuth entry point, sign-out, and
/// identity-change notifications.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Resolves the currently authenticated user, or `None` when there is no
    /// active session (including a locally expired or rejected one).
    async fn current_user(&self) -> Result<Option<UserIdentity>, AuthError>;

    /// Builds the OAuth sign-in URL for the given provider.
    fn authorize_url(&self, provider: &str) -> String;

    /// Installs the access token delivered by the OAuth redirect and resolves
    /// the identity it belongs to. Emits [`AuthChange::SignedIn`] on success.
    async fn begin_session(&self, access_token: &str) -> Result<UserIdentity, AuthError>;

    /// Ends the session. The local session is always cleared and
    /// [`AuthChange::SignedOut`] emitted, even when revocation fails remotely.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Subscribes to identity transitions. Dropping the receiver unsubscribes.
    fn subscribe_auth(&self) -> broadcast::Receiver<AuthChange>;
}

/// The data-query surface over the bookmarks table.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Fetches every visible record, ordered by creation time descending.
    async fn fetch_all(&self) -> Result<Vec<Bookmark>, StoreError>;

    /// Inserts one record. The server assigns id, owner and timestamp columns.
    async fn insert(&self, record: &NewBookmark) -> Result<(), StoreError>;

    /// Deletes exactly the record with the given id.
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
}

/// The realtime surface: a table-wide change feed with event filter `*`.
pub trait ChangeFeed: Send + Sync {
    /// Begins delivering events. Idempotent; a no-op for backends that emit
    /// events inline with mutations.
    fn start(&self) {}

    /// Stops delivering events. A no-op for backends with nothing to tear down.
    fn stop(&self) {}

    /// Subscribes to change events. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}
