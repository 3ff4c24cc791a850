//! Session tracker.
//!
//! Implements `SessionManagerTrait` — resolves the current identity from the
//! auth backend, exposes it (or its absence), and relays identity-change
//! notifications. A failed resolution is logged and treated as "no identity";
//! there is no retry.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::remote::backend::AuthBackend;
use crate::types::errors::AuthError;
use crate::types::event::AuthChange;
use crate::types::identity::UserIdentity;

/// Trait defining session tracking operations.
#[async_trait]
pub trait SessionManagerTrait {
    /// Asks the auth backend who is signed in and records the answer.
    /// Failures reduce to a diagnostic and `None`.
    async fn resolve_identity(&self) -> Option<UserIdentity>;

    /// The identity recorded by the last resolution or change notification.
    fn current_identity(&self) -> Option<UserIdentity>;

    fn is_signed_in(&self) -> bool;

    /// OAuth entry point for the given provider.
    fn sign_in_url(&self, provider: &str) -> String;

    /// Completes an OAuth flow with the token delivered by the redirect.
    async fn complete_sign_in(&self, access_token: &str) -> Result<UserIdentity, AuthError>;

    /// Signs out. Backend failure is logged and swallowed; the local
    /// identity is cleared regardless.
    async fn sign_out(&self);

    /// Subscribes to identity transitions. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;

    /// Folds a change notification into the tracked identity.
    fn apply_change(&self, change: &AuthChange);
}

/// Session tracker backed by the auth surface of the remote backend.
pub struct SessionManager {
    auth: Arc<dyn AuthBackend>,
    identity: RwLock<Option<UserIdentity>>,
}

impl SessionManager {
    pub fn new(auth: Arc<dyn AuthBackend>) -> Self {
        Self {
            auth,
            identity: RwLock::new(None),
        }
    }

    fn set_identity(&self, identity: Option<UserIdentity>) {
        if let Ok(mut guard) = self.identity.write() {
            *guard = identity;
        }
    }
}

#[async_trait]
impl SessionManagerTrait for SessionManager {
    async fn resolve_identity(&self) -> Option<UserIdentity> {
        let identity = match self.auth.current_user().await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!("identity resolution failed: {}", e);
                None
            }
        };
        self.set_identity(identity.clone());
        identity
    }

    fn current_identity(&self) -> Option<UserIdentity> {
        self.identity.read().map(|g| g.clone()).unwrap_or(None)
    }

    fn is_signed_in(&self) -> bool {
        self.current_identity().is_some()
    }

    fn sign_in_url(&self, provider: &str) -> String {
        self.auth.authorize_url(provider)
    }

    async fn complete_sign_in(&self, access_token: &str) -> Result<UserIdentity, AuthError> {
        let identity = self.auth.begin_session(access_token).await?;
        self.set_identity(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) {
        if let Err(e) = self.auth.sign_out().await {
            tracing::warn!("sign-out request failed: {}", e);
        }
        self.set_identity(None);
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.auth.subscribe_auth()
    }

    fn apply_change(&self, change: &AuthChange) {
        match change {
            AuthChange::SignedIn(identity) => self.set_identity(Some(identity.clone())),
            AuthChange::SignedOut => self.set_identity(None),
        }
    }
}
