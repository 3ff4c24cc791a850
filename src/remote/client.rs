//! HTTP/WebSocket adapter for the hosted backend.
//!
//! Speaks the backend's three public surfaces: the auth REST API
//! (`/auth/v1/...`), the table REST API (`/rest/v1/...`), and the realtime
//! WebSocket (`/realtime/v1/...`, see [`super::realtime`]). The session is a
//! single in-memory access token; nothing is persisted locally.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::RemoteConfig;
use crate::remote::backend::{AuthBackend, BookmarkStore, ChangeFeed};
use crate::remote::realtime;
use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::{AuthError, StoreError};
use crate::types::event::{AuthChange, ChangeEvent};
use crate::types::identity::UserIdentity;

/// Name of the remote table holding bookmark records.
pub const BOOKMARKS_TABLE: &str = "bookmarks";

/// Column the server orders fetches by.
pub const ORDER_COLUMN: &str = "created_at";

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Client for the hosted backend. Implements all three backend traits.
pub struct RemoteClient {
    http: reqwest::Client,
    config: RemoteConfig,
    access_token: RwLock<Option<String>>,
    auth_events: broadcast::Sender<AuthChange>,
    changes: broadcast::Sender<ChangeEvent>,
    realtime_started: AtomicBool,
    realtime_handle: Mutex<Option<JoinHandle<()>>>,
}

impl RemoteClient {
    pub fn new(config: RemoteConfig) -> Self {
        let (auth_events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (changes, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            http: reqwest::Client::new(),
            config,
            access_token: RwLock::new(None),
            auth_events,
            changes,
            realtime_started: AtomicBool::new(false),
            realtime_handle: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// URL of the current-user endpoint.
    pub fn user_url(&self) -> String {
        format!("{}/auth/v1/user", self.config.base_url)
    }

    /// URL of the sign-out endpoint.
    pub fn logout_url(&self) -> String {
        format!("{}/auth/v1/logout", self.config.base_url)
    }

    /// URL fetching every bookmark, ordered by creation time descending.
    pub fn select_url(&self) -> String {
        format!(
            "{}/rest/v1/{}?select=*&order={}.desc",
            self.config.base_url, BOOKMARKS_TABLE, ORDER_COLUMN
        )
    }

    /// URL for inserting bookmark records.
    pub fn insert_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, BOOKMARKS_TABLE)
    }

    /// URL deleting exactly the record with the given id.
    pub fn delete_url(&self, id: &str) -> String {
        format!(
            "{}/rest/v1/{}?id=eq.{}",
            self.config.base_url,
            BOOKMARKS_TABLE,
            percent_encode(id)
        )
    }

    /// Extracts the access token from an OAuth redirect URL.
    ///
    /// The provider delivers tokens in the URL fragment:
    /// `cm://localhost/bookmarks#access_token=...&token_type=bearer&...`
    pub fn parse_access_token(url: &str) -> Option<String> {
        let fragment = url.split_once('#')?.1;
        fragment.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            if key == "access_token" && !value.is_empty() {
                Some(value.to_string())
            } else {
                None
            }
        })
    }

    /// Checks the `exp` claim of a JWT access token against the local clock.
    ///
    /// The signature is never verified; the server remains the authority. A
    /// token that cannot be decoded is reported as not-expired so the server
    /// gets to reject it itself.
    pub fn token_expired(token: &str) -> bool {
        let Some(exp) = jwt_expiry(token) else {
            return false;
        };
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        now >= exp
    }

    fn current_token(&self) -> Option<String> {
        self.access_token.read().ok().and_then(|t| t.clone())
    }

    fn store_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.access_token.write() {
            *guard = token;
        }
    }

    async fn fetch_user(&self, token: &str) -> Result<Option<UserIdentity>, AuthError> {
        let response = self
            .http
            .get(self.user_url())
            .header("apikey", &self.config.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AuthError::ApiError(format!("user endpoint returned {}", status)));
        }

        let identity: UserIdentity = response
            .json()
            .await
            .map_err(|e| AuthError::ApiError(e.to_string()))?;
        Ok(Some(identity))
    }
}

#[async_trait]
impl AuthBackend for RemoteClient {
    async fn current_user(&self) -> Result<Option<UserIdentity>, AuthError> {
        let Some(token) = self.current_token() else {
            return Ok(None);
        };
        if Self::token_expired(&token) {
            return Ok(None);
        }
        self.fetch_user(&token).await
    }

    fn authorize_url(&self, provider: &str) -> String {
        format!(
            "{}/auth/v1/authorize?provider={}&redirect_to={}",
            self.config.base_url,
            provider,
            percent_encode(&self.config.redirect_url)
        )
    }

    async fn begin_session(&self, access_token: &str) -> Result<UserIdentity, AuthError> {
        let identity = self
            .fetch_user(access_token)
            .await?
            .ok_or_else(|| AuthError::InvalidToken("token rejected by server".to_string()))?;
        self.store_token(Some(access_token.to_string()));
        let _ = self.auth_events.send(AuthChange::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let token = self.current_token();
        // The local session ends regardless of what the server says.
        self.store_token(None);
        let _ = self.auth_events.send(AuthChange::SignedOut);

        let Some(token) = token else {
            return Ok(());
        };

        let response = self
            .http
            .post(self.logout_url())
            .header("apikey", &self.config.api_key)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| AuthError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::ApiError(format!(
                "logout endpoint returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    fn subscribe_auth(&self) -> broadcast::Receiver<AuthChange> {
        self.auth_events.subscribe()
    }
}

#[async_trait]
impl BookmarkStore for RemoteClient {
    async fn fetch_all(&self) -> Result<Vec<Bookmark>, StoreError> {
        let mut request = self
            .http
            .get(self.select_url())
            .header("apikey", &self.config.api_key);
        if let Some(token) = self.current_token() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::ApiError(format!("select returned {}", status)));
        }

        response
            .json::<Vec<Bookmark>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn insert(&self, record: &NewBookmark) -> Result<(), StoreError> {
        let mut request = self
            .http
            .post(self.insert_url())
            .header("apikey", &self.config.api_key)
            .header("Prefer", "return=minimal")
            .json(&[record]);
        if let Some(token) = self.current_token() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::ApiError(format!("insert returned {}", status)));
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let mut request = self
            .http
            .delete(self.delete_url(id))
            .header("apikey", &self.config.api_key);
        if let Some(token) = self.current_token() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::ApiError(format!("delete returned {}", status)));
        }
        Ok(())
    }
}

impl ChangeFeed for RemoteClient {
    /// Spawns the realtime feed task. Only the first call has an effect.
    fn start(&self) {
        if self.realtime_started.swap(true, Ordering::SeqCst) {
            return;
        }
        let handle = tokio::spawn(realtime::run_feed(
            self.config.clone(),
            self.changes.clone(),
        ));
        if let Ok(mut guard) = self.realtime_handle.lock() {
            *guard = Some(handle);
        }
    }

    fn stop(&self) {
        if let Ok(mut guard) = self.realtime_handle.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
        self.realtime_started.store(false, Ordering::SeqCst);
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}

/// Reads the `exp` claim from a JWT without verifying it.
fn jwt_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_i64()
}

/// Minimal percent-encoding for URL query components.
pub fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => {
                out.push('%');
                out.push(char::from(b"0123456789ABCDEF"[(b >> 4) as usize]));
                out.push(char::from(b"0123456789ABCDEF"[(b & 0xf) as usize]));
            }
        }
    }
    out
}
