//! Connection parameters for the remote backend.
//!
//! The backend is an opaque hosted service; the only configuration this
//! application needs is where it lives and the public API key that every
//! request carries.

use std::env;

use crate::types::errors::ConfigError;

/// Environment variable holding the backend project URL.
pub const ENV_URL: &str = "CLOUDMARKS_URL";
/// Environment variable holding the public (anon) API key.
pub const ENV_ANON_KEY: &str = "CLOUDMARKS_ANON_KEY";
/// Environment variable overriding the OAuth redirect target.
pub const ENV_REDIRECT_URL: &str = "CLOUDMARKS_REDIRECT_URL";

/// Default OAuth redirect: the internal bookmarks page served by the webview.
const DEFAULT_REDIRECT_URL: &str = "cm://localhost/bookmarks";

/// Connection parameters for the remote backend.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Project base URL, without a trailing slash.
    pub base_url: String,
    /// Public API key sent as the `apikey` header on every request.
    pub api_key: String,
    /// Where the OAuth provider sends the browser after sign-in.
    pub redirect_url: String,
}

impl RemoteConfig {
    /// Builds a config from explicit values, normalizing the base URL.
    pub fn new(base_url: &str, api_key: &str, redirect_url: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(base_url));
        }
        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            redirect_url: redirect_url.to_string(),
        })
    }

    /// Reads the config from the environment.
    ///
    /// `CLOUDMARKS_URL` and `CLOUDMARKS_ANON_KEY` are required;
    /// `CLOUDMARKS_REDIRECT_URL` defaults to the internal bookmarks page.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = required_var(ENV_URL)?;
        let api_key = required_var(ENV_ANON_KEY)?;
        let redirect_url =
            env::var(ENV_REDIRECT_URL).unwrap_or_else(|_| DEFAULT_REDIRECT_URL.to_string());
        Self::new(&base_url, &api_key, &redirect_url)
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name.to_string())),
    }
}
