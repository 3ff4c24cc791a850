use std::fmt;

// === ConfigError ===

/// Errors related to reading connection parameters.
#[derive(Debug)]
pub enum ConfigError {
    /// A required environment variable is missing or empty.
    MissingVar(String),
    /// The configured base URL is not an http(s) URL.
    InvalidUrl(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(name) => {
                write!(f, "Missing environment variable: {}", name)
            }
            ConfigError::InvalidUrl(url) => write!(f, "Invalid backend URL: {}", url),
        }
    }
}

impl std::error::Error for ConfigError {}

// === AuthError ===

/// Errors related to the auth backend.
#[derive(Debug)]
pub enum AuthError {
    /// No session is active for an operation that requires one.
    NotSignedIn,
    /// A network error occurred while talking to the auth endpoint.
    RequestFailed(String),
    /// The auth endpoint rejected the request.
    ApiError(String),
    /// The access token could not be understood.
    InvalidToken(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::NotSignedIn => write!(f, "Not signed in"),
            AuthError::RequestFailed(msg) => write!(f, "Auth request failed: {}", msg),
            AuthError::ApiError(msg) => write!(f, "Auth API error: {}", msg),
            AuthError::InvalidToken(msg) => write!(f, "Invalid access token: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

// === StoreError ===

/// Errors related to the remote bookmark table.
#[derive(Debug)]
pub enum StoreError {
    /// A network error occurred while talking to the table endpoint.
    RequestFailed(String),
    /// The table endpoint rejected the request.
    ApiError(String),
    /// The response body could not be decoded.
    Decode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::RequestFailed(msg) => write!(f, "Store request failed: {}", msg),
            StoreError::ApiError(msg) => write!(f, "Store API error: {}", msg),
            StoreError::Decode(msg) => write!(f, "Store decode error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

// === RealtimeError ===

/// Errors related to the realtime change feed.
#[derive(Debug)]
pub enum RealtimeError {
    /// The WebSocket connection could not be established.
    ConnectFailed(String),
    /// A frame violated the expected protocol.
    Protocol(String),
    /// The server closed the connection.
    Closed,
}

impl fmt::Display for RealtimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RealtimeError::ConnectFailed(msg) => {
                write!(f, "Realtime connect failed: {}", msg)
            }
            RealtimeError::Protocol(msg) => write!(f, "Realtime protocol error: {}", msg),
            RealtimeError::Closed => write!(f, "Realtime connection closed"),
        }
    }
}

impl std::error::Error for RealtimeError {}
