use cloudmarks::types::errors::{AuthError, ConfigError, RealtimeError, StoreError};

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingVar("CLOUDMARKS_URL".to_string());
    assert_eq!(
        err.to_string(),
        "Missing environment variable: CLOUDMARKS_URL"
    );

    let err = ConfigError::InvalidUrl("ftp://nope".to_string());
    assert_eq!(err.to_string(), "Invalid backend URL: ftp://nope");
}

#[test]
fn test_auth_error_display() {
    assert_eq!(AuthError::NotSignedIn.to_string(), "Not signed in");
    assert_eq!(
        AuthError::RequestFailed("connection refused".to_string()).to_string(),
        "Auth request failed: connection refused"
    );
    assert_eq!(
        AuthError::ApiError("user endpoint returned 500".to_string()).to_string(),
        "Auth API error: user endpoint returned 500"
    );
    assert_eq!(
        AuthError::InvalidToken("empty token".to_string()).to_string(),
        "Invalid access token: empty token"
    );
}

#[test]
fn test_store_error_display() {
    assert_eq!(
        StoreError::RequestFailed("timeout".to_string()).to_string(),
        "Store request failed: timeout"
    );
    assert_eq!(
        StoreError::ApiError("select returned 403".to_string()).to_string(),
        "Store API error: select returned 403"
    );
    assert_eq!(
        StoreError::Decode("invalid json".to_string()).to_string(),
        "Store decode error: invalid json"
    );
}

#[test]
fn test_realtime_error_display() {
    assert_eq!(
        RealtimeError::ConnectFailed("dns failure".to_string()).to_string(),
        "Realtime connect failed: dns failure"
    );
    assert_eq!(
        RealtimeError::Protocol("bad frame".to_string()).to_string(),
        "Realtime protocol error: bad frame"
    );
    assert_eq!(RealtimeError::Closed.to_string(), "Realtime connection closed");
}

#[test]
fn test_errors_implement_std_error() {
    fn assert_error<E: std::error::Error>(_e: &E) {}
    assert_error(&ConfigError::MissingVar("X".to_string()));
    assert_error(&AuthError::NotSignedIn);
    assert_error(&StoreError::Decode("x".to_string()));
    assert_error(&RealtimeError::Closed);
}
