use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use cloudmarks::config::RemoteConfig;
use cloudmarks::remote::client::{percent_encode, RemoteClient};
use cloudmarks::remote::backend::AuthBackend;

fn client() -> RemoteClient {
    let config = RemoteConfig::new(
        "https://proj.example.co",
        "anon-key",
        "cm://localhost/bookmarks",
    )
    .unwrap();
    RemoteClient::new(config)
}

/// Unsigned JWT with the given payload claims. The client never checks the
/// signature, so a dummy one is fine.
fn make_jwt(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{}.{}.sig", header, payload)
}

#[test]
fn test_auth_endpoint_urls() {
    let client = client();
    assert_eq!(client.user_url(), "https://proj.example.co/auth/v1/user");
    assert_eq!(client.logout_url(), "https://proj.example.co/auth/v1/logout");
}

#[test]
fn test_select_url_orders_newest_first() {
    let client = client();
    assert_eq!(
        client.select_url(),
        "https://proj.example.co/rest/v1/bookmarks?select=*&order=created_at.desc"
    );
}

#[test]
fn test_insert_url() {
    let client = client();
    assert_eq!(client.insert_url(), "https://proj.example.co/rest/v1/bookmarks");
}

#[test]
fn test_delete_url_filters_on_exact_id() {
    let client = client();
    assert_eq!(
        client.delete_url("abc-123"),
        "https://proj.example.co/rest/v1/bookmarks?id=eq.abc-123"
    );
}

#[test]
fn test_delete_url_encodes_the_id() {
    let client = client();
    assert_eq!(
        client.delete_url("a b&c"),
        "https://proj.example.co/rest/v1/bookmarks?id=eq.a%20b%26c"
    );
}

#[test]
fn test_authorize_url_carries_provider_and_encoded_redirect() {
    let client = client();
    assert_eq!(
        client.authorize_url("google"),
        "https://proj.example.co/auth/v1/authorize?provider=google\
         &redirect_to=cm%3A%2F%2Flocalhost%2Fbookmarks"
    );
}

#[test]
fn test_parse_access_token_from_fragment() {
    let url = "cm://localhost/bookmarks#access_token=tok123&token_type=bearer&expires_in=3600";
    assert_eq!(
        RemoteClient::parse_access_token(url),
        Some("tok123".to_string())
    );
}

#[test]
fn test_parse_access_token_not_first_pair() {
    let url = "cm://localhost/bookmarks#token_type=bearer&access_token=tok456";
    assert_eq!(
        RemoteClient::parse_access_token(url),
        Some("tok456".to_string())
    );
}

#[test]
fn test_parse_access_token_absent() {
    assert_eq!(RemoteClient::parse_access_token("cm://localhost/bookmarks"), None);
    assert_eq!(
        RemoteClient::parse_access_token("cm://localhost/bookmarks#error=access_denied"),
        None
    );
    assert_eq!(
        RemoteClient::parse_access_token("cm://localhost/bookmarks#access_token="),
        None
    );
}

#[test]
fn test_token_expired_with_past_exp() {
    let token = make_jwt(serde_json::json!({ "sub": "user-1", "exp": 1_000_000_000 }));
    assert!(RemoteClient::token_expired(&token));
}

#[test]
fn test_token_not_expired_with_future_exp() {
    // Far enough in the future to outlive any test run.
    let token = make_jwt(serde_json::json!({ "sub": "user-1", "exp": 4_000_000_000i64 }));
    assert!(!RemoteClient::token_expired(&token));
}

#[test]
fn test_undecodable_token_is_not_reported_expired() {
    // The server gets to reject garbage itself.
    assert!(!RemoteClient::token_expired("not-a-jwt"));
    assert!(!RemoteClient::token_expired("a.%%%.c"));

    let token = make_jwt(serde_json::json!({ "sub": "user-1" }));
    assert!(!RemoteClient::token_expired(&token));
}

#[test]
fn test_percent_encode() {
    assert_eq!(percent_encode("abc-123_~.x"), "abc-123_~.x");
    assert_eq!(percent_encode("a b"), "a%20b");
    assert_eq!(percent_encode("cm://x/y"), "cm%3A%2F%2Fx%2Fy");
    assert_eq!(percent_encode("a=b&c"), "a%3Db%26c");
}
