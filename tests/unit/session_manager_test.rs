use std::sync::Arc;

use cloudmarks::managers::session_manager::{SessionManager, SessionManagerTrait};
use cloudmarks::remote::memory::MemoryBackend;
use cloudmarks::types::event::AuthChange;
use cloudmarks::types::identity::UserIdentity;

#[tokio::test]
async fn test_resolve_identity_when_signed_in() {
    let backend = Arc::new(MemoryBackend::new());
    backend.sign_in_as("user-1", Some("a@example.com"));
    let mgr = SessionManager::new(backend);

    let identity = mgr.resolve_identity().await.unwrap();
    assert_eq!(identity.id, "user-1");
    assert_eq!(identity.email.as_deref(), Some("a@example.com"));
    assert!(mgr.is_signed_in());
    assert_eq!(mgr.current_identity().unwrap().id, "user-1");
}

#[tokio::test]
async fn test_resolve_identity_when_signed_out() {
    let backend = Arc::new(MemoryBackend::new());
    let mgr = SessionManager::new(backend);

    assert!(mgr.resolve_identity().await.is_none());
    assert!(!mgr.is_signed_in());
    assert!(mgr.current_identity().is_none());
}

#[tokio::test]
async fn test_resolution_failure_reduces_to_none() {
    let backend = Arc::new(MemoryBackend::new());
    backend.sign_in_as("user-1", None);
    backend.set_fail_auth(true);
    let mgr = SessionManager::new(backend.clone());

    // The backend has a user, but the request fails; no retry, no error.
    assert!(mgr.resolve_identity().await.is_none());
    assert!(!mgr.is_signed_in());

    backend.set_fail_auth(false);
    assert!(mgr.resolve_identity().await.is_some());
}

#[tokio::test]
async fn test_complete_sign_in_records_identity() {
    let backend = Arc::new(MemoryBackend::new());
    let mgr = SessionManager::new(backend);

    let identity = mgr.complete_sign_in("user-7").await.unwrap();
    assert_eq!(identity.id, "user-7");
    assert_eq!(mgr.current_identity().unwrap().id, "user-7");
}

#[tokio::test]
async fn test_complete_sign_in_rejects_empty_token() {
    let backend = Arc::new(MemoryBackend::new());
    let mgr = SessionManager::new(backend);

    assert!(mgr.complete_sign_in("").await.is_err());
    assert!(!mgr.is_signed_in());
}

#[tokio::test]
async fn test_sign_out_clears_identity() {
    let backend = Arc::new(MemoryBackend::new());
    backend.sign_in_as("user-1", None);
    let mgr = SessionManager::new(backend);

    mgr.resolve_identity().await;
    assert!(mgr.is_signed_in());

    mgr.sign_out().await;
    assert!(!mgr.is_signed_in());
    assert!(mgr.current_identity().is_none());
}

#[tokio::test]
async fn test_sign_in_url_comes_from_backend() {
    let backend = Arc::new(MemoryBackend::new());
    let mgr = SessionManager::new(backend);
    assert_eq!(mgr.sign_in_url("google"), "memory://authorize?provider=google");
}

#[tokio::test]
async fn test_subscribe_relays_backend_transitions() {
    let backend = Arc::new(MemoryBackend::new());
    let mgr = SessionManager::new(backend.clone());
    let mut changes = mgr.subscribe();

    backend.sign_in_as("user-1", None);
    match changes.recv().await.unwrap() {
        AuthChange::SignedIn(identity) => assert_eq!(identity.id, "user-1"),
        other => panic!("expected SignedIn, got {:?}", other),
    }
}

#[test]
fn test_apply_change_folds_into_identity() {
    let backend = Arc::new(MemoryBackend::new());
    let mgr = SessionManager::new(backend);

    let identity = UserIdentity {
        id: "user-9".to_string(),
        email: None,
    };
    mgr.apply_change(&AuthChange::SignedIn(identity));
    assert_eq!(mgr.current_identity().unwrap().id, "user-9");

    mgr.apply_change(&AuthChange::SignedOut);
    assert!(mgr.current_identity().is_none());
}
