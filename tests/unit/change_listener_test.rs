use std::sync::Arc;
use std::time::Duration;

use cloudmarks::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use cloudmarks::managers::change_listener::ChangeListener;
use cloudmarks::remote::backend::ChangeFeed;
use cloudmarks::remote::memory::MemoryBackend;
use cloudmarks::types::event::ChangeKind;

const WAIT: Duration = Duration::from_secs(1);

fn setup() -> (Arc<MemoryBackend>, Arc<BookmarkManager>, Arc<dyn ChangeFeed>) {
    let backend = Arc::new(MemoryBackend::new());
    let manager = Arc::new(BookmarkManager::new(backend.clone()));
    let feed: Arc<dyn ChangeFeed> = backend.clone();
    (backend, manager, feed)
}

async fn await_refresh(refreshed: &mut tokio::sync::broadcast::Receiver<()>) {
    tokio::time::timeout(WAIT, refreshed.recv())
        .await
        .expect("refresh notification timed out")
        .expect("refresh channel closed");
}

#[tokio::test]
async fn test_remote_insert_triggers_one_refetch() {
    let (backend, manager, feed) = setup();
    let _listener = ChangeListener::start(&feed, manager.clone());
    let mut refreshed = manager.subscribe_refreshed();

    backend.push_remote("Elsewhere", "https://elsewhere.example", "user-2");
    await_refresh(&mut refreshed).await;

    assert_eq!(backend.fetch_count(), 1);
    assert_eq!(manager.bookmarks().len(), 1);
    assert_eq!(manager.bookmarks()[0].title, "Elsewhere");
}

#[tokio::test]
async fn test_any_event_kind_triggers_a_full_refetch() {
    let (backend, manager, feed) = setup();
    let _listener = ChangeListener::start(&feed, manager.clone());
    let mut refreshed = manager.subscribe_refreshed();

    for kind in [ChangeKind::Insert, ChangeKind::Update, ChangeKind::Delete] {
        backend.emit_change(kind);
        await_refresh(&mut refreshed).await;
    }
    assert_eq!(backend.fetch_count(), 3);
}

#[tokio::test]
async fn test_stop_unsubscribes() {
    let (backend, manager, feed) = setup();
    let mut listener = ChangeListener::start(&feed, manager.clone());
    assert!(listener.is_running());

    listener.stop();
    // Give the abort a moment to land before asserting no refetch happens.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!listener.is_running());

    backend.emit_change(ChangeKind::Insert);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(backend.fetch_count(), 0);
}

#[tokio::test]
async fn test_drop_also_unsubscribes() {
    let (backend, manager, feed) = setup();
    {
        let _listener = ChangeListener::start(&feed, manager.clone());
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    backend.emit_change(ChangeKind::Delete);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(backend.fetch_count(), 0);
}

#[tokio::test]
async fn test_listener_survives_a_failed_refetch() {
    let (backend, manager, feed) = setup();
    let _listener = ChangeListener::start(&feed, manager.clone());
    let mut refreshed = manager.subscribe_refreshed();

    backend.set_fail_fetches(true);
    backend.emit_change(ChangeKind::Insert);
    tokio::time::sleep(Duration::from_millis(100)).await;

    // The failed refetch was logged and swallowed; the next event still works.
    backend.set_fail_fetches(false);
    backend.push_remote("After recovery", "https://after.example", "user-1");
    await_refresh(&mut refreshed).await;
    assert_eq!(manager.bookmarks().len(), 1);
}
