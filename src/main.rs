//! CloudMarks — a minimal cloud-synced bookmark manager.
//!
//! Entry point: opens the WebView window over the hosted backend configured
//! via environment variables. When built without the `gui` feature, runs a
//! console demo against the in-memory backend.

#[cfg(feature = "gui")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    cloudmarks::ui::webview_app::run();
}

#[cfg(not(feature = "gui"))]
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              CloudMarks v{} — Demo Mode               ║", env!("CARGO_PKG_VERSION"));
    println!("║     Cloud-synced bookmarks over an in-memory backend       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    demo_config();
    demo_session().await;
    demo_bookmarks().await;
    demo_ordering().await;
    demo_signout().await;
    demo_realtime().await;
    demo_app_core().await;

    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ All components demonstrated successfully!");
    println!("  CloudMarks is ready for WebView UI integration.");
    println!("═══════════════════════════════════════════════════════════════");
}

#[cfg(not(feature = "gui"))]
fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

#[cfg(not(feature = "gui"))]
fn demo_config() {
    use cloudmarks::config::RemoteConfig;
    section("Remote Configuration");

    let config = RemoteConfig::new(
        "https://demo.example.co/",
        "anon-key-demo",
        "cm://localhost/bookmarks",
    )
    .expect("Failed to build config");
    println!("  Base URL (normalized): {}", config.base_url);
    println!("  Redirect URL: {}", config.redirect_url);

    let bad = RemoteConfig::new("ftp://demo.example.co", "key", "cm://localhost/bookmarks");
    println!("  Non-HTTP base URL rejected: {}", bad.is_err());
    println!("  ✓ RemoteConfig OK");
    println!();
}

#[cfg(not(feature = "gui"))]
async fn demo_session() {
    use std::sync::Arc;
    use cloudmarks::managers::session_manager::{SessionManager, SessionManagerTrait};
    use cloudmarks::remote::memory::MemoryBackend;
    section("Session Manager");

    let backend = Arc::new(MemoryBackend::new());
    let mgr = SessionManager::new(backend.clone());

    println!("  Signed in (no stored session): {}", mgr.is_signed_in());
    println!("  Resolved identity: {:?}", mgr.resolve_identity().await.map(|u| u.id));

    println!("  Sign-in URL: {}", mgr.sign_in_url("google"));

    let user = mgr.complete_sign_in("user-42").await.expect("Sign-in failed");
    println!("  Completed sign-in: user = {}", user.id);
    println!("  Signed in: {}", mgr.is_signed_in());

    mgr.sign_out().await;
    println!("  Signed out: signed_in = {}", mgr.is_signed_in());
    println!("  ✓ SessionManager OK");
    println!();
}

#[cfg(not(feature = "gui"))]
async fn demo_bookmarks() {
    use std::sync::Arc;
    use cloudmarks::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
    use cloudmarks::remote::memory::MemoryBackend;
    section("Bookmark Manager");

    let backend = Arc::new(MemoryBackend::new());
    let user = backend.sign_in_as("user-42", Some("demo@example.com"));
    let mgr = BookmarkManager::new(backend.clone());

    mgr.add_bookmark("Rust", "https://rust-lang.org", &user).await.unwrap();
    mgr.add_bookmark("Crates", "https://crates.io", &user).await.unwrap();
    println!("  Added 2 bookmarks, cache size = {}", mgr.bookmarks().len());

    let skipped = mgr.add_bookmark("", "https://no-title.example", &user).await.unwrap();
    println!("  Empty title silently skipped: dispatched = {}", skipped);
    println!("  Requests actually sent: {}", backend.insert_count());

    let first_id = mgr.bookmarks()[0].id.clone();
    mgr.remove_bookmark(&first_id).await.unwrap();
    println!("  Removed newest bookmark, cache size = {}", mgr.bookmarks().len());
    println!("  ✓ BookmarkManager OK");
    println!();
}

#[cfg(not(feature = "gui"))]
async fn demo_ordering() {
    use std::sync::Arc;
    use cloudmarks::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
    use cloudmarks::remote::memory::MemoryBackend;
    section("List Ordering (newest first)");

    let backend = Arc::new(MemoryBackend::new());
    let user = backend.sign_in_as("user-42", None);
    let mgr = BookmarkManager::new(backend);

    for (title, url) in [
        ("First", "https://a.example"),
        ("Second", "https://b.example"),
        ("Third", "https://c.example"),
    ] {
        mgr.add_bookmark(title, url, &user).await.unwrap();
    }

    let titles: Vec<String> = mgr.bookmarks().iter().map(|b| b.title.clone()).collect();
    println!("  Inserted First, Second, Third");
    println!("  Fetched order: {}", titles.join(", "));
    println!("  ✓ Ordering OK");
    println!();
}

#[cfg(not(feature = "gui"))]
async fn demo_signout() {
    use std::sync::Arc;
    use cloudmarks::app::App;
    use cloudmarks::remote::memory::MemoryBackend;
    section("Sign-out clears the view");

    let backend = Arc::new(MemoryBackend::new());
    backend.sign_in_as("user-42", None);
    backend.push_remote("Kept remotely", "https://remote.example", "user-42");

    let app = App::new(backend.clone());
    app.startup().await;
    println!("  After startup: {} bookmark(s) visible", app.bookmarks().len());

    app.sign_out().await;
    println!("  After sign-out: identity = {:?}, visible = {}",
        app.current_identity().map(|u| u.id), app.bookmarks().len());
    app.shutdown();
    println!("  ✓ Sign-out OK");
    println!();
}

#[cfg(not(feature = "gui"))]
async fn demo_realtime() {
    use std::sync::Arc;
    use std::time::Duration;
    use cloudmarks::app::App;
    use cloudmarks::remote::memory::MemoryBackend;
    section("Change Listener (near-real-time)");

    let backend = Arc::new(MemoryBackend::new());
    backend.sign_in_as("user-42", None);

    let app = App::new(backend.clone());
    app.startup().await;
    println!("  Listener running: {}", app.is_listening());

    let mut refreshed = app.subscribe_refreshed();
    backend.push_remote("From another client", "https://elsewhere.example", "user-99");
    tokio::time::timeout(Duration::from_secs(1), refreshed.recv())
        .await
        .expect("refresh notification timed out")
        .expect("refresh channel closed");
    println!("  Remote insert triggered a refetch, visible = {}", app.bookmarks().len());

    app.shutdown();
    println!("  Listener running after shutdown: {}", app.is_listening());
    println!("  ✓ ChangeListener OK");
    println!();
}

#[cfg(not(feature = "gui"))]
async fn demo_app_core() {
    use std::sync::Arc;
    use cloudmarks::app::App;
    use cloudmarks::remote::memory::MemoryBackend;
    section("App Core (full lifecycle)");

    let backend = Arc::new(MemoryBackend::new());
    backend.sign_in_as("user-42", Some("demo@example.com"));

    let app = App::new(backend.clone());
    app.startup().await;
    println!("  Startup: session resolved, initial fetch, listener started");

    app.add_bookmark("Docs", "https://docs.rs").await;
    println!("  Added bookmark via App, visible = {}", app.bookmarks().len());

    app.add_bookmark("", "").await;
    println!("  Empty submit was a no-op, requests sent = {}", backend.insert_count());

    app.shutdown();
    println!("  Shutdown: listener stopped, feed stopped");
    println!("  ✓ App Core OK");
}
