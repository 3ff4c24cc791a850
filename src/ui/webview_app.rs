//! WebView single-page UI using `wry` + `tao`.
//!
//! Architecture:
//! - Internal pages (loading, login, bookmarks) are served via the `cm://`
//!   custom protocol.
//! - IPC from JS → Rust via `window.ipc.postMessage()`.
//! - Async work runs on a tokio runtime; results come back into the event
//!   loop through `EventLoopProxy<UserEvent>`.
//! - The OAuth provider redirects back to `cm://localhost/bookmarks` with the
//!   access token in the URL fragment; the navigation handler intercepts it.

use std::sync::Arc;

use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};
use tao::window::WindowBuilder;
use wry::WebViewBuilder;

use crate::app::App;
use crate::config::RemoteConfig;
use crate::managers::bookmark_manager::BookmarkManagerTrait;
use crate::remote::client::RemoteClient;

/// OAuth provider offered on the login page.
const OAUTH_PROVIDER: &str = "google";

#[derive(Debug)]
enum UserEvent {
    LoadUrl(String),
    EvalScript(String),
    /// Push the current cache snapshot into the bookmarks page.
    RenderList,
}

const PAGE_LOADING: &str = "cm://localhost/loading";
const PAGE_LOGIN: &str = "cm://localhost/login";
const PAGE_BOOKMARKS: &str = "cm://localhost/bookmarks";

/// Build HTML for internal pages with the shared stylesheet inlined.
fn internal_page(body: &str, extra_js: &str) -> String {
    let mut html = String::with_capacity(body.len() + extra_js.len() + 2000);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><style>");
    html.push_str(
        "*{margin:0;padding:0;box-sizing:border-box}\
         body{font-family:-apple-system,BlinkMacSystemFont,\"Segoe UI\",Helvetica,Arial,sans-serif;\
         background:#f3f4f6;color:#111827;min-height:100vh}\
         .center{display:flex;height:100vh;align-items:center;justify-content:center}\
         .card{max-width:640px;margin:40px auto;background:#fff;padding:24px;border-radius:8px;\
         box-shadow:0 1px 3px rgba(0,0,0,0.1)}\
         .row{display:flex;justify-content:space-between;align-items:center;margin-bottom:24px}\
         h1{font-size:20px}\
         input{border:1px solid #d1d5db;padding:8px;width:100%;margin-bottom:12px;border-radius:6px}\
         button{cursor:pointer;border:0;border-radius:8px}\
         .primary{background:#2563eb;color:#fff;padding:10px 16px;width:100%;margin-bottom:24px}\
         .primary:hover{background:#1d4ed8}\
         .dark{background:#111827;color:#fff;padding:12px 24px}\
         .dark:hover{background:#374151}\
         .danger{background:none;color:#ef4444;padding:4px}\
         .item{border:1px solid #e5e7eb;padding:12px;display:flex;justify-content:space-between;\
         align-items:center;border-radius:6px;margin-bottom:12px}\
         .item a{color:#2563eb;text-decoration:none}\
         .item a:hover{text-decoration:underline}\
         .muted{color:#6b7280;font-size:13px}",
    );
    html.push_str("</style></head><body>");
    html.push_str(body);
    if !extra_js.is_empty() {
        html.push_str("<script>");
        html.push_str(extra_js);
        html.push_str("</script>");
    }
    html.push_str("</body></html>");
    html
}

fn loading_html() -> String {
    internal_page(r#"<div class="center muted">Loading...</div>"#, "")
}

fn login_html() -> String {
    let body = r#"<div class="center">
<button class="dark" id="login-btn">Login with Google</button>
</div>"#;
    let js = r#"
function send(cmd,args){window.ipc.postMessage(JSON.stringify(Object.assign({cmd:cmd},args||{})))}
document.getElementById('login-btn').addEventListener('click',function(){send('login')});
"#;
    internal_page(body, js)
}

fn bookmarks_html() -> String {
    let body = r#"<div class="card">
<div class="row">
<h1>My Bookmarks</h1>
<button class="danger" id="logout-btn">Logout</button>
</div>
<input id="title" placeholder="Title" />
<input id="url" placeholder="URL" />
<button class="primary" id="add-btn">Add Bookmark</button>
<div id="list"></div>
</div>"#;
    let js = r#"
function send(cmd,args){window.ipc.postMessage(JSON.stringify(Object.assign({cmd:cmd},args||{})))}
window.__cm_clearInputs=function(){
  document.getElementById('title').value='';
  document.getElementById('url').value='';
};
window.__cm_renderList=function(data){
  var list=document.getElementById('list');
  list.textContent='';
  (data.bookmarks||[]).forEach(function(b){
    var item=document.createElement('div');item.className='item';
    var link=document.createElement('a');link.href=b.url;link.target='_blank';
    link.textContent=b.title;
    var del=document.createElement('button');del.className='danger';
    del.textContent='Delete';
    del.addEventListener('click',function(){send('delete_bookmark',{id:b.id})});
    item.appendChild(link);item.appendChild(del);
    list.appendChild(item);
  });
};
document.getElementById('add-btn').addEventListener('click',function(){
  send('add_bookmark',{
    title:document.getElementById('title').value,
    url:document.getElementById('url').value
  });
});
document.getElementById('logout-btn').addEventListener('click',function(){send('logout')});
send('ui_ready');
"#;
    internal_page(body, js)
}

/// JS call pushing the current cache snapshot into the bookmarks page.
fn build_list_script(app: &App) -> String {
    let bookmarks: Vec<serde_json::Value> = app
        .bookmarks()
        .iter()
        .map(|b| serde_json::json!({"id": b.id, "title": b.title, "url": b.url}))
        .collect();
    format!(
        "if(window.__cm_renderList)__cm_renderList({})",
        serde_json::json!({ "bookmarks": bookmarks })
    )
}

// ─── IPC handler ───

fn handle_ipc(
    app: &Arc<App>,
    handle: &tokio::runtime::Handle,
    proxy: &EventLoopProxy<UserEvent>,
    message: &str,
) -> Option<UserEvent> {
    let msg: serde_json::Value = serde_json::from_str(message).ok()?;
    let cmd = msg.get("cmd")?.as_str()?;

    match cmd {
        "ui_ready" => Some(UserEvent::RenderList),

        "login" => Some(UserEvent::LoadUrl(app.sign_in_url(OAUTH_PROVIDER))),

        "logout" => {
            let app = app.clone();
            let proxy = proxy.clone();
            handle.spawn(async move {
                app.sign_out().await;
                let _ = proxy.send_event(UserEvent::LoadUrl(PAGE_LOGIN.to_string()));
            });
            None
        }

        "add_bookmark" => {
            let title = msg.get("title").and_then(|v| v.as_str())?.to_string();
            let url = msg.get("url").and_then(|v| v.as_str())?.to_string();
            let app = app.clone();
            let proxy = proxy.clone();
            handle.spawn(async move {
                let Some(user) = app.current_identity() else {
                    tracing::warn!("add_bookmark with no signed-in user");
                    return;
                };
                match app.bookmark_manager.add_bookmark(&title, &url, &user).await {
                    // Inputs are cleared only after a successful round-trip.
                    Ok(true) => {
                        let _ = proxy.send_event(UserEvent::EvalScript(
                            "if(window.__cm_clearInputs)__cm_clearInputs()".to_string(),
                        ));
                    }
                    Ok(false) => {}
                    Err(e) => tracing::warn!("insert failed: {}", e),
                }
            });
            None
        }

        "delete_bookmark" => {
            let id = msg.get("id").and_then(|v| v.as_str())?.to_string();
            let app = app.clone();
            handle.spawn(async move {
                app.delete_bookmark(&id).await;
            });
            None
        }

        _ => None,
    }
}

// ─── Main entry point ───

pub fn run() {
    let config = RemoteConfig::from_env().expect("Backend configuration missing");
    let runtime = tokio::runtime::Runtime::new().expect("Failed to start tokio runtime");
    let handle = runtime.handle().clone();

    let client = Arc::new(RemoteClient::new(config));
    let app = Arc::new(App::new(client));

    let event_loop: EventLoop<UserEvent> = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();

    // Resolve the session in the background; the loading page shows until
    // resolution finishes. This is the only loading indicator in the app.
    {
        let app = app.clone();
        let proxy = proxy.clone();
        handle.spawn(async move {
            app.startup().await;
            let page = if app.current_identity().is_some() {
                PAGE_BOOKMARKS
            } else {
                PAGE_LOGIN
            };
            let _ = proxy.send_event(UserEvent::LoadUrl(page.to_string()));
        });
    }

    // Re-render after every cache refresh, including refreshes triggered by
    // remote change notifications.
    {
        let app = app.clone();
        let proxy = proxy.clone();
        handle.spawn(async move {
            let mut refreshed = app.subscribe_refreshed();
            while refreshed.recv().await.is_ok() {
                let _ = proxy.send_event(UserEvent::RenderList);
            }
        });
    }

    let window = WindowBuilder::new()
        .with_title("CloudMarks")
        .with_inner_size(tao::dpi::LogicalSize::new(720.0, 640.0))
        .build(&event_loop)
        .expect("Failed to create window");

    let ipc_app = app.clone();
    let ipc_handle = handle.clone();
    let ipc_proxy = proxy.clone();
    let nav_app = app.clone();
    let nav_handle = handle.clone();
    let nav_proxy = proxy.clone();

    let builder = WebViewBuilder::new()
        .with_custom_protocol("cm".into(), move |_wv_id, request| {
            let html = match request.uri().path() {
                "/login" => login_html(),
                "/bookmarks" => bookmarks_html(),
                _ => loading_html(),
            };
            wry::http::Response::builder()
                .header("Content-Type", "text/html; charset=utf-8")
                .body(html.into_bytes().into())
                .unwrap()
        })
        .with_url(PAGE_LOADING)
        .with_ipc_handler(move |msg: wry::http::Request<String>| {
            if let Some(event) = handle_ipc(&ipc_app, &ipc_handle, &ipc_proxy, msg.body().as_str())
            {
                let _ = ipc_proxy.send_event(event);
            }
        })
        .with_navigation_handler(move |url| {
            // The OAuth redirect carries the access token in the fragment.
            if let Some(token) = RemoteClient::parse_access_token(&url) {
                let app = nav_app.clone();
                let proxy = nav_proxy.clone();
                nav_handle.spawn(async move {
                    app.complete_sign_in(&token).await;
                    let page = if app.current_identity().is_some() {
                        PAGE_BOOKMARKS
                    } else {
                        PAGE_LOGIN
                    };
                    let _ = proxy.send_event(UserEvent::LoadUrl(page.to_string()));
                });
                return false;
            }
            true
        })
        .with_devtools(cfg!(debug_assertions));

    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window.default_vbox().expect("Failed to get GTK vbox");
        builder.build_gtk(vbox).expect("Failed to create WebView")
    };

    #[cfg(not(target_os = "linux"))]
    let webview = builder.build(&window).expect("Failed to create WebView");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;
        // Keep the runtime alive for the lifetime of the event loop.
        let _runtime = &runtime;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                app.shutdown();
                *control_flow = ControlFlow::Exit;
            }

            Event::UserEvent(user_event) => match user_event {
                UserEvent::LoadUrl(url) => {
                    let _ = webview.load_url(&url);
                }
                UserEvent::EvalScript(js) => {
                    let _ = webview.evaluate_script(&js);
                }
                UserEvent::RenderList => {
                    let _ = webview.evaluate_script(&build_list_script(&app));
                }
            },

            _ => {}
        }
    });
}
