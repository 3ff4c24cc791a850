//! CloudMarks UI layer (feature `gui`).

pub mod webview_app;
