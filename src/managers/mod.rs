// CloudMarks view-binding managers
// One manager per responsibility: session tracking, the list cache,
// mutation dispatch, and the remote change listener.

pub mod bookmark_manager;
pub mod change_listener;
pub mod list_cache;
pub mod session_manager;
