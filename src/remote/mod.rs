//! CloudMarks remote backend layer.
//!
//! Everything the application knows about persistence, authentication, and
//! change notification lives behind the trait seams in [`backend`]. Two
//! implementations exist:
//!
//! - [`RemoteClient`] talks to the hosted backend over HTTP and WebSocket.
//! - [`MemoryBackend`] is an in-memory stand-in for the demo binary and tests.

pub mod backend;
pub mod client;
pub mod memory;
pub mod realtime;

pub use backend::{AuthBackend, BookmarkStore, ChangeFeed};
pub use client::RemoteClient;
pub use memory::MemoryBackend;
