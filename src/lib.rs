//! CloudMarks — a minimal cloud-synced bookmark manager.
//!
//! This library crate exposes all modules for use by the binary and
//! integration tests.

pub mod app;
pub mod config;
pub mod managers;
pub mod remote;
pub mod types;

#[cfg(feature = "gui")]
pub mod ui;
