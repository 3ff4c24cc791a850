use serde::{Deserialize, Serialize};

use crate::types::identity::UserIdentity;

/// Kind of a remote table change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    /// Parses the event name used on the realtime wire.
    pub fn from_wire(event: &str) -> Option<Self> {
        match event {
            "INSERT" => Some(ChangeKind::Insert),
            "UPDATE" => Some(ChangeKind::Update),
            "DELETE" => Some(ChangeKind::Delete),
            _ => None,
        }
    }
}

/// A change notification for a remote table. The listener never inspects
/// which record changed; any event triggers a full refetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub table: String,
}

/// An identity transition emitted by the auth backend.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthChange {
    SignedIn(UserIdentity),
    SignedOut,
}
