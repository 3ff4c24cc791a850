use serde::{Deserialize, Serialize};

/// A bookmark record as stored in the remote table.
///
/// `id`, `user_id` and `created_at` are server-assigned and treated as opaque;
/// `created_at` is only ever used by the server for ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Insert payload for a new bookmark. The server assigns everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub user_id: String,
}
