use serde::{Deserialize, Serialize};

/// The authenticated user as reported by the auth backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}
