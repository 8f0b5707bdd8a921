//! Session record persisted between reloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The authenticated operator as returned under `user` by `/auth/login`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Numeric user id.
    pub id: i64,
    #[serde(default)]
    pub username: String,
    /// Raw role discriminator; classify through `RoleMap`, never inline.
    pub role_id: i64,
    /// Remaining backend fields (email, full name, embedded role, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identity {
    #[must_use]
    pub fn new(id: i64, username: &str, role_id: i64) -> Self {
        Self { id, username: username.to_owned(), role_id, extra: Map::new() }
    }
}

/// Credential and identity, always held together.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
}
