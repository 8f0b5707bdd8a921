//! Pairwise persistence of the session (`token` + `user`).
//!
//! DESIGN
//! ======
//! The token and the serialized identity live under two keys and are
//! written and cleared as a pair. `load` treats anything short of a complete,
//! parseable pair as "no session" so a half-written or foreign entry can
//! never surface as a logged-in user.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::fmt;
use std::sync::Arc;

use super::storage::KeyValueStore;
use super::types::{Identity, Session};
use crate::error::StorageError;

/// Key holding the opaque bearer token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the serialized identity.
pub const USER_KEY: &str = "user";

#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self { backend: Arc::new(backend) }
    }

    /// Share an existing backend handle (e.g. one the shell also inspects).
    #[must_use]
    pub fn from_shared(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Persist `token` and `identity` together, replacing any prior session.
    ///
    /// If the second write fails both keys are put back to what they held
    /// before the call, so the store never holds a token without an identity
    /// or the reverse.
    pub fn save(&self, token: &str, identity: &Identity) -> Result<(), StorageError> {
        let user = serde_json::to_string(identity).map_err(|e| StorageError::Encode(e.to_string()))?;
        let prior_token = self.backend.get(TOKEN_KEY)?;
        let prior_user = self.backend.get(USER_KEY)?;

        self.backend.set(TOKEN_KEY, token)?;
        if let Err(e) = self.backend.set(USER_KEY, &user) {
            self.roll_back(TOKEN_KEY, prior_token.as_deref());
            self.roll_back(USER_KEY, prior_user.as_deref());
            return Err(e);
        }
        Ok(())
    }

    fn roll_back(&self, key: &str, prior: Option<&str>) {
        let restored = match prior {
            Some(value) => self.backend.set(key, value),
            None => self.backend.remove(key),
        };
        if let Err(e) = restored {
            tracing::warn!(key, error = %e, "session rollback failed");
        }
    }

    /// Previously saved session, or `None`. Never fails.
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let token = match self.backend.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable; treating as no session");
                return None;
            }
        };
        let user = match self.backend.get(USER_KEY) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable; treating as no session");
                return None;
            }
        };

        match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() => match serde_json::from_str::<Identity>(&user) {
                Ok(identity) => Some(Session { token, identity }),
                Err(e) => {
                    tracing::warn!(error = %e, "persisted identity unparsable; treating as no session");
                    None
                }
            },
            (None, None) => None,
            _ => {
                tracing::debug!("incomplete persisted session; treating as no session");
                None
            }
        }
    }

    /// Remove both entries. Clearing an empty store is a no-op.
    ///
    /// Both removals are attempted; the first failure is returned.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.backend.remove(TOKEN_KEY);
        let user = self.backend.remove(USER_KEY);
        token.and(user)
    }
}
