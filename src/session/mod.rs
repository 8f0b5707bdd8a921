//! Durable holder of the current session.
//!
//! SYSTEM CONTEXT
//! ==============
//! `types` defines the session record, `storage` the client-scoped key/value
//! backends, and `store` the pairwise save/load/clear over them. Only the
//! auth gateway writes through `SessionStore`.

pub mod storage;
pub mod store;
pub mod types;

#[cfg(feature = "hydrate")]
pub use storage::BrowserStorage;
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
pub use store::SessionStore;
pub use types::{Identity, Session};
