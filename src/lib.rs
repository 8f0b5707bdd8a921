//! Session and authorization gate for the Slice admin dashboard.
//!
//! SYSTEM CONTEXT
//! ==============
//! The UI shell constructs one [`AuthGateway`] at start-up, restores any
//! persisted session, and shares it (via `Arc`) with the [`ApiClient`] that
//! every screen uses and with the route guard that runs before each protected
//! screen renders.
//!
//! ```text
//! guard::evaluate ──▶ AuthGateway queries ──▶ SessionStore
//!                          ▲
//! ApiClient (401) ─────────┘ expire_session
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod login;
pub mod role;
pub mod routes;
pub mod services;
pub mod session;

#[cfg(test)]
mod test_backend;

pub use api::ApiClient;
pub use config::AdminConfig;
pub use error::{ApiError, AuthError, ConfigError, ErrorCode, StorageError};
pub use gateway::{AuthGateway, AuthPhase, AuthSnapshot, Navigator};
pub use guard::{AccessRequirement, AuthQueries, GuardDecision};
pub use role::{RoleMap, RoleTier};
pub use routes::Screen;
pub use session::{Identity, KeyValueStore, MemoryStorage, Session, SessionStore};
