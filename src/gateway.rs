//! Auth gateway: owns the session state machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! Constructed once by the UI shell and shared through `Arc`. The route
//! guard reads its queries; the `ApiClient` interceptor reports 401s to it;
//! the login screen drives `login`. Only this type writes the session store.
//!
//! STATES
//! ======
//! `Unknown` until `restore` runs, then `Anonymous` or `Authenticated`.
//! `login` success moves to `Authenticated`; `logout` or an expired session
//! moves back to `Anonymous`. There is no terminal state.
//!
//! CONCURRENCY
//! ===========
//! State sits behind a `std::sync::Mutex` that is never held across an
//! `.await`. Login requests run unlocked, so concurrent logins race and the
//! last one to settle wins. Expiry compares the token the failing request
//! carried with the live one, so a burst of 401s ends a session once and a
//! stale 401 cannot end a newer session.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::watch;

use crate::config::{AdminConfig, ApiTimeouts};
use crate::error::{AuthError, ConfigError, LOGIN_FALLBACK_MESSAGE, StorageError, extract_detail};
use crate::guard::AuthQueries;
use crate::role::{RoleMap, RoleTier};
use crate::routes::LOGIN_PATH;
use crate::session::{Identity, Session, SessionStore};

const LOGIN_ENDPOINT: &str = "/auth/login";

/// Lifecycle phase of the session state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthPhase {
    /// Restore from storage has not run yet.
    #[default]
    Unknown,
    Anonymous,
    Authenticated,
}

/// What protected views observe through [`AuthGateway::subscribe`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthSnapshot {
    pub phase: AuthPhase,
    pub identity: Option<Identity>,
}

/// Receives forced redirects (session expiry).
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, path: &str) {
        self(path);
    }
}

#[derive(Default)]
struct GatewayState {
    phase: AuthPhase,
    session: Option<Session>,
    role_map: RoleMap,
    last_error: Option<String>,
    pending_logins: usize,
}

pub struct AuthGateway {
    http: reqwest::Client,
    base_url: String,
    store: SessionStore,
    state: Mutex<GatewayState>,
    navigator: Option<Box<dyn Navigator>>,
    events: watch::Sender<AuthSnapshot>,
}

impl fmt::Debug for AuthGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGateway")
            .field("base_url", &self.base_url)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

impl AuthGateway {
    /// Build a gateway in the `Unknown` phase. Call [`Self::restore`] next.
    pub fn new(config: &AdminConfig, store: SessionStore) -> Result<Self, ConfigError> {
        let http = build_http_client(config.timeouts)?;
        let (events, _) = watch::channel(AuthSnapshot::default());
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            store,
            state: Mutex::new(GatewayState { role_map: config.role_map.clone(), ..GatewayState::default() }),
            navigator: None,
            events,
        })
    }

    /// Route forced redirects (session expiry) to `navigator`.
    #[must_use]
    pub fn with_navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Some(Box::new(navigator));
        self
    }

    fn state(&self) -> MutexGuard<'_, GatewayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &GatewayState) {
        self.events.send_replace(AuthSnapshot {
            phase: state.phase,
            identity: state.session.as_ref().map(|s| s.identity.clone()),
        });
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// `Unknown -> Anonymous | Authenticated` from persisted state.
    ///
    /// Runs once; later calls return the current phase unchanged.
    pub fn restore(&self) -> AuthPhase {
        let mut state = self.state();
        if state.phase != AuthPhase::Unknown {
            return state.phase;
        }
        match self.store.load() {
            Some(session) => {
                tracing::info!(user_id = session.identity.id, "restored persisted session");
                state.session = Some(session);
                state.phase = AuthPhase::Authenticated;
            }
            None => {
                tracing::debug!("no persisted session");
                state.phase = AuthPhase::Anonymous;
            }
        }
        self.publish(&state);
        state.phase
    }

    /// Exchange credentials for a session.
    ///
    /// Credentials go to `POST /auth/login` as a form-urlencoded body. On
    /// failure the current session (if any) is left untouched and the
    /// message is also kept in [`Self::last_error`].
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        {
            let mut state = self.state();
            state.pending_logins += 1;
            state.last_error = None;
        }

        let outcome = self.request_login(username, password).await;

        let mut state = self.state();
        state.pending_logins = state.pending_logins.saturating_sub(1);
        let result = outcome.and_then(|(token, identity)| {
            self.store.save(&token, &identity)?;
            Ok(Session { token, identity })
        });
        match result {
            Ok(session) => {
                let identity = session.identity.clone();
                tracing::info!(user_id = identity.id, role_id = identity.role_id, "login succeeded");
                state.session = Some(session);
                state.phase = AuthPhase::Authenticated;
                self.publish(&state);
                Ok(identity)
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                state.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    async fn request_login(&self, username: &str, password: &str) -> Result<(String, Identity), AuthError> {
        let url = format!("{}{LOGIN_ENDPOINT}", self.base_url);
        let response = self
            .http
            .post(url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        if !status.is_success() {
            let message = extract_detail(&text).unwrap_or_else(|| LOGIN_FALLBACK_MESSAGE.to_owned());
            return Err(AuthError::Rejected { status: status.as_u16(), message });
        }
        parse_login_response(&text)
    }

    /// `Authenticated -> Anonymous`, clearing storage before returning.
    ///
    /// The in-memory session ends even when clearing storage fails; the
    /// storage error is still returned so the shell can surface it.
    pub fn logout(&self) -> Result<(), StorageError> {
        let mut state = self.state();
        let cleared = self.store.clear();
        if let Some(session) = state.session.take() {
            tracing::info!(user_id = session.identity.id, "logged out");
        }
        state.phase = AuthPhase::Anonymous;
        self.publish(&state);
        cleared
    }

    /// End the session after a request carrying `presented_token` got 401.
    ///
    /// Returns `true` only for the call that performed the transition; that
    /// call also forces navigation to the login screen.
    pub fn expire_session(&self, presented_token: &str) -> bool {
        {
            let mut state = self.state();
            let live = state
                .session
                .as_ref()
                .is_some_and(|s| state.phase == AuthPhase::Authenticated && s.token == presented_token);
            if !live {
                return false;
            }
            if let Err(e) = self.store.clear() {
                tracing::warn!(error = %e, "session storage clear failed during expiry");
            }
            let user_id = state.session.take().map(|s| s.identity.id);
            state.phase = AuthPhase::Anonymous;
            self.publish(&state);
            tracing::info!(?user_id, "session expired; returning to login");
        }
        if let Some(navigator) = &self.navigator {
            navigator.navigate(LOGIN_PATH);
        }
        true
    }

    /// Replace the role mapping, e.g. after fetching the backend's catalog.
    pub fn set_role_map(&self, role_map: RoleMap) {
        self.state().role_map = role_map;
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        self.state().phase
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase() == AuthPhase::Authenticated
    }

    #[must_use]
    pub fn is_restore_complete(&self) -> bool {
        self.phase() != AuthPhase::Unknown
    }

    /// Tier of the current user, recomputed from the live role map.
    #[must_use]
    pub fn role_tier(&self) -> Option<RoleTier> {
        let state = self.state();
        state.session.as_ref().map(|s| state.role_map.tier(s.identity.role_id))
    }

    #[must_use]
    pub fn has_staff_access(&self) -> bool {
        self.role_tier().is_some_and(RoleTier::has_staff_access)
    }

    #[must_use]
    pub fn is_administrator(&self) -> bool {
        self.role_tier().is_some_and(RoleTier::is_administrator)
    }

    #[must_use]
    pub fn current_identity(&self) -> Option<Identity> {
        self.state().session.as_ref().map(|s| s.identity.clone())
    }

    /// Message of the most recent failed login, cleared when a login starts.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    /// `true` while any login request is outstanding.
    #[must_use]
    pub fn is_login_pending(&self) -> bool {
        self.state().pending_logins > 0
    }

    /// Observe phase and identity changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.events.subscribe()
    }

    pub(crate) fn bearer_token(&self) -> Option<String> {
        let state = self.state();
        state
            .session
            .as_ref()
            .filter(|_| state.phase == AuthPhase::Authenticated)
            .map(|s| s.token.clone())
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl AuthQueries for AuthGateway {
    fn is_restore_complete(&self) -> bool {
        AuthGateway::is_restore_complete(self)
    }

    fn is_authenticated(&self) -> bool {
        AuthGateway::is_authenticated(self)
    }

    fn has_staff_access(&self) -> bool {
        AuthGateway::has_staff_access(self)
    }

    fn is_administrator(&self) -> bool {
        AuthGateway::is_administrator(self)
    }
}

// =============================================================================
// WIRE
// =============================================================================

#[derive(Deserialize)]
struct LoginResponse {
    access_token: Option<String>,
    user: Option<serde_json::Value>,
}

fn parse_login_response(text: &str) -> Result<(String, Identity), AuthError> {
    let body: LoginResponse =
        serde_json::from_str(text).map_err(|e| AuthError::MalformedResponse(e.to_string()))?;
    let token = body
        .access_token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AuthError::MalformedResponse("missing access_token".to_owned()))?;
    let user = body
        .user
        .ok_or_else(|| AuthError::MalformedResponse("missing user".to_owned()))?;
    let identity: Identity =
        serde_json::from_value(user).map_err(|e| AuthError::MalformedResponse(format!("invalid user: {e}")))?;
    Ok((token, identity))
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http_client(timeouts: ApiTimeouts) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeouts.request_secs))
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .build()
        .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))
}

#[cfg(target_arch = "wasm32")]
fn build_http_client(_timeouts: ApiTimeouts) -> Result<reqwest::Client, ConfigError> {
    // The browser fetch backend has no client-level timeouts.
    reqwest::Client::builder()
        .build()
        .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))
}
