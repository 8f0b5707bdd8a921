//! In-process REST backend for gateway, interceptor and service tests.
//!
//! Serves `POST /auth/login` from per-username scripts and answers every
//! other path through a fallback that enforces bearer tokens and records
//! what it saw. Also hosts `FlakyStorage`, a session backend with
//! switchable failures.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;

use crate::api::ApiClient;
use crate::config::AdminConfig;
use crate::error::StorageError;
use crate::gateway::AuthGateway;
use crate::session::store::USER_KEY;
use crate::session::{KeyValueStore, MemoryStorage, SessionStore};

#[derive(Clone, Debug)]
pub struct LoginScript {
    pub status: u16,
    pub body: String,
    pub delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct LoginRequest {
    pub content_type: String,
    pub form: HashMap<String, String>,
}

#[derive(Clone, Debug)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Default)]
pub struct BackendState {
    logins: Mutex<HashMap<String, LoginScript>>,
    valid_tokens: Mutex<HashSet<String>>,
    scripted: Mutex<HashMap<String, (u16, String)>>,
    pub login_requests: Mutex<Vec<LoginRequest>>,
    pub requests: Mutex<Vec<SeenRequest>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

pub struct TestBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

impl TestBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/auth/login", post(login))
            .fallback(resource)
            .with_state(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { base_url: format!("http://{addr}"), state }
    }

    pub fn config(&self) -> AdminConfig {
        AdminConfig::new(&self.base_url)
    }

    /// Restored gateway over fresh in-memory storage.
    pub fn gateway(&self) -> AuthGateway {
        let gateway = AuthGateway::new(&self.config(), SessionStore::new(MemoryStorage::new())).unwrap();
        gateway.restore();
        gateway
    }

    /// Client whose gateway holds an administrator session with token `admin-token`.
    pub async fn admin_client(&self) -> ApiClient {
        self.script_login_ok("admin", "admin-token", serde_json::json!({ "id": 1, "username": "admin", "role_id": 1 }));
        let gateway = self.gateway();
        gateway.login("admin", "pw").await.unwrap();
        ApiClient::new(Arc::new(gateway))
    }

    pub fn script_login(&self, username: &str, status: u16, body: serde_json::Value, delay_ms: u64) {
        lock(&self.state.logins)
            .insert(username.to_owned(), LoginScript { status, body: body.to_string(), delay_ms });
    }

    /// Successful login for `username` issuing `token`, which the backend then accepts.
    pub fn script_login_ok(&self, username: &str, token: &str, user: serde_json::Value) {
        self.script_login(
            username,
            200,
            serde_json::json!({ "access_token": token, "token_type": "bearer", "user": user }),
            0,
        );
        self.accept_token(token);
    }

    pub fn accept_token(&self, token: &str) {
        lock(&self.state.valid_tokens).insert(token.to_owned());
    }

    pub fn revoke_token(&self, token: &str) {
        lock(&self.state.valid_tokens).remove(token);
    }

    /// Fixed response for `"<METHOD> <path>"` once the token check passes.
    pub fn script(&self, method: &str, path: &str, status: u16, body: serde_json::Value) {
        lock(&self.state.scripted).insert(format!("{method} {path}"), (status, body.to_string()));
    }

    pub fn login_requests(&self) -> Vec<LoginRequest> {
        lock(&self.state.login_requests).clone()
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        lock(&self.state.requests).clone()
    }

    pub fn last_request(&self) -> SeenRequest {
        lock(&self.state.requests).last().cloned().unwrap()
    }
}

/// Memory-backed store whose reads, `user` writes and removes can be made to fail.
#[derive(Default)]
pub struct FlakyStorage {
    pub inner: MemoryStorage,
    pub fail_reads: AtomicBool,
    pub fail_user_writes: AtomicBool,
    pub fail_removes: AtomicBool,
}

impl KeyValueStore for FlakyStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("disk gone".into()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == USER_KEY && self.fail_user_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Write { key: key.into(), message: "quota exceeded".into() });
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(StorageError::Write { key: key.into(), message: "read-only volume".into() });
        }
        self.inner.remove(key)
    }
}

fn json_response(status: u16, body: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(CONTENT_TYPE, "application/json")], body).into_response()
}

fn header(headers: &HeaderMap, name: axum::http::HeaderName) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

async fn login(State(state): State<Arc<BackendState>>, headers: HeaderMap, body: Bytes) -> Response {
    let form: HashMap<String, String> = url::form_urlencoded::parse(&body).into_owned().collect();
    let username = form.get("username").cloned().unwrap_or_default();
    lock(&state.login_requests).push(LoginRequest {
        content_type: header(&headers, CONTENT_TYPE).unwrap_or_default(),
        form,
    });

    let script = lock(&state.logins).get(&username).cloned().unwrap_or_else(|| LoginScript {
        status: 401,
        body: serde_json::json!({ "detail": "Invalid credentials" }).to_string(),
        delay_ms: 0,
    });
    if script.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(script.delay_ms)).await;
    }
    json_response(script.status, script.body)
}

async fn resource(
    State(state): State<Arc<BackendState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorization = header(&headers, AUTHORIZATION);
    lock(&state.requests).push(SeenRequest {
        method: method.to_string(),
        path: uri.path().to_owned(),
        query: uri.query().map(str::to_owned),
        authorization: authorization.clone(),
        content_type: header(&headers, CONTENT_TYPE),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let authorized = authorization
        .as_deref()
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| lock(&state.valid_tokens).contains(token));
    if !authorized {
        return json_response(401, serde_json::json!({ "detail": "Not authenticated" }).to_string());
    }

    let key = format!("{method} {}", uri.path());
    match lock(&state.scripted).get(&key).cloned() {
        Some((status, body)) => json_response(status, body),
        None => json_response(200, "{}".to_owned()),
    }
}
