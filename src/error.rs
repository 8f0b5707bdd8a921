//! Error types for the session gate and the REST plumbing behind it.
//!
//! DESIGN
//! ======
//! Each concern owns a `thiserror` enum. [`ErrorCode`] gives the UI shell a
//! stable machine-readable code next to the display message, so screens can
//! branch on codes without matching message text.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Message shown when the backend gives no usable `detail` for a failed login.
pub const LOGIN_FALLBACK_MESSAGE: &str = "Login failed. Check your username and password.";

/// Stable error codes for UI branching and log correlation.
pub trait ErrorCode {
    /// Machine-readable code (`E_*`).
    fn error_code(&self) -> &'static str;

    /// Whether repeating the same call could plausibly succeed.
    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Failures of the persistence layer behind the session store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing store cannot be reached at all (no window, locked file, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A write or delete for a single key failed.
    #[error("storage write failed for key {key}: {message}")]
    Write { key: String, message: String },

    /// The identity could not be serialized for persistence.
    #[error("session encode failed: {0}")]
    Encode(String),
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "E_STORAGE_UNAVAILABLE",
            Self::Write { .. } => "E_STORAGE_WRITE",
            Self::Encode(_) => "E_STORAGE_ENCODE",
        }
    }
}

// =============================================================================
// AUTH
// =============================================================================

/// Reasons a login attempt did not produce a session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The backend declined the credentials (any non-2xx login response).
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The login request never produced a response.
    #[error("login request failed: {0}")]
    Network(String),

    /// A 2xx login response without a usable token or identity.
    #[error("login response malformed: {0}")]
    MalformedResponse(String),

    /// The session could not be persisted.
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Human-readable message for inline display next to the login form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Network(_) | Self::MalformedResponse(_) | Self::Storage(_) => {
                LOGIN_FALLBACK_MESSAGE.to_owned()
            }
        }
    }
}

impl ErrorCode for AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "E_LOGIN_REJECTED",
            Self::Network(_) => "E_LOGIN_NETWORK",
            Self::MalformedResponse(_) => "E_LOGIN_MALFORMED",
            Self::Storage(_) => "E_LOGIN_STORAGE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Rejected { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// API
// =============================================================================

/// Failures of an intercepted REST call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered 401. The gateway has already ended the session.
    #[error("not authenticated")]
    Unauthorized,

    /// The HTTP request itself failed (connect, timeout, body read).
    #[error("API request failed: {0}")]
    Request(String),

    /// The backend returned a non-success status other than 401.
    #[error("API response error: status {status}")]
    Status { status: u16, detail: Option<String> },

    /// The response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    Parse(String),
}

impl ApiError {
    /// Backend-provided detail for inline display, when there is one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "E_UNAUTHORIZED",
            Self::Request(_) => "E_API_REQUEST",
            Self::Status { .. } => "E_API_RESPONSE",
            Self::Parse(_) => "E_API_PARSE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// Failures while building configuration or the HTTP client from it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "E_CONFIG_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

/// Pull a human-readable `detail` string out of an error response body.
///
/// Validation errors that carry a structured `detail` (arrays of field
/// errors) yield `None` so callers fall back to their generic message.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail")?.as_str()?.trim();
    if detail.is_empty() {
        return None;
    }
    Some(detail.to_owned())
}
