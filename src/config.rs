//! Gateway configuration parsed from environment variables.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::role::{DEFAULT_ADMINISTRATOR_ROLE_ID, DEFAULT_MANAGER_ROLE_ID, RoleMap};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_API_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for ApiTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_API_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_API_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// REST base URL without a trailing slash.
    pub base_url: String,
    pub timeouts: ApiTimeouts,
    pub role_map: RoleMap,
    /// Directory for the file-backed session store, when the shell uses one.
    pub session_dir: Option<PathBuf>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl AdminConfig {
    /// Config for `base_url` with default timeouts and role ids.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            timeouts: ApiTimeouts::default(),
            role_map: RoleMap::default(),
            session_dir: None,
        }
    }

    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `SLICE_API_BASE_URL`: default `http://localhost:8000/api/v1`
    /// - `SLICE_API_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SLICE_API_CONNECT_TIMEOUT_SECS`: default 10
    /// - `SLICE_ADMIN_ROLE_IDS`: comma-separated, default `1`
    /// - `SLICE_MANAGER_ROLE_IDS`: comma-separated, default `2`
    /// - `SLICE_SESSION_DIR`: file-backed session directory
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("SLICE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned());
        let timeouts = ApiTimeouts {
            request_secs: env_parse_u64("SLICE_API_REQUEST_TIMEOUT_SECS", DEFAULT_API_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("SLICE_API_CONNECT_TIMEOUT_SECS", DEFAULT_API_CONNECT_TIMEOUT_SECS),
        };
        let administrator = parse_role_ids(
            "SLICE_ADMIN_ROLE_IDS",
            std::env::var("SLICE_ADMIN_ROLE_IDS").ok().as_deref(),
            DEFAULT_ADMINISTRATOR_ROLE_ID,
        )?;
        let manager = parse_role_ids(
            "SLICE_MANAGER_ROLE_IDS",
            std::env::var("SLICE_MANAGER_ROLE_IDS").ok().as_deref(),
            DEFAULT_MANAGER_ROLE_ID,
        )?;
        let session_dir = std::env::var("SLICE_SESSION_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            base_url: normalize_base_url(&base_url),
            timeouts,
            role_map: RoleMap::new(administrator, manager),
            session_dir,
        })
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

/// Positive integer from `key`; missing, unparsable or zero values use `default`.
fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn parse_role_ids(key: &str, raw: Option<&str>, default: i64) -> Result<Vec<i64>, ConfigError> {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return Ok(vec![default]);
    };
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| ConfigError::Parse(format!("invalid role id '{part}' in {key}")))
        })
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
