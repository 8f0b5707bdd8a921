//! Screen catalog: paths, access requirements, login redirect targets.
//!
//! SYSTEM CONTEXT
//! ==============
//! The guard evaluates a [`Screen`]'s [`AccessRequirement`]; the shell maps
//! paths to screens here so the requirement table lives in one place.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::guard::AccessRequirement;

pub const LOGIN_PATH: &str = "/login";
pub const ACCESS_DENIED_PATH: &str = "/access-denied";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Query parameter carrying the originally requested location.
pub const FROM_PARAM: &str = "from";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Login,
    AccessDenied,
    Dashboard,
    Products,
    Categories,
    Brands,
    ProductImages,
    Users,
    NotFound,
}

impl Screen {
    /// Resolve a location (query and fragment ignored). `/` is the dashboard.
    #[must_use]
    pub fn from_path(location: &str) -> Self {
        let path = location.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        match path {
            "" | DASHBOARD_PATH => Self::Dashboard,
            LOGIN_PATH => Self::Login,
            ACCESS_DENIED_PATH => Self::AccessDenied,
            "/dashboard/products" => Self::Products,
            "/dashboard/categories" => Self::Categories,
            "/dashboard/brands" => Self::Brands,
            "/dashboard/images" => Self::ProductImages,
            "/dashboard/users" => Self::Users,
            _ => Self::NotFound,
        }
    }

    /// Canonical path. `NotFound` has none.
    #[must_use]
    pub fn path(self) -> Option<&'static str> {
        match self {
            Self::Login => Some(LOGIN_PATH),
            Self::AccessDenied => Some(ACCESS_DENIED_PATH),
            Self::Dashboard => Some(DASHBOARD_PATH),
            Self::Products => Some("/dashboard/products"),
            Self::Categories => Some("/dashboard/categories"),
            Self::Brands => Some("/dashboard/brands"),
            Self::ProductImages => Some("/dashboard/images"),
            Self::Users => Some("/dashboard/users"),
            Self::NotFound => None,
        }
    }

    #[must_use]
    pub fn requirement(self) -> AccessRequirement {
        match self {
            Self::Login | Self::AccessDenied | Self::NotFound => AccessRequirement::Public,
            Self::Dashboard | Self::Products | Self::Categories | Self::Brands | Self::ProductImages => {
                AccessRequirement::Staff
            }
            Self::Users => AccessRequirement::Administrator,
        }
    }

    #[must_use]
    pub fn is_protected(self) -> bool {
        self.requirement() != AccessRequirement::Public
    }
}

/// Login location carrying `from` so the user can be sent back after login.
#[must_use]
pub fn login_redirect(from: &str) -> String {
    if from.is_empty() || Screen::from_path(from) == Screen::Login {
        return LOGIN_PATH.to_owned();
    }
    let encoded: String = url::form_urlencoded::byte_serialize(from.as_bytes()).collect();
    format!("{LOGIN_PATH}?{FROM_PARAM}={encoded}")
}

/// Extract the `from` value from a login location, if present.
#[must_use]
pub fn redirect_origin(login_location: &str) -> Option<String> {
    let (_, query) = login_location.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == FROM_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Where to go after a successful login.
///
/// Best-effort return-to-origin: only a relative location naming a
/// protected screen is honored; anything else lands on the dashboard.
#[must_use]
pub fn post_login_destination(from: Option<&str>) -> String {
    match from {
        Some(origin) if origin.starts_with('/') && !origin.starts_with("//") && Screen::from_path(origin).is_protected() => {
            origin.to_owned()
        }
        _ => DASHBOARD_PATH.to_owned(),
    }
}
