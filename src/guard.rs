//! Route guard for protected screens.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected screen runs [`evaluate`] before rendering. The order of
//! checks is fixed: restore pending, then authentication, then privilege.
//! An authenticated user who lacks privilege is sent to access-denied and
//! never to login.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::routes::{ACCESS_DENIED_PATH, Screen, login_redirect};

/// Queries the guard needs from the auth gateway.
pub trait AuthQueries {
    fn is_restore_complete(&self) -> bool;
    fn is_authenticated(&self) -> bool;
    fn has_staff_access(&self) -> bool;
    fn is_administrator(&self) -> bool;
}

/// What a screen demands of the current user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessRequirement {
    Public,
    Staff,
    /// Staff access plus the administrator tier.
    Administrator,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Restore still running: show a neutral loader, re-evaluate later.
    Loading,
    /// Not logged in. `to` is the login location carrying `from`.
    RedirectToLogin { to: String, from: String },
    /// Logged in but under-privileged.
    AccessDenied { to: &'static str },
    Render,
}

/// Decide whether `requested` (the location being opened) may render.
pub fn evaluate(auth: &impl AuthQueries, requirement: AccessRequirement, requested: &str) -> GuardDecision {
    if requirement == AccessRequirement::Public {
        return GuardDecision::Render;
    }
    if !auth.is_restore_complete() {
        return GuardDecision::Loading;
    }
    if !auth.is_authenticated() {
        tracing::debug!(requested, "unauthenticated; redirecting to login");
        return GuardDecision::RedirectToLogin { to: login_redirect(requested), from: requested.to_owned() };
    }
    if !auth.has_staff_access() {
        tracing::debug!(requested, "no staff access; access denied");
        return GuardDecision::AccessDenied { to: ACCESS_DENIED_PATH };
    }
    if requirement == AccessRequirement::Administrator && !auth.is_administrator() {
        tracing::debug!(requested, "administrator required; access denied");
        return GuardDecision::AccessDenied { to: ACCESS_DENIED_PATH };
    }
    GuardDecision::Render
}

/// Resolve `location` through the screen catalog, then [`evaluate`] it.
pub fn check_path(auth: &impl AuthQueries, location: &str) -> (Screen, GuardDecision) {
    let screen = Screen::from_path(location);
    (screen, evaluate(auth, screen.requirement(), location))
}
