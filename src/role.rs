//! Role-id to capability-tier mapping.
//!
//! DESIGN
//! ======
//! The backend's numbering for administrator/manager roles has changed
//! between revisions, so no id is hardcoded at call sites. One [`RoleMap`]
//! holds the mapping; it comes from configuration or from the backend's own
//! role catalog, and every access query goes through [`RoleMap::tier`].
//! Tiers are recomputed per query and never stored next to the session.

#[cfg(test)]
#[path = "role_test.rs"]
mod role_test;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ADMINISTRATOR_ROLE_ID: i64 = 1;
pub const DEFAULT_MANAGER_ROLE_ID: i64 = 2;

/// Capability tier derived from a role id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleTier {
    Administrator,
    Manager,
    /// Customers and any role the map does not know.
    Other,
}

impl RoleTier {
    /// Staff may enter the dashboard at all.
    #[must_use]
    pub fn has_staff_access(self) -> bool {
        matches!(self, Self::Administrator | Self::Manager)
    }

    /// Only administrators reach user management.
    #[must_use]
    pub fn is_administrator(self) -> bool {
        matches!(self, Self::Administrator)
    }
}

/// A role as returned by `GET /roles`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Lookup from raw role ids to tiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleMap {
    administrator: Vec<i64>,
    manager: Vec<i64>,
}

impl Default for RoleMap {
    fn default() -> Self {
        Self { administrator: vec![DEFAULT_ADMINISTRATOR_ROLE_ID], manager: vec![DEFAULT_MANAGER_ROLE_ID] }
    }
}

impl RoleMap {
    #[must_use]
    pub fn new(administrator: impl IntoIterator<Item = i64>, manager: impl IntoIterator<Item = i64>) -> Self {
        Self { administrator: administrator.into_iter().collect(), manager: manager.into_iter().collect() }
    }

    /// Build the map from the backend's role catalog.
    ///
    /// Roles flagged `is_admin` are administrators; a role named "manager"
    /// (any case) is a manager. Everything else falls through to `Other`.
    #[must_use]
    pub fn from_roles(roles: &[Role]) -> Self {
        let administrator = roles.iter().filter(|r| r.is_admin).map(|r| r.id);
        let manager = roles
            .iter()
            .filter(|r| !r.is_admin && r.name.trim().eq_ignore_ascii_case("manager"))
            .map(|r| r.id);
        Self::new(administrator, manager)
    }

    /// Tier for `role_id`. Administrator wins if an id is listed twice.
    #[must_use]
    pub fn tier(&self, role_id: i64) -> RoleTier {
        if self.administrator.contains(&role_id) {
            RoleTier::Administrator
        } else if self.manager.contains(&role_id) {
            RoleTier::Manager
        } else {
            RoleTier::Other
        }
    }

    #[must_use]
    pub fn administrator_ids(&self) -> &[i64] {
        &self.administrator
    }

    #[must_use]
    pub fn manager_ids(&self) -> &[i64] {
        &self.manager
    }
}
