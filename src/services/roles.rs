//! Role catalog client (`/roles`).
//!
//! `list_all` feeds dropdowns and the gateway's [`RoleMap`]. A failed fetch
//! degrades to an empty catalog so a form can still render, except for 401:
//! the interceptor has already ended the session, and the caller must see it.

#[cfg(test)]
#[path = "roles_test.rs"]
mod roles_test;

use serde::Serialize;

use super::Resource;
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::role::{Role, RoleMap};

const LIST_ALL_PER_PAGE: u32 = 100;

#[derive(Clone, Debug)]
pub struct RoleService {
    resource: Resource,
}

impl RoleService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { resource: Resource::new(client, "/roles") }
    }

    pub async fn list_all(&self) -> Result<Vec<Role>, ApiError> {
        let query = vec![("per_page", LIST_ALL_PER_PAGE.to_string())];
        match self.resource.list::<Role>(&query).await {
            Ok(page) => Ok(page.items),
            Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized),
            Err(e) => {
                tracing::warn!(error = %e, "role catalog fetch failed; using empty list");
                Ok(Vec::new())
            }
        }
    }

    /// Rebuild the gateway's role map from the backend catalog.
    ///
    /// An empty catalog leaves the current map in place and returns `None`.
    pub async fn refresh_role_map(&self) -> Result<Option<RoleMap>, ApiError> {
        let roles = self.list_all().await?;
        if roles.is_empty() {
            return Ok(None);
        }
        let map = RoleMap::from_roles(&roles);
        tracing::info!(
            administrator = ?map.administrator_ids(),
            manager = ?map.manager_ids(),
            "role map refreshed from catalog"
        );
        self.resource.client().gateway().set_role_map(map.clone());
        Ok(Some(map))
    }

    pub async fn get(&self, id: i64) -> Result<Role, ApiError> {
        self.resource.get(id).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, role: &B) -> Result<Role, ApiError> {
        self.resource.create(role).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, role: &B) -> Result<Role, ApiError> {
        self.resource.update(id, role).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.resource.delete(id).await
    }
}
