//! Staff account client (`/users`). Administrator screens only.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{DEFAULT_PAGE, Page, Resource, page_params};
use crate::api::{ApiClient, QueryPairs};
use crate::error::ApiError;

pub const DEFAULT_USERS_PER_PAGE: u32 = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role_id: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserQuery {
    pub page: u32,
    pub per_page: u32,
    pub search: Option<String>,
    pub role_id: Option<i64>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, per_page: DEFAULT_USERS_PER_PAGE, search: None, role_id: None }
    }
}

impl UserQuery {
    pub(crate) fn to_pairs(&self) -> QueryPairs {
        let mut pairs = page_params(self.page, self.per_page, self.search.as_deref());
        if let Some(id) = self.role_id {
            pairs.push(("role_id", id.to_string()));
        }
        pairs
    }
}

#[derive(Clone, Debug)]
pub struct UserService {
    resource: Resource,
}

impl UserService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { resource: Resource::new(client, "/users") }
    }

    pub async fn list(&self, query: &UserQuery) -> Result<Page<UserRecord>, ApiError> {
        self.resource.list(&query.to_pairs()).await
    }

    pub async fn get(&self, id: i64) -> Result<UserRecord, ApiError> {
        self.resource.get(id).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, user: &B) -> Result<UserRecord, ApiError> {
        self.resource.create(user).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, user: &B) -> Result<UserRecord, ApiError> {
        self.resource.update(id, user).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.resource.delete(id).await
    }
}
