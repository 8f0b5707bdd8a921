//! Category and brand clients (`/categories`, `/brands`).
//!
//! Both collections share the same list shape: page, page size and an
//! optional search term.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{DEFAULT_PAGE, Page, Resource, page_params};
use crate::api::ApiClient;
use crate::error::ApiError;

pub const DEFAULT_CATALOG_PER_PAGE: u32 = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogQuery {
    pub page: u32,
    pub per_page: u32,
    pub search: Option<String>,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, per_page: DEFAULT_CATALOG_PER_PAGE, search: None }
    }
}

#[derive(Clone, Debug)]
pub struct CategoryService {
    resource: Resource,
}

impl CategoryService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { resource: Resource::new(client, "/categories") }
    }

    pub async fn list(&self, query: &CatalogQuery) -> Result<Page<Category>, ApiError> {
        let pairs = page_params(query.page, query.per_page, query.search.as_deref());
        self.resource.list(&pairs).await
    }

    pub async fn get(&self, id: i64) -> Result<Category, ApiError> {
        self.resource.get(id).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, category: &B) -> Result<Category, ApiError> {
        self.resource.create(category).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, category: &B) -> Result<Category, ApiError> {
        self.resource.update(id, category).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.resource.delete(id).await
    }
}

#[derive(Clone, Debug)]
pub struct BrandService {
    resource: Resource,
}

impl BrandService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { resource: Resource::new(client, "/brands") }
    }

    pub async fn list(&self, query: &CatalogQuery) -> Result<Page<Brand>, ApiError> {
        let pairs = page_params(query.page, query.per_page, query.search.as_deref());
        self.resource.list(&pairs).await
    }

    pub async fn get(&self, id: i64) -> Result<Brand, ApiError> {
        self.resource.get(id).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, brand: &B) -> Result<Brand, ApiError> {
        self.resource.create(brand).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, brand: &B) -> Result<Brand, ApiError> {
        self.resource.update(id, brand).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.resource.delete(id).await
    }
}
