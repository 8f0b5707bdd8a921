//! Product catalog client (`/products`).

#[cfg(test)]
#[path = "products_test.rs"]
mod products_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{DEFAULT_PAGE, Page, Resource, page_params};
use crate::api::{ApiClient, QueryPairs};
use crate::error::ApiError;

pub const DEFAULT_PRODUCTS_PER_PAGE: u32 = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub brand_id: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filters for the product list screen.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductQuery {
    pub page: u32,
    pub per_page: u32,
    pub search: Option<String>,
    pub category_id: Option<i64>,
    pub brand_id: Option<i64>,
    /// The dashboard lists inactive products too unless told otherwise.
    pub include_inactive: bool,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PRODUCTS_PER_PAGE,
            search: None,
            category_id: None,
            brand_id: None,
            include_inactive: true,
        }
    }
}

impl ProductQuery {
    pub(crate) fn to_pairs(&self) -> QueryPairs {
        let mut pairs = page_params(self.page, self.per_page, self.search.as_deref());
        if let Some(id) = self.category_id {
            pairs.push(("category_id", id.to_string()));
        }
        if let Some(id) = self.brand_id {
            pairs.push(("brand_id", id.to_string()));
        }
        if !self.include_inactive {
            pairs.push(("is_active", "true".to_owned()));
        }
        pairs
    }
}

#[derive(Clone, Debug)]
pub struct ProductService {
    resource: Resource,
}

impl ProductService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { resource: Resource::new(client, "/products") }
    }

    pub async fn list(&self, query: &ProductQuery) -> Result<Page<Product>, ApiError> {
        self.resource.list(&query.to_pairs()).await
    }

    pub async fn get(&self, id: i64) -> Result<Product, ApiError> {
        self.resource.get(id).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, product: &B) -> Result<Product, ApiError> {
        self.resource.create(product).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, product: &B) -> Result<Product, ApiError> {
        self.resource.update(id, product).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.resource.delete(id).await
    }
}
