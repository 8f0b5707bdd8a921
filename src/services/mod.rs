//! Typed clients for the dashboard's REST resources.
//!
//! ARCHITECTURE
//! ============
//! Every service is a thin wrapper over [`ApiClient`], so each call goes
//! through the bearer/401 interceptor. Services own URL shapes and query
//! defaults; screens own pagination state and form validation.


pub mod catalog;
pub mod images;
pub mod products;
pub mod roles;
pub mod users;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, QueryPairs};
use crate::error::ApiError;

pub use catalog::{Brand, BrandService, CatalogQuery, Category, CategoryService};
pub use images::{ImageUpload, ImageService, ProductImage};
pub use products::{Product, ProductQuery, ProductService};
pub use roles::RoleService;
pub use users::{UserQuery, UserRecord, UserService};

/// First page; list endpoints are 1-based.
pub const DEFAULT_PAGE: u32 = 1;

/// One page of a list endpoint. Count fields are absent on some backends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub pages: Option<u32>,
}

impl<T> Page<T> {
    /// Page count, derived from `total` when the backend omits `pages`.
    #[must_use]
    pub fn page_count(&self) -> Option<u32> {
        self.pages.or_else(|| {
            let per_page = u64::from(self.per_page?);
            if per_page == 0 {
                return None;
            }
            u32::try_from(self.total?.div_ceil(per_page)).ok()
        })
    }
}

/// CRUD over one collection path such as `/products`.
#[derive(Clone, Debug)]
pub struct Resource {
    client: ApiClient,
    collection: &'static str,
}

impl Resource {
    #[must_use]
    pub fn new(client: ApiClient, collection: &'static str) -> Self {
        Self { client, collection }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn item_path(&self, id: i64) -> String {
        format!("{}/{id}", self.collection)
    }

    pub async fn list<T: DeserializeOwned>(&self, query: &QueryPairs) -> Result<Page<T>, ApiError> {
        self.client.get(self.collection, query).await
    }

    pub async fn get<T: DeserializeOwned>(&self, id: i64) -> Result<T, ApiError> {
        self.client.get(&self.item_path(id), &[]).await
    }

    pub async fn create<T: DeserializeOwned, B: Serialize + ?Sized>(&self, body: &B) -> Result<T, ApiError> {
        self.client.post(self.collection, body).await
    }

    pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(&self, id: i64, body: &B) -> Result<T, ApiError> {
        self.client.put(&self.item_path(id), body).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&self.item_path(id)).await
    }
}

/// `page`, `per_page` and a non-blank `query` term.
pub(crate) fn page_params(page: u32, per_page: u32, search: Option<&str>) -> QueryPairs {
    let mut pairs: QueryPairs = vec![("page", page.to_string()), ("per_page", per_page.to_string())];
    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        pairs.push(("query", term.to_owned()));
    }
    pairs
}
