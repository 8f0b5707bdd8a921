//! Product image client (`/product-images`).
//!
//! Images are listed per product and uploaded as multipart form data; the
//! backend stores the file and returns the created record.

#[cfg(test)]
#[path = "images_test.rs"]
mod images_test;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use crate::api::ApiClient;
use crate::error::ApiError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: i64,
    pub product_id: i64,
    pub image_url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub display_order: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A file plus the metadata sent alongside it.
#[derive(Clone, Debug, Default)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub product_id: i64,
    pub alt_text: Option<String>,
    pub is_primary: bool,
    pub display_order: i64,
}

impl ImageUpload {
    fn into_form(self) -> Result<Form, ApiError> {
        let mut file = Part::bytes(self.bytes).file_name(self.file_name);
        if let Some(mime) = self.content_type.as_deref() {
            file = file
                .mime_str(mime)
                .map_err(|e| ApiError::Request(format!("invalid content type {mime}: {e}")))?;
        }

        let mut form = Form::new()
            .part("file", file)
            .text("product_id", self.product_id.to_string());
        if let Some(alt) = self.alt_text.filter(|a| !a.is_empty()) {
            form = form.text("alt_text", alt);
        }
        Ok(form
            .text("is_primary", self.is_primary.to_string())
            .text("display_order", self.display_order.to_string()))
    }
}

#[derive(Clone, Debug)]
pub struct ImageService {
    resource: Resource,
}

impl ImageService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { resource: Resource::new(client, "/product-images") }
    }

    pub async fn list_for_product(&self, product_id: i64) -> Result<Vec<ProductImage>, ApiError> {
        self.resource
            .client()
            .get(&format!("/product-images/by-product/{product_id}"), &[])
            .await
    }

    pub async fn get(&self, id: i64) -> Result<ProductImage, ApiError> {
        self.resource.get(id).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, image: &B) -> Result<ProductImage, ApiError> {
        self.resource.create(image).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: i64, image: &B) -> Result<ProductImage, ApiError> {
        self.resource.update(id, image).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.resource.delete(id).await
    }

    /// Mark `id` as its product's primary image.
    pub async fn set_primary(&self, id: i64) -> Result<ProductImage, ApiError> {
        self.resource
            .client()
            .put_empty(&format!("/product-images/{id}/set-primary"))
            .await
    }

    pub async fn upload(&self, upload: ImageUpload) -> Result<ProductImage, ApiError> {
        let product_id = upload.product_id;
        let size = upload.bytes.len();
        let form = upload.into_form()?;
        let image: ProductImage = self
            .resource
            .client()
            .post_multipart("/product-images/upload", form)
            .await?;
        tracing::info!(product_id, image_id = image.id, size, "product image uploaded");
        Ok(image)
    }
}
