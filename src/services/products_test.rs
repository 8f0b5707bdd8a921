use serde_json::json;

use super::*;
use crate::test_backend::TestBackend;

fn pair(key: &'static str, value: &str) -> (&'static str, String) {
    (key, value.to_owned())
}

#[test]
fn default_query_lists_first_page_including_inactive() {
    assert_eq!(ProductQuery::default().to_pairs(), vec![pair("page", "1"), pair("per_page", "10")]);
}

#[test]
fn query_carries_all_filters() {
    let query = ProductQuery {
        page: 2,
        per_page: 25,
        search: Some("red shoe".to_owned()),
        category_id: Some(3),
        brand_id: Some(8),
        include_inactive: false,
    };
    assert_eq!(
        query.to_pairs(),
        vec![
            pair("page", "2"),
            pair("per_page", "25"),
            pair("query", "red shoe"),
            pair("category_id", "3"),
            pair("brand_id", "8"),
            pair("is_active", "true"),
        ]
    );
}

#[test]
fn product_keeps_unknown_fields() {
    let product: Product = serde_json::from_value(json!({
        "id": 1,
        "name": "Lamp",
        "price": 19.5,
        "category": { "id": 3, "name": "Lighting" }
    }))
    .unwrap();
    assert_eq!(product.price, Some(19.5));
    assert_eq!(product.sku, None);
    assert!(product.extra.contains_key("category"));
}

#[tokio::test]
async fn list_sends_filters_and_parses_page() {
    let backend = TestBackend::spawn().await;
    backend.script(
        "GET",
        "/products",
        200,
        json!({
            "items": [{ "id": 1, "name": "Lamp", "is_active": false }],
            "total": 1, "page": 1, "per_page": 10, "pages": 1
        }),
    );
    let service = ProductService::new(backend.admin_client().await);

    let page = service
        .list(&ProductQuery { brand_id: Some(8), ..ProductQuery::default() })
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].is_active, Some(false));
    assert_eq!(page.total, Some(1));

    let seen = backend.last_request();
    assert_eq!(seen.path, "/products");
    assert_eq!(seen.query.as_deref(), Some("page=1&per_page=10&brand_id=8"));
}

#[tokio::test]
async fn update_puts_to_item_path() {
    let backend = TestBackend::spawn().await;
    backend.script("PUT", "/products/4", 200, json!({ "id": 4, "name": "Desk", "stock": 0 }));
    let service = ProductService::new(backend.admin_client().await);

    let product = service.update(4, &json!({ "stock": 0 })).await.unwrap();
    assert_eq!(product.stock, Some(0));
    assert_eq!(backend.last_request().body, r#"{"stock":0}"#);
}

#[tokio::test]
async fn missing_product_surfaces_detail() {
    let backend = TestBackend::spawn().await;
    backend.script("GET", "/products/404", 404, json!({ "detail": "Product not found" }));
    let service = ProductService::new(backend.admin_client().await);

    let err = service.get(404).await.unwrap_err();
    assert_eq!(err.detail(), Some("Product not found"));
}
