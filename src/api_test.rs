use std::sync::Mutex;

use serde_json::{Value, json};

use super::*;
use crate::test_backend::TestBackend;

async fn signed_in(backend: &TestBackend) -> (ApiClient, Arc<Mutex<Vec<String>>>) {
    backend.script_login_ok("alice", "tok1", json!({ "id": 7, "username": "alice", "role_id": 2 }));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let gateway = backend
        .gateway()
        .with_navigator(move |path: &str| sink.lock().unwrap().push(path.to_owned()));
    gateway.login("alice", "Secret123").await.unwrap();
    (ApiClient::new(Arc::new(gateway)), seen)
}

#[tokio::test]
async fn attaches_bearer_token_from_live_session() {
    let backend = TestBackend::spawn().await;
    backend.script("GET", "/products", 200, json!({ "items": [], "total": 0 }));
    let (client, _) = signed_in(&backend).await;

    let body: Value = client.get("/products", &[]).await.unwrap();
    assert_eq!(body["total"], 0);
    assert_eq!(backend.last_request().authorization.as_deref(), Some("Bearer tok1"));
}

#[tokio::test]
async fn sends_query_pairs() {
    let backend = TestBackend::spawn().await;
    let (client, _) = signed_in(&backend).await;

    let _: Value = client
        .get("/products", &[("page", "2".to_owned()), ("query", "red shoe".to_owned())])
        .await
        .unwrap();
    let query = backend.last_request().query.unwrap();
    assert!(query.contains("page=2"));
    assert!(query.contains("query=red+shoe") || query.contains("query=red%20shoe"));
}

#[tokio::test]
async fn anonymous_request_carries_no_authorization() {
    let backend = TestBackend::spawn().await;
    let client = ApiClient::new(Arc::new(backend.gateway()));

    let err = client.get::<Value>("/products", &[]).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(backend.last_request().authorization, None);
}

#[tokio::test]
async fn revoked_token_expires_session_without_explicit_logout() {
    let backend = TestBackend::spawn().await;
    let (client, navigations) = signed_in(&backend).await;
    backend.revoke_token("tok1");

    let err = client.get::<Value>("/products", &[]).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));

    let gateway = client.gateway();
    assert!(!gateway.is_authenticated());
    assert_eq!(gateway.current_identity(), None);
    assert_eq!(*navigations.lock().unwrap(), vec!["/login".to_owned()]);

    // The next request goes out without a token.
    let _ = client.get::<Value>("/products", &[]).await;
    assert_eq!(backend.last_request().authorization, None);
    assert_eq!(navigations.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn parallel_401s_expire_once() {
    let backend = TestBackend::spawn().await;
    let (client, navigations) = signed_in(&backend).await;
    backend.revoke_token("tok1");

    let (a, b, c) = tokio::join!(
        client.get::<Value>("/products", &[]),
        client.get::<Value>("/brands", &[]),
        client.delete("/categories/4"),
    );
    assert!(matches!(a, Err(ApiError::Unauthorized)));
    assert!(matches!(b, Err(ApiError::Unauthorized)));
    assert!(matches!(c, Err(ApiError::Unauthorized)));
    assert_eq!(navigations.lock().unwrap().len(), 1);
    assert!(!client.gateway().is_authenticated());
}

#[tokio::test]
async fn non_401_failure_keeps_session_and_exposes_detail() {
    let backend = TestBackend::spawn().await;
    backend.script("GET", "/products/99", 404, json!({ "detail": "Product not found" }));
    backend.script("DELETE", "/brands/3", 403, json!({ "detail": "Not enough permissions" }));
    let (client, navigations) = signed_in(&backend).await;

    let err = client.get::<Value>("/products/99", &[]).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
    assert_eq!(err.detail(), Some("Product not found"));

    let err = client.delete("/brands/3").await.unwrap_err();
    assert_eq!(err.detail(), Some("Not enough permissions"));

    assert!(client.gateway().is_authenticated());
    assert!(navigations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn json_body_is_sent_on_post_and_put() {
    let backend = TestBackend::spawn().await;
    backend.script("POST", "/brands", 201, json!({ "id": 4, "name": "Acme" }));
    let (client, _) = signed_in(&backend).await;

    let created: Value = client.post("/brands", &json!({ "name": "Acme" })).await.unwrap();
    assert_eq!(created["id"], 4);
    let seen = backend.last_request();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    assert_eq!(serde_json::from_str::<Value>(&seen.body).unwrap(), json!({ "name": "Acme" }));

    let _: Value = client.put("/brands/4", &json!({ "name": "Acme Co" })).await.unwrap();
    assert_eq!(backend.last_request().method, "PUT");
}

#[test]
fn decode_treats_empty_body_as_null() {
    let value: Option<Value> = decode("").unwrap();
    assert_eq!(value, None);
    let blank: Option<Value> = decode("  \n").unwrap();
    assert!(blank.is_none());
}

#[test]
fn decode_reports_parse_errors() {
    let err = decode::<Vec<i64>>("{\"not\": \"a list\"}").unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}
