//! Intercepted REST client used by every screen.
//!
//! SYSTEM CONTEXT
//! ==============
//! All outbound calls except login pass through [`ApiClient::send`], which
//! attaches `Authorization: Bearer <token>` from the live session and reports
//! any 401 to the gateway. The gateway decides whether that ends the session
//! and performs the redirect; call sites only see `ApiError::Unauthorized`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, extract_detail};
use crate::gateway::AuthGateway;

/// Query pairs appended to a request URL.
pub type QueryPairs = Vec<(&'static str, String)>;

/// Body of an outbound request.
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(reqwest::multipart::Form),
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    gateway: Arc<AuthGateway>,
}

impl ApiClient {
    #[must_use]
    pub fn new(gateway: Arc<AuthGateway>) -> Self {
        Self { gateway }
    }

    #[must_use]
    pub fn gateway(&self) -> &Arc<AuthGateway> {
        &self.gateway
    }

    /// The single interception point. Returns the raw success body.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: RequestBody,
    ) -> Result<String, ApiError> {
        let url = format!("{}{path}", self.gateway.base_url());
        let token = self.gateway.bearer_token();

        let mut request = self.gateway.http().request(method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token.as_deref() {
            request = request.bearer_auth(token);
        }
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!(%method, path, "request unauthorized");
            if let Some(token) = token.as_deref() {
                self.gateway.expire_session(token);
            }
            return Err(ApiError::Unauthorized);
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !status.is_success() {
            tracing::warn!(%method, path, status = status.as_u16(), "request failed");
            return Err(ApiError::Status { status: status.as_u16(), detail: extract_detail(&text) });
        }
        Ok(text)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&'static str, String)]) -> Result<T, ApiError> {
        let text = self.send(Method::GET, path, query, RequestBody::Empty).await?;
        decode(&text)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let text = self.send(Method::POST, path, &[], json_body(body)?).await?;
        decode(&text)
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let text = self.send(Method::PUT, path, &[], json_body(body)?).await?;
        decode(&text)
    }

    /// `PUT` without a body (action endpoints such as `set-primary`).
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.send(Method::PUT, path, &[], RequestBody::Empty).await?;
        decode(&text)
    }

    /// `DELETE`; whatever body the backend sends back is discarded.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, &[], RequestBody::Empty).await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let text = self.send(Method::POST, path, &[], RequestBody::Multipart(form)).await?;
        decode(&text)
    }
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<RequestBody, ApiError> {
    serde_json::to_value(body)
        .map(RequestBody::Json)
        .map_err(|e| ApiError::Parse(format!("request body encode failed: {e}")))
}

/// Decode a success body; an empty body decodes as JSON `null`.
pub(crate) fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}
