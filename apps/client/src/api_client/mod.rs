//! API client: the single path by which the crate talks to the recruitment backend.
//!
//! Every request built here gets the bearer token attached (when a live one is
//! stored) and every response is shown to the registered interceptors before
//! it is decoded. No retries: a failure is reported once.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod interceptor;

pub use interceptor::{ResponseInterceptor, SessionExpiryGuard};

use crate::errors::ApiError;
use crate::session::SessionSlot;

/// The `{data, message}` wrapper most backend routes answer with.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionSlot>,
    interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: Arc<SessionSlot>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            interceptors: Vec::new(),
        })
    }

    /// Registers an interceptor for every response issued through this client
    /// and its clones made afterwards.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Starts a request to `path` (relative to the base URL, leading `/`).
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match self.session.live_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and returns the raw body of a successful response.
    pub async fn execute(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let path = response.url().path().to_string();
        debug!("{path} -> {status}");

        for interceptor in &self.interceptors {
            interceptor.on_response(status, &path);
        }

        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized {
                message: error_message(&body),
            });
        }
        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(body)
    }

    /// Decodes the whole response body as `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let body = self.execute(builder).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Decodes the `data` field of an enveloped response.
    pub async fn fetch_data<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let envelope: Envelope<T> = self.fetch(builder).await?;
        envelope.data.ok_or(ApiError::MissingData)
    }

    /// Sends the request and discards whatever the backend answered.
    pub async fn send(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        self.execute(builder).await.map(|_| ())
    }

    pub async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.fetch_data(self.request(Method::GET, path)).await
    }

    pub async fn post_data<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch_data(self.request(Method::POST, path).json(body))
            .await
    }

    pub async fn put_data<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch_data(self.request(Method::PUT, path).json(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)).await
    }
}

/// Pulls a display message out of an error body, if it is the backend's JSON.
fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::session::storage::{MemoryStore, SessionStore, TOKEN_KEY};
    use crate::session::token::jwt_with_claims;
    use crate::testing::spawn_backend;

    async fn echo_auth(headers: HeaderMap) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Json(json!({ "data": { "authorization": auth } }))
    }

    fn client(base_url: &str) -> (Arc<MemoryStore>, ApiClient) {
        let store = Arc::new(MemoryStore::new());
        let slot = Arc::new(SessionSlot::new(store.clone()));
        let api = ApiClient::new(base_url, Duration::from_secs(5), slot).unwrap();
        (store, api)
    }

    #[test]
    fn test_error_message_reads_message_then_error() {
        assert_eq!(
            error_message(r#"{"message":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(
            error_message(r#"{"success":false,"error":"Job not found"}"#).as_deref(),
            Some("Job not found")
        );
        assert_eq!(error_message("<html>Bad Gateway</html>"), None);
    }

    #[tokio::test]
    async fn test_bearer_attached_when_token_stored() {
        let base = spawn_backend(Router::new().route("/auth/me", get(echo_auth))).await;
        let (store, api) = client(&base);
        let token = jwt_with_claims(json!({ "id": "u1" }));
        store.set(TOKEN_KEY, &token).unwrap();

        let echoed: Value = api.get_data("/auth/me").await.unwrap();
        assert_eq!(echoed["authorization"], format!("Bearer {token}"));
    }

    #[tokio::test]
    async fn test_no_header_without_token_or_with_expired_token() {
        let base = spawn_backend(Router::new().route("/auth/me", get(echo_auth))).await;
        let (store, api) = client(&base);

        let echoed: Value = api.get_data("/auth/me").await.unwrap();
        assert!(echoed["authorization"].is_null());

        store
            .set(TOKEN_KEY, &jwt_with_claims(json!({ "exp": 1 })))
            .unwrap();
        let echoed: Value = api.get_data("/auth/me").await.unwrap();
        assert!(echoed["authorization"].is_null());
    }

    #[tokio::test]
    async fn test_malformed_token_is_not_sent() {
        let base = spawn_backend(Router::new().route("/auth/me", get(echo_auth))).await;
        let (store, api) = client(&base);
        store.set(TOKEN_KEY, "not-a-jwt").unwrap();

        let echoed: Value = api.get_data("/auth/me").await.unwrap();
        assert!(echoed["authorization"].is_null());
    }

    #[tokio::test]
    async fn test_error_status_carries_backend_message() {
        let router = Router::new().route(
            "/jobs/:id",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "success": false, "message": "Job not found" })),
                )
            }),
        );
        let base = spawn_backend(router).await;
        let (_store, api) = client(&base);

        let err = api.get_data::<Value>("/jobs/42").await.unwrap_err();
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message.as_deref(), Some("Job not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_data_field_is_an_error() {
        let router = Router::new().route(
            "/profiles/me",
            get(|| async { Json(json!({ "message": "ok" })) }),
        );
        let base = spawn_backend(router).await;
        let (_store, api) = client(&base);

        let err = api.get_data::<Value>("/profiles/me").await.unwrap_err();
        assert!(matches!(err, ApiError::MissingData));
    }
}
