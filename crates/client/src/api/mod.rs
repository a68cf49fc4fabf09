//! Clients for the REST backend.
//!
//! One thin client per resource, all sharing an [`ApiClient`] that owns the
//! HTTP connection pool, the base URL, and the bearer token echoed from the
//! session container. Responses are deserialized into the explicit DTOs in
//! [`types`]; anything structurally wrong is a decode error at this
//! boundary, never a half-trusted value deeper in.

pub mod auth;
pub mod categories;
pub mod orders;
pub mod products;
pub mod types;
pub mod users;

pub use auth::{AuthApi, AuthClient};
pub use categories::CategoriesClient;
pub use orders::{OrderApi, OrdersClient};
pub use products::ProductsClient;
pub use users::{UsersApi, UsersClient};

use std::sync::{Arc, RwLock};

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::ClientConfig;
use crate::sync;

use types::ErrorBody;

/// Errors from backend calls.
///
/// Propagated to the initiating UI action; container state is never
/// changed by a failed call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the transport failed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The bearer token was missing or rejected (HTTP 401).
    #[error("session expired, please log in again")]
    Unauthorized,

    /// The backend rejected the request; `message` is its own wording,
    /// surfaced verbatim in the UI.
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

/// Shared token cell.
///
/// The session container writes it on login/logout; [`ApiClient`] reads it
/// when building request headers. Mirrors the pairing rule: a token exists
/// here exactly when a session exists there.
#[derive(Clone, Default)]
pub struct TokenCell {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenCell {
    /// Create an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token, if any.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        sync::read(&self.inner).clone()
    }

    /// Replace the token.
    pub fn set(&self, token: Option<String>) {
        *sync::write(&self.inner) = token;
    }
}

/// Shared HTTP client for the REST backend.
///
/// Cheaply cloneable; every resource client holds one.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    token: TokenCell,
}

impl ApiClient {
    /// Build the client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &ClientConfig, token: TokenCell) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_base_url.clone(),
                token,
            }),
        })
    }

    /// GET `path` and deserialize the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, 401, or backend rejection.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.inner.http.get(self.url(path));
        self.execute(request).await
    }

    /// POST `body` as JSON to `path` and deserialize the response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, 401, or backend rejection.
    pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.inner.http.post(self.url(path)).json(body);
        self.execute(request).await
    }

    /// PUT `body` as JSON to `path` and deserialize the response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, 401, or backend rejection.
    pub async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.inner.http.put(self.url(path)).json(body);
        self.execute(request).await
    }

    /// PUT to `path` with an empty body and deserialize the response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, 401, or backend rejection.
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.inner.http.put(self.url(path));
        self.execute(request).await
    }

    /// POST `body` as JSON to `path`, expecting no response body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, 401, or backend rejection.
    pub async fn post_no_content<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let request = self.inner.http.post(self.url(path)).json(body);
        let response = self.send(request).await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// DELETE `path`, expecting no response body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, 401, or backend rejection.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.inner.http.delete(self.url(path));
        let response = self.send(request).await?;
        Self::check_status(response).await?;
        Ok(())
    }

    // Plain concatenation, not Url::join: resource paths carry a leading
    // slash and must not drop a path prefix on the base URL (e.g. `/api`).
    fn url(&self, path: &str) -> String {
        format!(
            "{}{path}",
            self.inner.base_url.as_str().trim_end_matches('/')
        )
    }

    async fn send(
        &self,
        mut request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        if let Some(token) = self.inner.token.get() {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            // Prefer the backend's own message when the error body decodes
            let message = response
                .json::<ErrorBody>()
                .await
                .map_or_else(|_| format!("HTTP error {status}"), |body| body.message);
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_cell_roundtrip() {
        let cell = TokenCell::new();
        assert!(cell.get().is_none());

        cell.set(Some("abc".to_string()));
        assert_eq!(cell.get().as_deref(), Some("abc"));

        cell.set(None);
        assert!(cell.get().is_none());
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let config = ClientConfig {
            api_base_url: "http://localhost:8080/api".parse().unwrap(),
            data_dir: std::path::PathBuf::from(".caju-test"),
            http_timeout: std::time::Duration::from_secs(5),
        };
        let client = ApiClient::new(&config, TokenCell::new()).unwrap();
        assert_eq!(client.url("/products"), "http://localhost:8080/api/products");

        let config = ClientConfig {
            api_base_url: "http://localhost:8080/api/".parse().unwrap(),
            ..config
        };
        let client = ApiClient::new(&config, TokenCell::new()).unwrap();
        assert_eq!(client.url("/products/3"), "http://localhost:8080/api/products/3");
    }

    #[test]
    fn test_rejected_error_displays_backend_message() {
        let err = ApiError::Rejected {
            status: 409,
            message: "Email já cadastrado".to_string(),
        };
        assert_eq!(err.to_string(), "Email já cadastrado");
    }
}
