//! Authentication service client.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::instrument;

use crate::models::SessionData;

use super::{ApiClient, ApiError};

/// New-account payload for signup.
///
/// The password stays wrapped until the request body is built, so it never
/// shows up in logs or `Debug` output.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub phone: Option<String>,
}

/// Authentication collaborator.
///
/// The session container takes this as a generic so tests can substitute a
/// stub that never touches the network.
pub trait AuthApi {
    /// Exchange credentials for a token and profile.
    fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<SessionData, ApiError>> + Send;

    /// Create an account and log it in.
    fn signup(
        &self,
        request: &SignupRequest,
    ) -> impl Future<Output = Result<SessionData, ApiError>> + Send;
}

/// Auth client over the REST backend.
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    /// Create a client over the shared [`ApiClient`].
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl AuthApi for AuthClient {
    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &SecretString) -> Result<SessionData, ApiError> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });
        self.api.post("/auth/login", &body).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn signup(&self, request: &SignupRequest) -> Result<SessionData, ApiError> {
        let body = json!({
            "name": request.name,
            "email": request.email,
            "password": request.password.expose_secret(),
            "phone": request.phone,
        });
        self.api.post("/auth/signup", &body).await
    }
}
