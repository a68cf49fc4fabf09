//! User service client.
//!
//! Profile reads/updates for the account pages plus the user CRUD behind
//! the management panel.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::instrument;

use caju_core::UserId;

use crate::models::UserProfile;

use super::{ApiClient, ApiError};

/// Profile-fetch collaborator.
///
/// The session container refreshes the stored profile through this, so
/// tests can substitute a stub.
pub trait UsersApi {
    /// Fetch one user's profile.
    fn get_user(&self, id: UserId) -> impl Future<Output = Result<UserProfile, ApiError>> + Send;
}

/// Users client over the REST backend.
#[derive(Clone)]
pub struct UsersClient {
    api: ApiClient,
}

impl UsersClient {
    /// Create a client over the shared [`ApiClient`].
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch all users (management panel).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, ApiError> {
        self.api.get("/users").await
    }

    /// Create a user (management panel).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self, profile), fields(email = %profile.email))]
    pub async fn create_user(&self, profile: &UserProfile) -> Result<UserProfile, ApiError> {
        self.api.post("/users", profile).await
    }

    /// Update a user's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self, profile))]
    pub async fn update_user(
        &self,
        id: UserId,
        profile: &UserProfile,
    ) -> Result<UserProfile, ApiError> {
        self.api.put(&format!("/users/{id}"), profile).await
    }

    /// Delete a user (management panel).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.api.delete(&format!("/users/{id}")).await
    }

    /// Change the user's password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the current password is wrong or the request
    /// fails.
    #[instrument(skip(self, current_password, new_password))]
    pub async fn change_password(
        &self,
        id: UserId,
        current_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), ApiError> {
        let body = json!({
            "currentPassword": current_password.expose_secret(),
            "newPassword": new_password.expose_secret(),
        });
        self.api
            .post_no_content(&format!("/users/{id}/change-password"), &body)
            .await
    }
}

impl UsersApi for UsersClient {
    #[instrument(skip(self))]
    async fn get_user(&self, id: UserId) -> Result<UserProfile, ApiError> {
        self.api.get(&format!("/users/{id}")).await
    }
}
