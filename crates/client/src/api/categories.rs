//! Category client.

use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use caju_core::CategoryId;

use super::types::Category;
use super::{ApiClient, ApiError};

const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Categories client over the REST backend.
///
/// The category list is small and nearly static; one cached entry covers
/// the whole catalog tree.
#[derive(Clone)]
pub struct CategoriesClient {
    api: ApiClient,
    cache: Cache<String, Vec<Category>>,
}

impl CategoriesClient {
    /// Create a client over the shared [`ApiClient`].
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(10)
            .time_to_live(CACHE_TTL)
            .build();
        Self { api, cache }
    }

    /// Fetch all categories.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let cache_key = "categories:all".to_string();
        if let Some(categories) = self.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.api.get("/categories").await?;
        self.cache.insert(cache_key, categories.clone()).await;
        Ok(categories)
    }

    /// Fetch one category by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn get_category(&self, id: CategoryId) -> Result<Category, ApiError> {
        self.api.get(&format!("/categories/{id}")).await
    }

    /// Drop all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}
