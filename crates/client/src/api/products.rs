//! Product catalog client.
//!
//! Read-only list/detail fetches feeding the page assemblies, cached with
//! `moka` (5-minute TTL). The backend has no by-category endpoint, so
//! category listings filter the cached full list client-side.

use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use caju_core::{CategoryId, ProductId};

use super::types::Product;
use super::{ApiClient, ApiError};

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}

/// Products client over the REST backend.
#[derive(Clone)]
pub struct ProductsClient {
    api: ApiClient,
    cache: Cache<String, CacheValue>,
}

impl ProductsClient {
    /// Create a client over the shared [`ApiClient`].
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();
        Self { api, cache }
    }

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let cache_key = "products:all".to_string();
        if let Some(CacheValue::Products(products)) = self.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.api.get("/products").await?;
        self.cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{id}");
        if let Some(CacheValue::Product(product)) = self.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.api.get(&format!("/products/{id}")).await?;
        self.cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Fetch the products belonging to a category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the underlying list request fails.
    #[instrument(skip(self))]
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, ApiError> {
        let products = self.list_products().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.in_category(category_id))
            .collect())
    }

    /// Drop all cached entries (after admin catalog edits).
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}
