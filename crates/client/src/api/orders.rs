//! Order service client.

use tracing::instrument;

use caju_core::OrderId;

use super::types::{Order, OrderRequest};
use super::{ApiClient, ApiError};

/// Order-creation collaborator.
///
/// The checkout wizard takes this as a generic so its submit path can be
/// tested without a backend.
pub trait OrderApi {
    /// Create an order from the assembled request.
    fn create_order(
        &self,
        request: &OrderRequest,
    ) -> impl Future<Output = Result<Order, ApiError>> + Send;
}

/// Orders client over the REST backend.
///
/// Order data is never cached: the history page should always show what
/// the backend currently knows.
#[derive(Clone)]
pub struct OrdersClient {
    api: ApiClient,
}

impl OrdersClient {
    /// Create a client over the shared [`ApiClient`].
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the authenticated user's orders.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.api.get("/orders").await
    }

    /// Fetch one order by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.api.get(&format!("/orders/{id}")).await
    }

    /// Cancel an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the order is past
    /// cancellation.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.api.put_empty(&format!("/orders/{id}/cancel")).await
    }
}

impl OrderApi for OrdersClient {
    #[instrument(skip(self, request))]
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, ApiError> {
        self.api.post("/orders", request).await
    }
}
