//! Wire DTOs for the REST backend.
//!
//! Field names follow the backend's camelCase JSON. Optional fields default
//! on ingress; structurally wrong payloads fail to decode and surface as
//! request errors rather than propagating half-formed values.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use caju_core::{CategoryId, OrderId, OrderStatus, PaymentMethod, Price, ProductId};

use crate::models::{ProductRef, ShippingAddress};

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Product {
    /// The slice of this product the containers keep.
    #[must_use]
    pub fn to_ref(&self) -> ProductRef {
        ProductRef {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            image_url: self.image_url.clone(),
        }
    }

    /// Whether the product belongs to `category_id`.
    #[must_use]
    pub fn in_category(&self, category_id: CategoryId) -> bool {
        self.categories.iter().any(|c| c.id == category_id)
    }
}

/// One line of an order request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Price,
}

/// Order creation request posted at checkout submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub shipping_cost: Price,
    pub subtotal: Price,
    pub total: Price,
}

/// One line of an order response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub product_image_url: Option<String>,
    pub quantity: u32,
    pub price: Price,
    pub sub_total: Price,
}

/// Order as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub moment: NaiveDateTime,
    pub status: OrderStatus,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub shipping_cost: Price,
    #[serde(default)]
    pub subtotal: Price,
    pub total: Price,
}
