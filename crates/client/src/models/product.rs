//! Product reference held by the cart and favorites containers.

use serde::{Deserialize, Serialize};

use caju_core::{Price, ProductId};

/// The slice of a product the client state keeps.
///
/// Enough to render a cart line or a favorites card without refetching;
/// the full catalog entry lives server-side and is fetched per page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_shape() {
        let product = ProductRef {
            id: ProductId::new(3),
            name: "Caju juice".to_string(),
            price: Price::from_cents(1250),
            image_url: None,
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "Caju juice");
        assert_eq!(json["price"], "12.50");
    }

    #[test]
    fn test_image_url_defaults_when_missing() {
        let product: ProductRef =
            serde_json::from_str(r#"{"id":1,"name":"x","price":"1.00"}"#).unwrap();
        assert!(product.image_url.is_none());
    }
}
