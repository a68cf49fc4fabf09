//! Status enums shared with the backend.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Matches the backend's order status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    WaitingPayment,
    Paid,
    Shipped,
    Delivered,
    Canceled,
}

impl OrderStatus {
    /// Whether the order can still be canceled by the customer.
    #[must_use]
    pub const fn cancelable(self) -> bool {
        matches!(self, Self::WaitingPayment | Self::Paid)
    }
}

/// Payment method selected at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Pix,
    Boleto,
}

impl PaymentMethod {
    /// Whether this method collects card fields at checkout.
    #[must_use]
    pub const fn requires_card(self) -> bool {
        matches!(self, Self::CreditCard)
    }
}
