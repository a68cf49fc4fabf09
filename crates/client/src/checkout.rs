//! Multi-step checkout wizard.
//!
//! `Cart → Address → Payment → Confirmed`. Going back is always allowed;
//! going forward requires the current step's required fields to be present
//! (non-empty after trim). The draft lives only for the flow, except the
//! validated address, which is handed off through the mirror so an
//! interrupted checkout resumes with it. Submission happens at `Payment`:
//! on failure the wizard stays put and surfaces the collaborator's message,
//! on success the cart is cleared, the draft discarded, and the wizard
//! reaches its terminal state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use caju_core::{PaymentMethod, Price};

use crate::api::orders::OrderApi;
use crate::api::types::{Order, OrderItemRequest, OrderRequest};
use crate::api::ApiError;
use crate::containers::CartContainer;
use crate::mirror::{MirrorStore, keys};
use crate::models::{ShippingAddress, UserProfile};

/// Wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Cart,
    Address,
    Payment,
    /// Terminal: only reached after the order service accepts the order.
    Confirmed,
}

/// Shipping options offered at checkout, with fixed prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ShippingOption {
    #[default]
    Standard,
    Express,
    SameDay,
}

impl ShippingOption {
    /// Flat shipping price for this option.
    #[must_use]
    pub fn price(self) -> Price {
        match self {
            Self::Standard => Price::new(Decimal::new(1500, 2)),
            Self::Express => Price::new(Decimal::new(3500, 2)),
            Self::SameDay => Price::new(Decimal::new(5000, 2)),
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Entrega Padrão",
            Self::Express => "Entrega Expressa",
            Self::SameDay => "Entrega no Mesmo Dia",
        }
    }

    /// Delivery estimate shown next to the label.
    #[must_use]
    pub const fn estimate(self) -> &'static str {
        match self {
            Self::Standard => "5-7 dias úteis",
            Self::Express => "2-3 dias úteis",
            Self::SameDay => "Até 23:59 de hoje",
        }
    }
}

/// Card and document fields collected at the payment step.
#[derive(Debug, Clone, Default)]
pub struct PaymentFields {
    pub card_number: String,
    pub card_name: String,
    pub card_expiry: String,
    pub card_cvv: String,
    pub cpf: String,
}

/// Transient checkout form state.
#[derive(Debug, Clone, Default)]
pub struct CheckoutDraft {
    pub address: ShippingAddress,
    pub shipping: ShippingOption,
    pub payment_method: PaymentMethod,
    pub payment: PaymentFields,
}

/// Errors surfaced by the wizard.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A required field of the current step is blank.
    #[error("required field missing: {0}")]
    MissingField(&'static str),

    /// Forward from the cart step needs at least one line.
    #[error("cart is empty")]
    EmptyCart,

    /// `submit` called on a step other than `Payment`.
    #[error("submit is only valid at the payment step")]
    NotAtPayment,

    /// The order service rejected the submission.
    #[error(transparent)]
    Order(#[from] ApiError),
}

/// The checkout wizard.
///
/// One instance per flow; dropped (with its draft) when the flow ends.
pub struct CheckoutWizard {
    cart: CartContainer,
    mirror: MirrorStore,
    step: CheckoutStep,
    draft: CheckoutDraft,
}

impl CheckoutWizard {
    /// Start a checkout over the given cart.
    ///
    /// The address pre-fills from a previously handed-off address if one is
    /// mirrored, else from the profile's stored address block.
    #[must_use]
    pub fn begin(
        cart: CartContainer,
        mirror: MirrorStore,
        profile: Option<&UserProfile>,
    ) -> Self {
        let address = mirror
            .load::<ShippingAddress>(keys::CHECKOUT_ADDRESS)
            .into_option()
            .or_else(|| profile.map(ShippingAddress::from_profile))
            .unwrap_or_default();

        Self {
            cart,
            mirror,
            step: CheckoutStep::Cart,
            draft: CheckoutDraft {
                address,
                ..CheckoutDraft::default()
            },
        }
    }

    /// Current step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Current draft.
    #[must_use]
    pub const fn draft(&self) -> &CheckoutDraft {
        &self.draft
    }

    /// Mutable access to the address form.
    pub const fn address_mut(&mut self) -> &mut ShippingAddress {
        &mut self.draft.address
    }

    /// Mutable access to the payment form.
    pub const fn payment_mut(&mut self) -> &mut PaymentFields {
        &mut self.draft.payment
    }

    /// Select a shipping option.
    pub const fn set_shipping(&mut self, shipping: ShippingOption) {
        self.draft.shipping = shipping;
    }

    /// Select a payment method.
    pub const fn set_payment_method(&mut self, method: PaymentMethod) {
        self.draft.payment_method = method;
    }

    /// Cart subtotal.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.cart.total()
    }

    /// Selected shipping price.
    #[must_use]
    pub fn shipping_cost(&self) -> Price {
        self.draft.shipping.price()
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn total(&self) -> Price {
        self.subtotal() + self.shipping_cost()
    }

    /// Step backward. Always permitted; `Confirmed` is terminal and `Cart`
    /// has nowhere to go, so both are no-ops.
    pub const fn back(&mut self) {
        self.step = match self.step {
            CheckoutStep::Payment => CheckoutStep::Address,
            CheckoutStep::Address => CheckoutStep::Cart,
            CheckoutStep::Cart | CheckoutStep::Confirmed => self.step,
        };
    }

    /// Step forward after validating the current step.
    ///
    /// Advancing past `Address` hands the validated address off through the
    /// mirror. `Payment` advances only through [`Self::submit`], and
    /// `Confirmed` is terminal; for both, `next` reports the current step.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` when validation fails; the wizard stays on
    /// the current step.
    pub fn next(&mut self) -> Result<CheckoutStep, CheckoutError> {
        match self.step {
            CheckoutStep::Cart => {
                if self.cart.is_empty() {
                    return Err(CheckoutError::EmptyCart);
                }
                self.step = CheckoutStep::Address;
            }
            CheckoutStep::Address => {
                validate_address(&self.draft.address)?;
                if let Err(e) = self.mirror.save(keys::CHECKOUT_ADDRESS, &self.draft.address) {
                    tracing::warn!("Failed to mirror checkout address: {e}");
                }
                self.step = CheckoutStep::Payment;
            }
            CheckoutStep::Payment | CheckoutStep::Confirmed => {}
        }
        Ok(self.step)
    }

    /// Submit the order.
    ///
    /// On success the cart is cleared, the mirrored address handoff is
    /// removed, and the wizard moves to `Confirmed`. On failure nothing
    /// changes: the wizard stays at `Payment` with the cart intact and the
    /// collaborator's error goes back to the caller for display.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` on validation failure or order-service
    /// rejection.
    pub async fn submit<O: OrderApi>(&mut self, orders: &O) -> Result<Order, CheckoutError> {
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::NotAtPayment);
        }
        validate_payment(&self.draft.payment, self.draft.payment_method)?;

        let lines = self.cart.lines();
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let request = OrderRequest {
            items: lines
                .iter()
                .map(|line| OrderItemRequest {
                    product_id: line.product.id,
                    quantity: line.quantity,
                    price: line.product.price,
                })
                .collect(),
            shipping_address: self.draft.address.clone(),
            payment_method: self.draft.payment_method,
            shipping_cost: self.shipping_cost(),
            subtotal: self.subtotal(),
            total: self.total(),
        };

        let order = orders.create_order(&request).await?;

        self.cart.clear();
        if let Err(e) = self.mirror.remove(keys::CHECKOUT_ADDRESS) {
            tracing::warn!("Failed to discard mirrored checkout address: {e}");
        }
        self.step = CheckoutStep::Confirmed;
        Ok(order)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), CheckoutError> {
    if value.trim().is_empty() {
        return Err(CheckoutError::MissingField(field));
    }
    Ok(())
}

fn validate_address(address: &ShippingAddress) -> Result<(), CheckoutError> {
    require("recipientName", &address.recipient_name)?;
    require("email", &address.email)?;
    require("phone", &address.phone)?;
    require("street", &address.street)?;
    require("number", &address.number)?;
    require("neighborhood", &address.neighborhood)?;
    require("city", &address.city)?;
    require("state", &address.state)?;
    require("zipCode", &address.zip_code)
}

fn validate_payment(
    payment: &PaymentFields,
    method: PaymentMethod,
) -> Result<(), CheckoutError> {
    require("cpf", &payment.cpf)?;
    if method.requires_card() {
        require("cardNumber", &payment.card_number)?;
        require("cardName", &payment.card_name)?;
        require("cardExpiry", &payment.card_expiry)?;
        require("cardCVV", &payment.card_cvv)?;
    }
    Ok(())
}
