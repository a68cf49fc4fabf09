//! Shopping cart container.
//!
//! Lines are unique per product id; adding an already-present product
//! increments its quantity instead of creating a second line. Quantities
//! are always >= 1 for any line present, and decrementing past 1 removes
//! the line. Derived values (item count, subtotals, total) are computed on
//! read, not cached.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use caju_core::{Price, ProductId};

use crate::mirror::{MirrorStore, keys};
use crate::models::ProductRef;
use crate::sync;

/// One product+quantity pair in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: ProductRef,
    pub quantity: u32,
}

impl CartLine {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The cart state container.
///
/// Cheaply cloneable handle; all clones share the same state.
#[derive(Clone)]
pub struct CartContainer {
    inner: Arc<CartInner>,
}

struct CartInner {
    lines: RwLock<Vec<CartLine>>,
    revision: AtomicU64,
    mirror: MirrorStore,
}

impl CartContainer {
    /// Load the cart from the mirror, falling back to empty on absent or
    /// corrupt data.
    #[must_use]
    pub fn load(mirror: MirrorStore) -> Self {
        let mut lines: Vec<CartLine> = mirror.load(keys::CART).into_option().unwrap_or_default();
        // A mirrored zero-quantity line would break the container invariant
        lines.retain(|line| line.quantity > 0);

        Self {
            inner: Arc::new(CartInner {
                lines: RwLock::new(lines),
                revision: AtomicU64::new(0),
                mirror,
            }),
        }
    }

    /// Add `quantity` of `product`, merging into an existing line.
    ///
    /// A zero quantity is ignored; quantities are the caller's
    /// responsibility and a line below 1 is never created.
    pub fn add(&self, product: ProductRef, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.mutate(|lines| {
            if let Some(line) = lines.iter_mut().find(|l| l.product.id == product.id) {
                line.quantity += quantity;
            } else {
                lines.push(CartLine { product, quantity });
            }
        });
    }

    /// Remove the line for `product_id`; absent ids are a no-op.
    pub fn remove(&self, product_id: ProductId) {
        self.mutate(|lines| lines.retain(|l| l.product.id != product_id));
    }

    /// Replace the quantity of an existing line; 0 removes the line and
    /// absent ids are a no-op.
    pub fn set_quantity(&self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        self.mutate(|lines| {
            if let Some(line) = lines.iter_mut().find(|l| l.product.id == product_id) {
                line.quantity = quantity;
            }
        });
    }

    /// Increase an existing line's quantity by one; absent ids are a no-op.
    pub fn increment(&self, product_id: ProductId) {
        self.mutate(|lines| {
            if let Some(line) = lines.iter_mut().find(|l| l.product.id == product_id) {
                line.quantity += 1;
            }
        });
    }

    /// Decrease an existing line's quantity by one, removing the line when
    /// it would drop below 1.
    pub fn decrement(&self, product_id: ProductId) {
        self.mutate(|lines| {
            if let Some(line) = lines.iter_mut().find(|l| l.product.id == product_id) {
                if line.quantity > 1 {
                    line.quantity -= 1;
                } else {
                    lines.retain(|l| l.product.id != product_id);
                }
            }
        });
    }

    /// Empty the cart.
    pub fn clear(&self) {
        self.mutate(Vec::clear);
    }

    /// Whether a line exists for `product_id`.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        sync::read(&self.inner.lines)
            .iter()
            .any(|l| l.product.id == product_id)
    }

    /// Quantity of the line for `product_id`, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        sync::read(&self.inner.lines)
            .iter()
            .find(|l| l.product.id == product_id)
            .map_or(0, |l| l.quantity)
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        sync::read(&self.inner.lines).iter().map(|l| l.quantity).sum()
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        sync::read(&self.inner.lines)
            .iter()
            .map(CartLine::subtotal)
            .sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        sync::read(&self.inner.lines).is_empty()
    }

    /// Snapshot of the current lines.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        sync::read(&self.inner.lines).clone()
    }

    /// Monotonic counter bumped on every mutation; views re-render when it
    /// changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::Relaxed)
    }

    fn mutate(&self, op: impl FnOnce(&mut Vec<CartLine>)) {
        let mut lines = sync::write(&self.inner.lines);
        op(&mut lines);
        self.inner.revision.fetch_add(1, Ordering::Relaxed);

        if let Err(e) = self.inner.mirror.save(keys::CART, &*lines) {
            tracing::warn!("Failed to mirror cart: {e}");
        }
    }
}
