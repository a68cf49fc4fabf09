//! Favorites container.
//!
//! A duplicate-free set of product references scoped to the authenticated
//! user: the mirror key embeds the user id, so each account keeps its own
//! set. When the active user changes the container reloads under the new
//! key; nothing carries over between accounts. While logged out the set is
//! empty and mutations stay in memory only.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use caju_core::{ProductId, UserId};

use crate::mirror::{MirrorStore, keys};
use crate::models::ProductRef;
use crate::sync;

/// The favorites state container.
///
/// Cheaply cloneable handle; all clones share the same state.
#[derive(Clone)]
pub struct FavoritesContainer {
    inner: Arc<FavoritesInner>,
}

struct FavoritesInner {
    items: RwLock<Vec<ProductRef>>,
    user: RwLock<Option<UserId>>,
    revision: AtomicU64,
    mirror: MirrorStore,
}

impl FavoritesContainer {
    /// Load the favorites of `user` from the mirror (empty when logged out
    /// or when the entry is absent/corrupt).
    #[must_use]
    pub fn load(mirror: MirrorStore, user: Option<UserId>) -> Self {
        let items = user.map_or_else(Vec::new, |id| {
            mirror
                .load(&keys::favorites(id))
                .into_option()
                .unwrap_or_default()
        });

        Self {
            inner: Arc::new(FavoritesInner {
                items: RwLock::new(items),
                user: RwLock::new(user),
                revision: AtomicU64::new(0),
                mirror,
            }),
        }
    }

    /// Switch the active user, reloading from the mirror under the new key.
    ///
    /// Called on login and logout. The previous user's set is dropped from
    /// memory, not merged or persisted under the new key.
    pub fn set_user(&self, user: Option<UserId>) {
        {
            let mut current = sync::write(&self.inner.user);
            if *current == user {
                return;
            }
            *current = user;
        }

        let items = user.map_or_else(Vec::new, |id| {
            self.inner
                .mirror
                .load(&keys::favorites(id))
                .into_option()
                .unwrap_or_default()
        });
        *sync::write(&self.inner.items) = items;
        self.inner.revision.fetch_add(1, Ordering::Relaxed);
    }

    /// Whether `product_id` is in the set.
    #[must_use]
    pub fn is_favorite(&self, product_id: ProductId) -> bool {
        sync::read(&self.inner.items)
            .iter()
            .any(|p| p.id == product_id)
    }

    /// Add a product to the set. Returns `false` if it was already present.
    pub fn add(&self, product: ProductRef) -> bool {
        self.mutate(|items| {
            if items.iter().any(|p| p.id == product.id) {
                false
            } else {
                items.push(product);
                true
            }
        })
    }

    /// Remove a product from the set; absent ids are a no-op.
    pub fn remove(&self, product_id: ProductId) {
        self.mutate(|items| items.retain(|p| p.id != product_id));
    }

    /// Add the product if absent, remove it if present.
    ///
    /// Returns `true` when the product is now a favorite.
    pub fn toggle(&self, product: ProductRef) -> bool {
        self.mutate(|items| {
            if items.iter().any(|p| p.id == product.id) {
                items.retain(|p| p.id != product.id);
                false
            } else {
                items.push(product);
                true
            }
        })
    }

    /// Empty the set.
    pub fn clear(&self) {
        self.mutate(Vec::clear);
    }

    /// Number of favorites.
    #[must_use]
    pub fn count(&self) -> usize {
        sync::read(&self.inner.items).len()
    }

    /// Snapshot of the current set.
    #[must_use]
    pub fn list(&self) -> Vec<ProductRef> {
        sync::read(&self.inner.items).clone()
    }

    /// Monotonic counter bumped on every mutation; views re-render when it
    /// changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::Relaxed)
    }

    fn mutate<R>(&self, op: impl FnOnce(&mut Vec<ProductRef>) -> R) -> R {
        let mut items = sync::write(&self.inner.items);
        let out = op(&mut items);
        self.inner.revision.fetch_add(1, Ordering::Relaxed);

        if let Some(user) = *sync::read(&self.inner.user)
            && let Err(e) = self.inner.mirror.save(&keys::favorites(user), &*items)
        {
            tracing::warn!("Failed to mirror favorites: {e}");
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use caju_core::Price;

    fn product(id: i64) -> ProductRef {
        ProductRef {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            price: Price::from_cents(1000),
            image_url: None,
        }
    }

    #[test]
    fn test_no_duplicates() {
        let favorites = FavoritesContainer::load(MirrorStore::in_memory(), Some(UserId::new(1)));
        assert!(favorites.add(product(1)));
        assert!(!favorites.add(product(1)));
        assert_eq!(favorites.count(), 1);
    }

    #[test]
    fn test_toggle() {
        let favorites = FavoritesContainer::load(MirrorStore::in_memory(), Some(UserId::new(1)));
        assert!(favorites.toggle(product(1)));
        assert!(favorites.is_favorite(ProductId::new(1)));
        assert!(!favorites.toggle(product(1)));
        assert!(!favorites.is_favorite(ProductId::new(1)));
    }

    #[test]
    fn test_persisted_per_user() {
        let mirror = MirrorStore::in_memory();

        let favorites = FavoritesContainer::load(mirror.clone(), Some(UserId::new(1)));
        favorites.add(product(1));

        // A fresh container for the same user sees the set
        let reloaded = FavoritesContainer::load(mirror.clone(), Some(UserId::new(1)));
        assert!(reloaded.is_favorite(ProductId::new(1)));

        // A different user does not
        let other = FavoritesContainer::load(mirror, Some(UserId::new(2)));
        assert_eq!(other.count(), 0);
    }

    #[test]
    fn test_switching_user_never_leaks_previous_set() {
        let mirror = MirrorStore::in_memory();
        let favorites = FavoritesContainer::load(mirror.clone(), Some(UserId::new(1)));
        favorites.add(product(1));
        favorites.add(product(2));

        favorites.set_user(Some(UserId::new(2)));
        assert_eq!(favorites.count(), 0);

        // User 2's mirror key stays untouched by the switch itself
        favorites.add(product(3));
        let user2 = FavoritesContainer::load(mirror.clone(), Some(UserId::new(2)));
        assert_eq!(user2.list(), vec![product(3)]);

        // Switching back restores user 1's persisted set
        favorites.set_user(Some(UserId::new(1)));
        assert!(favorites.is_favorite(ProductId::new(1)));
        assert!(favorites.is_favorite(ProductId::new(2)));
        assert!(!favorites.is_favorite(ProductId::new(3)));
    }

    #[test]
    fn test_logout_empties_set() {
        let favorites = FavoritesContainer::load(MirrorStore::in_memory(), Some(UserId::new(1)));
        favorites.add(product(1));

        favorites.set_user(None);
        assert_eq!(favorites.count(), 0);
    }

    #[test]
    fn test_logged_out_mutations_are_not_persisted() {
        let mirror = MirrorStore::in_memory();
        let favorites = FavoritesContainer::load(mirror.clone(), None);
        favorites.add(product(1));
        assert_eq!(favorites.count(), 1);

        // Nothing was written under any user's key
        let user1 = FavoritesContainer::load(mirror, Some(UserId::new(1)));
        assert_eq!(user1.count(), 0);
    }

    #[test]
    fn test_set_user_same_user_is_noop() {
        let favorites = FavoritesContainer::load(MirrorStore::in_memory(), Some(UserId::new(1)));
        favorites.add(product(1));

        favorites.set_user(Some(UserId::new(1)));
        assert!(favorites.is_favorite(ProductId::new(1)));
    }
}
