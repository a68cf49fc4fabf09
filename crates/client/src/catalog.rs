//! Derived view assembly for product listings.
//!
//! Pure, synchronous shaping of server-fetched lists: category filter, name
//! search, sort, pagination, and the per-product flags (in-cart quantity,
//! favorite) the shop grid renders. Nothing here mutates a container or
//! touches the network.

use serde::{Deserialize, Serialize};

use caju_core::CategoryId;

use crate::api::types::Product;
use crate::containers::{CartContainer, FavoritesContainer};

/// Sort orders offered by the shop page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    /// Backend order, untouched.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

/// Sort a product list.
#[must_use]
pub fn sort_products(mut products: Vec<Product>, sort: ProductSort) -> Vec<Product> {
    match sort {
        ProductSort::Featured => {}
        ProductSort::PriceAsc => products.sort_by_key(|p| p.price),
        ProductSort::PriceDesc => {
            products.sort_by_key(|p| p.price);
            products.reverse();
        }
        ProductSort::NameAsc => products.sort_by_key(|p| p.name.to_lowercase()),
        ProductSort::NameDesc => {
            products.sort_by_key(|p| p.name.to_lowercase());
            products.reverse();
        }
    }
    products
}

/// Keep only products belonging to `category_id` (`None` keeps everything).
#[must_use]
pub fn filter_by_category(products: Vec<Product>, category_id: Option<CategoryId>) -> Vec<Product> {
    match category_id {
        None => products,
        Some(id) => products.into_iter().filter(|p| p.in_category(id)).collect(),
    }
}

/// Keep only products whose name contains `query`, case-insensitively.
/// A blank query keeps everything.
#[must_use]
pub fn search_by_name(products: Vec<Product>, query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products;
    }
    products
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page index, clamped into range.
    pub page: usize,
    pub page_count: usize,
    /// Total items across all pages.
    pub total: usize,
}

/// Slice a list into the requested 1-based page.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total = items.len();
    let page_count = total.div_ceil(per_page).max(1);
    let page = page.clamp(1, page_count);

    let items = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        page_count,
        total,
    }
}

/// Shorten display text to `max` characters with an ellipsis.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}

/// Active filters of the shop page.
#[derive(Debug, Clone, Default)]
pub struct ShopFilters {
    pub category: Option<CategoryId>,
    pub query: String,
    pub sort: ProductSort,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
}

/// One product card on the shop grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub product: Product,
    /// Quantity already in the cart (0 if absent).
    pub in_cart: u32,
    pub favorite: bool,
}

/// Compose the fetched product list with filters and container state into
/// the page the shop grid renders.
#[must_use]
pub fn shop_page(
    products: Vec<Product>,
    filters: &ShopFilters,
    cart: &CartContainer,
    favorites: &FavoritesContainer,
) -> Page<ProductCard> {
    let filtered = filter_by_category(products, filters.category);
    let found = search_by_name(filtered, &filters.query);
    let sorted = sort_products(found, filters.sort);

    let page = paginate(sorted, filters.page.max(1), filters.per_page.max(1));
    Page {
        items: page
            .items
            .into_iter()
            .map(|product| ProductCard {
                in_cart: cart.quantity_of(product.id),
                favorite: favorites.is_favorite(product.id),
                product,
            })
            .collect(),
        page: page.page,
        page_count: page.page_count,
        total: page.total,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mirror::MirrorStore;
    use caju_core::{ProductId, UserId};

    fn product(id: i64, name: &str, cents: i64, category: i64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "price": format!("{}.{:02}", cents / 100, cents % 100),
            "categories": [{"id": category, "name": format!("cat-{category}")}],
        }))
        .unwrap()
    }

    fn sample() -> Vec<Product> {
        vec![
            product(1, "Caju em calda", 1800, 1),
            product(2, "Amêndoa torrada", 3200, 2),
            product(3, "castanha de caju", 2500, 2),
        ]
    }

    #[test]
    fn test_sort_by_price() {
        let sorted = sort_products(sample(), ProductSort::PriceAsc);
        let ids: Vec<i64> = sorted.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        let sorted = sort_products(sample(), ProductSort::PriceDesc);
        let ids: Vec<i64> = sorted.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let sorted = sort_products(sample(), ProductSort::NameAsc);
        let ids: Vec<i64> = sorted.iter().map(|p| p.id.as_i64()).collect();
        // "Amêndoa" < "Caju" < "castanha" when compared case-insensitively
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_featured_keeps_backend_order() {
        let sorted = sort_products(sample(), ProductSort::Featured);
        let ids: Vec<i64> = sorted.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_filter_by_category() {
        let filtered = filter_by_category(sample(), Some(CategoryId::new(2)));
        assert_eq!(filtered.len(), 2);

        let all = filter_by_category(sample(), None);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let found = search_by_name(sample(), "CAJU");
        assert_eq!(found.len(), 2);

        let all = search_by_name(sample(), "   ");
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_paginate_clamps_page() {
        let numbers: Vec<u32> = (1..=7).collect();

        let page = paginate(numbers.clone(), 2, 3);
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.total, 7);

        // Out-of-range pages clamp to the last page
        let page = paginate(numbers.clone(), 99, 3);
        assert_eq!(page.items, vec![7]);
        assert_eq!(page.page, 3);

        // Page 0 clamps to the first
        let page = paginate(numbers, 0, 3);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_paginate_empty_list() {
        let page = paginate(Vec::<u32>::new(), 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.page_count, 1);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Amêndoa torrada", 7), "Amêndoa...");
    }

    #[test]
    fn test_shop_page_composes_container_state() {
        let mirror = MirrorStore::in_memory();
        let cart = CartContainer::load(mirror.clone());
        let favorites = FavoritesContainer::load(mirror, Some(UserId::new(1)));

        let products = sample();
        cart.add(products[2].to_ref(), 2);
        favorites.add(products[0].to_ref());

        let filters = ShopFilters {
            per_page: 10,
            page: 1,
            ..ShopFilters::default()
        };
        let page = shop_page(products, &filters, &cart, &favorites);

        assert_eq!(page.total, 3);
        let card_for = |id: i64| {
            page.items
                .iter()
                .find(|c| c.product.id == ProductId::new(id))
                .unwrap()
        };
        assert_eq!(card_for(3).in_cart, 2);
        assert!(card_for(1).favorite);
        assert!(!card_for(2).favorite);
        assert_eq!(card_for(2).in_cart, 0);
    }
}
