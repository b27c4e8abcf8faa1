//! Search and category visibility predicates

use std::collections::BTreeSet;

use crate::domain::{CategoryKey, Product};

/// True when `query` is empty or appears in the item or brand name,
/// ignoring case
pub fn matches_query(product: &Product, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    product.item_name.to_lowercase().contains(&needle)
        || product.brand_name.to_lowercase().contains(&needle)
}

/// True when the product's category is in the visibility set
///
/// An empty set hides every product.
pub fn is_visible(product: &Product, visible: &BTreeSet<CategoryKey>) -> bool {
    visible.contains(&product.category_key())
}

/// Distinct category keys present among `products`, sorted
pub fn available_category_filters(products: &[Product]) -> Vec<CategoryKey> {
    products
        .iter()
        .map(Product::category_key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
