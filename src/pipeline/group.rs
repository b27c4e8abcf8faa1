//! Grouping modes and group keys

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{CategoryKey, Product};

/// Product field used for initial-letter grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProductField {
    #[default]
    Item,
    Brand,
}

impl ProductField {
    pub fn value<'a>(&self, product: &'a Product) -> &'a str {
        match self {
            ProductField::Item => &product.item_name,
            ProductField::Brand => &product.brand_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GroupMode {
    #[default]
    None,
    ByCategory,
    ByField(ProductField),
}

impl GroupMode {
    /// Resolve the toggles; category grouping wins over field grouping
    pub fn resolve(by_category: bool, by_field: bool, field: ProductField) -> Self {
        if by_category {
            GroupMode::ByCategory
        } else if by_field {
            GroupMode::ByField(field)
        } else {
            GroupMode::None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupKey {
    Category(CategoryKey),
    /// First character of the grouped field, case preserved
    Initial(String),
}

impl GroupKey {
    pub fn label(&self) -> &str {
        match self {
            GroupKey::Category(key) => key.label(),
            GroupKey::Initial(initial) => initial,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGroup {
    pub key: GroupKey,
    pub products: Vec<Product>,
}

/// Bucket already-sorted products; groups come out ordered by key and each
/// group keeps the input order
pub fn group_products(products: Vec<Product>, key_of: impl Fn(&Product) -> GroupKey) -> Vec<ProductGroup> {
    let mut buckets: BTreeMap<GroupKey, Vec<Product>> = BTreeMap::new();
    for product in products {
        buckets.entry(key_of(&product)).or_default().push(product);
    }
    buckets
        .into_iter()
        .map(|(key, products)| ProductGroup { key, products })
        .collect()
}

pub fn category_key(product: &Product) -> GroupKey {
    GroupKey::Category(product.category_key())
}

pub fn initial_key(product: &Product, field: ProductField) -> GroupKey {
    let initial = field
        .value(product)
        .chars()
        .next()
        .map(String::from)
        .unwrap_or_default();
    GroupKey::Initial(initial)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32, item: &str, brand: &str) -> Product {
        Product::new(id, item.to_string(), brand.to_string())
    }

    #[test]
    fn test_resolve_priority() {
        assert_eq!(GroupMode::resolve(true, true, ProductField::Brand), GroupMode::ByCategory);
        assert_eq!(
            GroupMode::resolve(false, true, ProductField::Brand),
            GroupMode::ByField(ProductField::Brand)
        );
        assert_eq!(GroupMode::resolve(false, false, ProductField::Item), GroupMode::None);
    }

    #[test]
    fn test_initial_grouping() {
        let products = vec![product(1, "Milk", "DF"), product(2, "Bread", "W"), product(3, "Mango", "Home")];
        let groups = group_products(products, |p| initial_key(p, ProductField::Item));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, GroupKey::Initial("B".to_string()));
        assert_eq!(groups[1].key, GroupKey::Initial("M".to_string()));
        let m_ids: Vec<u32> = groups[1].products.iter().map(|p| p.id).collect();
        assert_eq!(m_ids, vec![1, 3]);
    }

    #[test]
    fn test_category_grouping_uses_uncategorized_bucket() {
        let products = vec![product(1, "Juice", "Home"), product(2, "Milk", "DF").with_category(1, "Dairy")];
        let groups = group_products(products, category_key);

        assert_eq!(groups[0].key, GroupKey::Category(CategoryKey::Named("Dairy".to_string())));
        assert_eq!(groups[1].key, GroupKey::Category(CategoryKey::Uncategorized));
        assert_eq!(groups[1].key.label(), "None");
    }
}
