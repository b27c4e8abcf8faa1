//! Product list derivation
//!
//! Filter by query, filter by category visibility, sort, then group.
//! Everything here is pure; callers re-run it whenever the store or the
//! preferences change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{CategoryKey, Product};
use super::filter::{is_visible, matches_query};
use super::group::{category_key, group_products, initial_key, GroupMode, ProductGroup};
use super::sort::{sort_products, SortOption};

/// Rendering-ready product list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderModel {
    Flat(Vec<Product>),
    Grouped(Vec<ProductGroup>),
}

impl RenderModel {
    /// All products in render order
    pub fn products(&self) -> Box<dyn Iterator<Item = &Product> + '_> {
        match self {
            RenderModel::Flat(products) => Box::new(products.iter()),
            RenderModel::Grouped(groups) => Box::new(groups.iter().flat_map(|g| g.products.iter())),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RenderModel::Flat(products) => products.len(),
            RenderModel::Grouped(groups) => groups.iter().map(|g| g.products.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn groups(&self) -> Option<&[ProductGroup]> {
        match self {
            RenderModel::Grouped(groups) => Some(groups),
            RenderModel::Flat(_) => None,
        }
    }
}

pub fn derive(
    products: &[Product],
    query: &str,
    visible: &BTreeSet<CategoryKey>,
    sort: SortOption,
    group_mode: GroupMode,
) -> RenderModel {
    let mut data: Vec<Product> = products
        .iter()
        .filter(|p| matches_query(p, query))
        .filter(|p| is_visible(p, visible))
        .cloned()
        .collect();

    sort_products(&mut data, sort);

    match group_mode {
        GroupMode::ByCategory => RenderModel::Grouped(group_products(data, category_key)),
        // Field grouping is suppressed while searching
        GroupMode::ByField(field) if query.is_empty() => {
            RenderModel::Grouped(group_products(data, |p| initial_key(p, field)))
        }
        _ => RenderModel::Flat(data),
    }
}

/// What the product list screen should show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ListStatus {
    /// Nothing stored yet
    NoProducts,
    /// The visibility set is empty
    AllCategoriesHidden,
    /// A search is active and nothing matched
    NoSearchResults,
    Ready(RenderModel),
}

pub fn list_status(
    products: &[Product],
    query: &str,
    visible: &BTreeSet<CategoryKey>,
    sort: SortOption,
    group_mode: GroupMode,
) -> ListStatus {
    if products.is_empty() {
        return ListStatus::NoProducts;
    }
    if visible.is_empty() {
        return ListStatus::AllCategoriesHidden;
    }

    let model = derive(products, query, visible, sort, group_mode);
    if !query.is_empty() && model.is_empty() {
        return ListStatus::NoSearchResults;
    }
    ListStatus::Ready(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::group::{GroupKey, ProductField};

    fn product(id: u32, item: &str, brand: &str, category: Option<(u32, &str)>) -> Product {
        let p = Product::new(id, item.to_string(), brand.to_string());
        match category {
            Some((cid, name)) => p.with_category(cid, name),
            None => p,
        }
    }

    fn pantry() -> Vec<Product> {
        vec![
            product(1, "Milk", "DairyFarmers", Some((1, "Dairy"))),
            product(2, "Bread", "Wonder", Some((2, "Bakery"))),
            product(3, "Juice", "Home", None),
        ]
    }

    fn keys(names: &[&str]) -> BTreeSet<CategoryKey> {
        names
            .iter()
            .map(|n| match *n {
                "None" => CategoryKey::Uncategorized,
                other => CategoryKey::Named(other.to_string()),
            })
            .collect()
    }

    fn ids(model: &RenderModel) -> Vec<u32> {
        model.products().map(|p| p.id).collect()
    }

    #[test]
    fn test_no_filter_keeps_everything_sorted() {
        let model = derive(&pantry(), "", &keys(&["Dairy", "Bakery", "None"]), SortOption::Item, GroupMode::None);
        assert_eq!(ids(&model), vec![2, 3, 1]);
        assert!(model.groups().is_none());
    }

    #[test]
    fn test_empty_visibility_hides_all() {
        for sort in SortOption::ALL {
            let model = derive(&pantry(), "", &BTreeSet::new(), sort, GroupMode::None);
            assert!(model.is_empty());
            let model = derive(&pantry(), "milk", &BTreeSet::new(), sort, GroupMode::ByCategory);
            assert!(model.is_empty());
        }
    }

    #[test]
    fn test_query_filter() {
        let visible = keys(&["Dairy", "Bakery", "None"]);
        let single = vec![product(1, "Milk", "DF", None)];
        assert_eq!(derive(&single, "MILK", &visible, SortOption::Item, GroupMode::None).len(), 1);
        assert!(derive(&single, "Bread", &visible, SortOption::Item, GroupMode::None).is_empty());
    }

    #[test]
    fn test_category_grouping_end_to_end() {
        let model = derive(&pantry(), "", &keys(&["Dairy", "None"]), SortOption::Item, GroupMode::ByCategory);
        let groups = model.groups().unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, GroupKey::Category(CategoryKey::Named("Dairy".to_string())));
        assert_eq!(groups[0].products[0].item_name, "Milk");
        assert_eq!(groups[1].key, GroupKey::Category(CategoryKey::Uncategorized));
        assert_eq!(groups[1].products[0].item_name, "Juice");
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn test_field_grouping_suppressed_while_searching() {
        let products = vec![
            product(1, "Milk", "A", None),
            product(2, "Mango", "B", None),
            product(3, "Bread", "C", None),
        ];
        let visible = keys(&["None"]);

        let grouped = derive(&products, "", &visible, SortOption::Oldest, GroupMode::ByField(ProductField::Item));
        let groups = grouped.groups().unwrap();
        assert_eq!(groups[1].key, GroupKey::Initial("M".to_string()));
        assert_eq!(groups[1].products.len(), 2);

        let searching = derive(&products, "m", &visible, SortOption::Oldest, GroupMode::ByField(ProductField::Item));
        assert!(searching.groups().is_none());
        assert_eq!(ids(&searching), vec![1, 2]);
    }

    #[test]
    fn test_groups_sorted_within() {
        let products = vec![
            product(1, "Yoghurt", "A", Some((1, "Dairy"))),
            product(2, "Butter", "B", Some((1, "Dairy"))),
        ];
        let model = derive(&products, "", &keys(&["Dairy"]), SortOption::RecentlyAdded, GroupMode::ByCategory);
        assert_eq!(ids(&model), vec![2, 1]);
    }

    #[test]
    fn test_list_status() {
        let visible = keys(&["Dairy", "Bakery", "None"]);
        assert_eq!(
            list_status(&[], "", &visible, SortOption::Item, GroupMode::None),
            ListStatus::NoProducts
        );
        assert_eq!(
            list_status(&pantry(), "", &BTreeSet::new(), SortOption::Item, GroupMode::None),
            ListStatus::AllCategoriesHidden
        );
        assert_eq!(
            list_status(&pantry(), "zzz", &visible, SortOption::Item, GroupMode::None),
            ListStatus::NoSearchResults
        );
        assert!(matches!(
            list_status(&pantry(), "", &visible, SortOption::Item, GroupMode::None),
            ListStatus::Ready(_)
        ));
    }
}
