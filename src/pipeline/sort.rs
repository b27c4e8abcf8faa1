//! Product sort options and comparators

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOption {
    #[default]
    RecentlyAdded,
    Oldest,
    Item,
    Brand,
    Category,
}

impl SortOption {
    pub const ALL: [SortOption; 5] = [
        SortOption::RecentlyAdded,
        SortOption::Oldest,
        SortOption::Item,
        SortOption::Brand,
        SortOption::Category,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortOption::RecentlyAdded => "Recently Added",
            SortOption::Oldest => "Oldest",
            SortOption::Item => "Item",
            SortOption::Brand => "Brand",
            SortOption::Category => "Category",
        }
    }

    /// Options offered by the sort picker
    ///
    /// Sorting by category is pointless while products are already grouped
    /// by category, so it is left out then.
    pub fn available(grouping_by_category: bool) -> Vec<SortOption> {
        Self::ALL
            .into_iter()
            .filter(|o| !(grouping_by_category && *o == SortOption::Category))
            .collect()
    }

    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOption::RecentlyAdded => b.id.cmp(&a.id),
            SortOption::Oldest => a.id.cmp(&b.id),
            SortOption::Item => cmp_ignore_case(&a.item_name, &b.item_name),
            SortOption::Brand => cmp_ignore_case(&a.brand_name, &b.brand_name),
            SortOption::Category => cmp_ignore_case(a.category_label(), b.category_label()),
        }
    }
}

/// Stable in-place sort; equal keys keep their input order
pub fn sort_products(products: &mut [Product], option: SortOption) {
    products.sort_by(|a, b| option.compare(a, b));
}

/// Case-insensitive string comparison without allocating
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
