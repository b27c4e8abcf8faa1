//! Category list ordering

use serde::{Deserialize, Serialize};

use crate::domain::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CategorySortOption {
    #[default]
    RecentlyAdded,
    Oldest,
    AlphabeticalAZ,
    AlphabeticalZA,
}

impl CategorySortOption {
    pub fn label(&self) -> &'static str {
        match self {
            CategorySortOption::RecentlyAdded => "Recently Added",
            CategorySortOption::Oldest => "Oldest",
            CategorySortOption::AlphabeticalAZ => "Alphabetical (A-Z)",
            CategorySortOption::AlphabeticalZA => "Alphabetical (Z-A)",
        }
    }
}

/// Order categories for the management screen
///
/// RecentlyAdded/Oldest order by name (descending/ascending, case-sensitive),
/// not by creation time. Existing installs depend on that ordering.
pub fn sort_categories(categories: &[Category], option: CategorySortOption) -> Vec<Category> {
    let mut sorted = categories.to_vec();
    match option {
        CategorySortOption::RecentlyAdded => sorted.sort_by(|a, b| b.name.cmp(&a.name)),
        CategorySortOption::Oldest => sorted.sort_by(|a, b| a.name.cmp(&b.name)),
        CategorySortOption::AlphabeticalAZ => {
            sorted.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
        CategorySortOption::AlphabeticalZA => {
            sorted.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()))
        }
    }
    sorted
}
