//! Pipeline Layer
//!
//! Pure functions turning stored products/categories plus preferences into
//! what the presentation layer renders.

mod category_sort;
mod derive;
mod detail;
mod filter;
mod group;
mod sort;

pub use category_sort::{sort_categories, CategorySortOption};
pub use derive::{derive, list_status, ListStatus, RenderModel};
pub use detail::{detail_rows, DetailField, DetailRow};
pub use filter::{available_category_filters, is_visible, matches_query};
pub use group::{GroupKey, GroupMode, ProductField, ProductGroup};
pub use sort::{cmp_ignore_case, sort_products, SortOption};
