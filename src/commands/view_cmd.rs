//! Commands backing the product list and detail screens

use crate::domain::{CategoryKey, DomainResult, Product};
use crate::pipeline::{available_category_filters, detail_rows, list_status, DetailRow, ListStatus};
use crate::repository::Repository;
use crate::AppState;

/// The product list as it should be rendered for `query`
pub async fn product_list(state: &AppState, query: &str) -> DomainResult<ListStatus> {
    let products = state.products.list().await?;
    let prefs = state.preferences.get();

    Ok(list_status(
        &products,
        query,
        &prefs.visible_categories,
        prefs.sort_option,
        prefs.group_mode(),
    ))
}

/// One entry of the category filter menu
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CategoryFilter {
    pub key: CategoryKey,
    pub visible: bool,
}

/// Categories present among products, each with its visibility
pub async fn category_filters(state: &AppState) -> DomainResult<Vec<CategoryFilter>> {
    let products = state.products.list().await?;
    let visible = state.preferences.get().visible_categories;

    Ok(available_category_filters(&products)
        .into_iter()
        .map(|key| CategoryFilter {
            visible: visible.contains(&key),
            key,
        })
        .collect())
}

pub async fn toggle_category_visibility(
    state: &AppState,
    key: CategoryKey,
    visible: bool,
) -> DomainResult<Vec<CategoryFilter>> {
    state
        .preferences
        .update(|p| {
            if visible {
                p.visible_categories.insert(key);
            } else {
                p.visible_categories.remove(&key);
            }
            Ok(())
        })
        .await?;

    category_filters(state).await
}

/// Product detail screen: the product plus its rendered rows
pub async fn product_details(state: &AppState, id: u32) -> DomainResult<(Product, Vec<DetailRow>)> {
    let product = super::get_product(state, id).await?;
    let rows = detail_rows(&product, state.preferences.get().hide_blank_fields);
    Ok((product, rows))
}
