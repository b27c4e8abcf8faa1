//! Commands for bulk data management
//!
//! The reset flows of the data settings screen and sample seeding.

use serde::{Deserialize, Serialize};

use crate::domain::{samples, DomainResult};
use crate::repository::Repository;
use crate::settings::Preferences;
use crate::AppState;

/// How much a bulk operation touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSummary {
    pub products: usize,
    pub categories: usize,
    pub images: usize,
}

/// Delete every product and its photo; categories and settings stay
pub async fn reset_product_data(state: &AppState) -> DomainResult<DataSummary> {
    let _images = state.images.lock().await;
    let products = state.products.delete_all().await?;
    let images = state.images.remove_unreferenced(&Default::default()).await?;

    log::info!("Reset product data: {} products, {} images", products, images);
    Ok(DataSummary {
        products,
        categories: 0,
        images,
    })
}

/// Restore default settings; products and categories stay
pub async fn reset_settings(state: &AppState) -> DomainResult<Preferences> {
    let categories = state.categories.list().await?;
    state.preferences.reset(&categories).await
}

/// Start fresh: no products, no categories, default settings
pub async fn reset_all_data(state: &AppState) -> DomainResult<DataSummary> {
    let mut summary = reset_product_data(state).await?;
    summary.categories = state.categories.delete_all().await?;
    state.preferences.reset(&[]).await?;

    log::info!("Reset all data");
    Ok(summary)
}

/// Add the sample categories and products
///
/// Sample categories that already exist (ignoring case) are reused.
pub async fn load_sample_data(state: &AppState) -> DomainResult<DataSummary> {
    let mut summary = DataSummary::default();

    for name in samples::sample_categories() {
        if state.categories.find_by_name(name).await?.is_none() {
            super::create_category(state, name).await?;
            summary.categories += 1;
        }
    }

    for (mut draft, category) in samples::sample_products() {
        if let Some(name) = category {
            draft.category_id = state.categories.find_by_name(name).await?.map(|c| c.id);
        }
        super::create_product(state, draft).await?;
        summary.products += 1;
    }

    let total = state.products.list().await?.len();
    log::info!("Loaded sample data, {} products stored", total);
    Ok(summary)
}
