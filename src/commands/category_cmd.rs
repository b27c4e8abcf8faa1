//! Commands for Category operations

use crate::domain::{Category, DomainError, DomainResult};
use crate::pipeline::{sort_categories, CategorySortOption};
use crate::repository::Repository;
use crate::settings::Preferences;
use crate::AppState;

/// Create a category; it starts out visible in the product list
pub async fn create_category(state: &AppState, name: &str) -> DomainResult<Category> {
    let category = state.categories.create_unique(name).await?;

    let key = category.key();
    state
        .preferences
        .update(|p| {
            p.visible_categories.insert(key);
            Ok(())
        })
        .await?;

    Ok(category)
}

/// Categories in the user's chosen order
pub async fn list_categories(state: &AppState) -> DomainResult<Vec<Category>> {
    let categories = state.categories.list().await?;
    Ok(sort_categories(&categories, state.preferences.get().category_sort))
}

/// Delete a category; its products become uncategorized
pub async fn delete_category(state: &AppState, id: u32) -> DomainResult<()> {
    let category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Category {}", id)))?;

    state.categories.delete(id).await?;

    let key = category.key();
    state
        .preferences
        .update(|p| {
            p.visible_categories.remove(&key);
            Ok(())
        })
        .await?;
    Ok(())
}

/// Rename a category, carrying its visibility over to the new name
pub async fn rename_category(state: &AppState, id: u32, name: &str) -> DomainResult<Category> {
    let existing = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Category {}", id)))?;

    let renamed = state
        .categories
        .update(&Category {
            name: name.to_string(),
            ..existing.clone()
        })
        .await?;

    let (old_key, new_key) = (existing.key(), renamed.key());
    state
        .preferences
        .update(|p| {
            if p.visible_categories.remove(&old_key) {
                p.visible_categories.insert(new_key);
            }
            Ok(())
        })
        .await?;

    Ok(renamed)
}

pub async fn set_category_sort(state: &AppState, option: CategorySortOption) -> DomainResult<Preferences> {
    state
        .preferences
        .update(|p| {
            p.category_sort = option;
            Ok(())
        })
        .await
}
