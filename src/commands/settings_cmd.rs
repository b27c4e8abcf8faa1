//! Commands for preferences and appearance

use crate::domain::{DomainError, DomainResult};
use crate::pipeline::{ProductField, SortOption};
use crate::settings::{Appearance, Preferences};
use crate::AppState;

pub async fn get_preferences(state: &AppState) -> DomainResult<Preferences> {
    Ok(state.preferences.get())
}

pub async fn set_sort_option(state: &AppState, option: SortOption) -> DomainResult<Preferences> {
    state
        .preferences
        .update(|p| {
            p.sort_option = option;
            Ok(())
        })
        .await
}

/// Toggle grouping by category
///
/// Turning it on while products are grouped by a field is refused; the user
/// has to switch that off first.
pub async fn set_group_by_category(state: &AppState, enabled: bool) -> DomainResult<Preferences> {
    state
        .preferences
        .update(|p| {
            if enabled && p.group_by_field {
                return Err(DomainError::InvalidInput(
                    "Turn off grouping by product field first".to_string(),
                ));
            }
            p.group_by_category = enabled;
            // Category sort is not offered while grouped by category
            if enabled && p.sort_option == SortOption::Category {
                p.sort_option = SortOption::default();
            }
            Ok(())
        })
        .await
}

pub async fn set_group_by_field(state: &AppState, enabled: bool) -> DomainResult<Preferences> {
    state
        .preferences
        .update(|p| {
            if enabled && p.group_by_category {
                return Err(DomainError::InvalidInput(
                    "Turn off grouping by category first".to_string(),
                ));
            }
            p.group_by_field = enabled;
            Ok(())
        })
        .await
}

pub async fn set_group_field(state: &AppState, field: ProductField) -> DomainResult<Preferences> {
    state
        .preferences
        .update(|p| {
            p.group_field = field;
            Ok(())
        })
        .await
}

pub async fn set_hide_blank_fields(state: &AppState, hide: bool) -> DomainResult<Preferences> {
    state
        .preferences
        .update(|p| {
            p.hide_blank_fields = hide;
            Ok(())
        })
        .await
}

pub async fn set_color_scheme(state: &AppState, index: i32) -> DomainResult<Preferences> {
    state
        .preferences
        .update(|p| {
            p.color_scheme = index;
            Ok(())
        })
        .await
}

pub async fn set_tint_color(state: &AppState, index: i32) -> DomainResult<Preferences> {
    state
        .preferences
        .update(|p| {
            p.tint_color = index;
            Ok(())
        })
        .await
}

pub async fn set_font_size(state: &AppState, index: i32) -> DomainResult<Preferences> {
    state
        .preferences
        .update(|p| {
            p.font_size = index;
            Ok(())
        })
        .await
}

/// Appearance resolved from the stored indices
pub async fn appearance(state: &AppState) -> DomainResult<Appearance> {
    let prefs = state.preferences.get();
    Ok(Appearance::from_indices(prefs.color_scheme, prefs.tint_color, prefs.font_size))
}
