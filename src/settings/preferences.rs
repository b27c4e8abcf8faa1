//! User preferences
//!
//! One struct holding every persisted preference. Each field is stored under
//! its own key in the preferences table as JSON text.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{Category, CategoryKey, DomainError, DomainResult};
use crate::pipeline::{CategorySortOption, GroupMode, ProductField, SortOption};

pub const KEY_SORT_OPTION: &str = "selectedSortOption";
pub const KEY_CATEGORY_SORT: &str = "selectedSortCategory";
pub const KEY_VISIBLE_CATEGORIES: &str = "selectedCategories";
pub const KEY_GROUP_BY_CATEGORY: &str = "isGroupingCategories";
pub const KEY_GROUP_BY_FIELD: &str = "isGroupingProducts";
pub const KEY_GROUP_FIELD: &str = "groupProductBy";
pub const KEY_HIDE_BLANK_FIELDS: &str = "isHidingBlankData";
pub const KEY_COLOR_SCHEME: &str = "colorSchemeOption";
pub const KEY_TINT_COLOR: &str = "tintColor";
pub const KEY_FONT_SIZE: &str = "fontSize";

pub const ALL_KEYS: [&str; 10] = [
    KEY_SORT_OPTION,
    KEY_CATEGORY_SORT,
    KEY_VISIBLE_CATEGORIES,
    KEY_GROUP_BY_CATEGORY,
    KEY_GROUP_BY_FIELD,
    KEY_GROUP_FIELD,
    KEY_HIDE_BLANK_FIELDS,
    KEY_COLOR_SCHEME,
    KEY_TINT_COLOR,
    KEY_FONT_SIZE,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub sort_option: SortOption,
    pub category_sort: CategorySortOption,
    /// Categories whose products are shown; empty hides every product
    pub visible_categories: BTreeSet<CategoryKey>,
    pub group_by_category: bool,
    pub group_by_field: bool,
    pub group_field: ProductField,
    pub hide_blank_fields: bool,
    pub color_scheme: i32,
    pub tint_color: i32,
    pub font_size: i32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sort_option: SortOption::RecentlyAdded,
            category_sort: CategorySortOption::RecentlyAdded,
            visible_categories: seeded_visibility(&[]),
            group_by_category: false,
            group_by_field: false,
            group_field: ProductField::Item,
            hide_blank_fields: true,
            color_scheme: 0,
            tint_color: 0,
            font_size: 3,
        }
    }
}

impl Preferences {
    /// Defaults with every known category visible
    pub fn defaults_for(known: &[Category]) -> Self {
        Self {
            visible_categories: seeded_visibility(known),
            ..Default::default()
        }
    }

    pub fn group_mode(&self) -> GroupMode {
        GroupMode::resolve(self.group_by_category, self.group_by_field, self.group_field)
    }

    /// Every preference as `(key, json)` pairs
    pub fn entries(&self) -> DomainResult<Vec<(&'static str, String)>> {
        Ok(vec![
            (KEY_SORT_OPTION, encode(&self.sort_option)?),
            (KEY_CATEGORY_SORT, encode(&self.category_sort)?),
            (KEY_VISIBLE_CATEGORIES, encode(&self.visible_categories)?),
            (KEY_GROUP_BY_CATEGORY, encode(&self.group_by_category)?),
            (KEY_GROUP_BY_FIELD, encode(&self.group_by_field)?),
            (KEY_GROUP_FIELD, encode(&self.group_field)?),
            (KEY_HIDE_BLANK_FIELDS, encode(&self.hide_blank_fields)?),
            (KEY_COLOR_SCHEME, encode(&self.color_scheme)?),
            (KEY_TINT_COLOR, encode(&self.tint_color)?),
            (KEY_FONT_SIZE, encode(&self.font_size)?),
        ])
    }

    /// Overwrite the field stored under `key` with the decoded `raw` value
    ///
    /// Unknown keys are ignored. Returns an error when `raw` does not parse
    /// as the field's type, leaving the field untouched.
    pub fn apply(&mut self, key: &str, raw: &str) -> DomainResult<()> {
        match key {
            KEY_SORT_OPTION => self.sort_option = decode(key, raw)?,
            KEY_CATEGORY_SORT => self.category_sort = decode(key, raw)?,
            KEY_VISIBLE_CATEGORIES => self.visible_categories = decode(key, raw)?,
            KEY_GROUP_BY_CATEGORY => self.group_by_category = decode(key, raw)?,
            KEY_GROUP_BY_FIELD => self.group_by_field = decode(key, raw)?,
            KEY_GROUP_FIELD => self.group_field = decode(key, raw)?,
            KEY_HIDE_BLANK_FIELDS => self.hide_blank_fields = decode(key, raw)?,
            KEY_COLOR_SCHEME => self.color_scheme = decode(key, raw)?,
            KEY_TINT_COLOR => self.tint_color = decode(key, raw)?,
            KEY_FONT_SIZE => self.font_size = decode(key, raw)?,
            _ => log::debug!("Ignoring unknown preference {}", key),
        }
        Ok(())
    }
}

/// All known categories plus the uncategorized bucket
pub fn seeded_visibility(known: &[Category]) -> BTreeSet<CategoryKey> {
    known
        .iter()
        .map(Category::key)
        .chain(std::iter::once(CategoryKey::Uncategorized))
        .collect()
}

fn encode<T: Serialize>(value: &T) -> DomainResult<String> {
    serde_json::to_string(value).map_err(|e| DomainError::Internal(e.to_string()))
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> DomainResult<T> {
    serde_json::from_str(raw)
        .map_err(|e| DomainError::InvalidInput(format!("Bad value for {}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.sort_option, SortOption::RecentlyAdded);
        assert_eq!(prefs.category_sort, CategorySortOption::RecentlyAdded);
        assert!(prefs.hide_blank_fields);
        assert_eq!(prefs.font_size, 3);
        assert_eq!(prefs.group_mode(), GroupMode::None);
        assert_eq!(
            prefs.visible_categories.into_iter().collect::<Vec<_>>(),
            vec![CategoryKey::Uncategorized]
        );
    }

    #[test]
    fn test_defaults_for_seeds_known_categories() {
        let known = vec![Category::new(1, "Dairy".to_string()), Category::new(2, "Bakery".to_string())];
        let prefs = Preferences::defaults_for(&known);
        assert_eq!(prefs.visible_categories.len(), 3);
        assert!(prefs.visible_categories.contains(&CategoryKey::Named("Dairy".to_string())));
        assert!(prefs.visible_categories.contains(&CategoryKey::Uncategorized));
    }

    #[test]
    fn test_group_mode_priority() {
        let mut prefs = Preferences::default();
        prefs.group_by_field = true;
        prefs.group_field = ProductField::Brand;
        assert_eq!(prefs.group_mode(), GroupMode::ByField(ProductField::Brand));

        prefs.group_by_category = true;
        assert_eq!(prefs.group_mode(), GroupMode::ByCategory);
    }

    #[test]
    fn test_entries_cover_every_key() {
        let entries = Preferences::default().entries().unwrap();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ALL_KEYS.to_vec());
    }

    #[test]
    fn test_apply_entries_restores_values() {
        let mut original = Preferences::default();
        original.sort_option = SortOption::Brand;
        original.group_by_field = true;
        original.tint_color = 4;
        original.visible_categories.insert(CategoryKey::Named("Frozen".to_string()));

        let mut restored = Preferences::default();
        for (key, raw) in original.entries().unwrap() {
            restored.apply(key, &raw).unwrap();
        }
        assert_eq!(restored, original);
    }

    #[test]
    fn test_apply_rejects_garbage() {
        let mut prefs = Preferences::default();
        assert!(prefs.apply(KEY_FONT_SIZE, "\"huge\"").is_err());
        assert_eq!(prefs.font_size, 3);
        assert!(prefs.apply("somethingElse", "1").is_ok());
    }
}
