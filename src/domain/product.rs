//! Product Entity
//!
//! A recorded grocery/household item with an optional category link and an
//! optional photo stored outside the database.

use serde::{Deserialize, Serialize};

use super::category::{CategoryKey, CategoryLink};
use super::entity::{DomainError, DomainResult, Entity};

/// Message shown when a mandatory name is missing
pub const MISSING_NAMES_MESSAGE: &str = "Please enter both item name and brand name.";

/// Content hash of an image blob held by the image store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A stored product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier, increasing in creation order
    pub id: u32,
    pub item_name: String,
    pub brand_name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub image: Option<ImageRef>,
    pub category: Option<CategoryLink>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    pub fn new(id: u32, item_name: String, brand_name: String) -> Self {
        Self {
            id,
            item_name,
            brand_name,
            description: None,
            notes: None,
            image: None,
            category: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn with_category(mut self, id: u32, name: &str) -> Self {
        self.category = Some(CategoryLink {
            id,
            name: name.to_string(),
        });
        self
    }

    /// Key used for visibility filtering and category grouping
    pub fn category_key(&self) -> CategoryKey {
        match &self.category {
            Some(link) => CategoryKey::Named(link.name.clone()),
            None => CategoryKey::Uncategorized,
        }
    }

    /// Category label, "None" when uncategorized
    pub fn category_label(&self) -> &str {
        match &self.category {
            Some(link) => &link.name,
            None => super::category::UNCATEGORIZED_LABEL,
        }
    }
}

impl Entity for Product {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Form state of the create/update product flows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub item_name: String,
    pub brand_name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub category_id: Option<u32>,
    /// Freshly captured/picked photo bytes, not yet stored
    #[serde(default, skip_serializing)]
    pub image: Option<Vec<u8>>,
}

impl ProductDraft {
    pub fn new(item_name: impl Into<String>, brand_name: impl Into<String>) -> Self {
        Self {
            item_name: item_name.into(),
            brand_name: brand_name.into(),
            ..Default::default()
        }
    }

    /// Prefill a draft for editing an existing product
    pub fn from_product(product: &Product) -> Self {
        Self {
            item_name: product.item_name.clone(),
            brand_name: product.brand_name.clone(),
            description: product.description.clone(),
            notes: product.notes.clone(),
            category_id: product.category.as_ref().map(|c| c.id),
            image: None,
        }
    }

    /// Item and brand names are mandatory
    pub fn validate(&self) -> DomainResult<()> {
        if self.item_name.trim().is_empty() || self.brand_name.trim().is_empty() {
            return Err(DomainError::InvalidInput(MISSING_NAMES_MESSAGE.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_creation() {
        let product = Product::new(1, "Milk".to_string(), "Dairy Farmers".to_string());
        assert_eq!(product.id(), 1);
        assert_eq!(product.category_key(), CategoryKey::Uncategorized);
        assert_eq!(product.category_label(), "None");
    }

    #[test]
    fn test_category_key_follows_link() {
        let product = Product::new(1, "Milk".to_string(), "Dairy Farmers".to_string())
            .with_category(3, "Dairy");
        assert_eq!(product.category_key(), CategoryKey::Named("Dairy".to_string()));
        assert_eq!(product.category_label(), "Dairy");
    }

    #[test]
    fn test_draft_requires_both_names() {
        assert!(ProductDraft::new("Milk", "Dairy Farmers").validate().is_ok());
        assert_eq!(
            ProductDraft::new("Milk", "").validate(),
            Err(DomainError::InvalidInput(MISSING_NAMES_MESSAGE.to_string()))
        );
        assert!(ProductDraft::new("  ", "Wonder").validate().is_err());
    }

    #[test]
    fn test_draft_from_product_keeps_category() {
        let mut product = Product::new(4, "Bread".to_string(), "Wonder".to_string())
            .with_category(2, "Bakery");
        product.notes = Some("Use by Friday".to_string());

        let draft = ProductDraft::from_product(&product);
        assert_eq!(draft.category_id, Some(2));
        assert_eq!(draft.notes.as_deref(), Some("Use by Friday"));
        assert!(draft.image.is_none());
    }
}
