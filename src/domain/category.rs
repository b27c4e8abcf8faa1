//! Category Entity
//!
//! Categories are user-defined buckets a product may optionally belong to.
//! The product row owns the link; a category never owns its products.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::entity::{DomainError, DomainResult, Entity};

/// Label shown for products without a category
pub const UNCATEGORIZED_LABEL: &str = "None";

/// A user-defined product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier (0 until stored)
    pub id: u32,
    /// Category name, unique ignoring case
    pub name: String,
    pub created_at: i64,
}

impl Category {
    pub fn new(id: u32, name: String) -> Self {
        Self {
            id,
            name,
            created_at: 0,
        }
    }

    /// Build a new unsaved category after checking it against `existing`
    ///
    /// Rejects blank names and names that match an existing category
    /// ignoring case.
    pub fn checked_new(existing: &[Category], proposed: &str) -> DomainResult<Category> {
        if proposed.trim().is_empty() {
            return Err(DomainError::InvalidInput("Category name is required".to_string()));
        }

        let lowered = proposed.to_lowercase();
        if existing.iter().any(|c| c.name.to_lowercase() == lowered) {
            return Err(DomainError::DuplicateName(proposed.to_string()));
        }

        Ok(Category::new(0, proposed.to_string()))
    }

    pub fn key(&self) -> CategoryKey {
        CategoryKey::Named(self.name.clone())
    }
}

impl Entity for Category {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// The category a product points at, as resolved by the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLink {
    pub id: u32,
    pub name: String,
}

/// Category identity used for visibility filtering and grouping
///
/// `Uncategorized` is a distinct variant so a real category named "None"
/// never shares a bucket with products that have no category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum CategoryKey {
    Uncategorized,
    Named(String),
}

impl CategoryKey {
    pub fn label(&self) -> &str {
        match self {
            CategoryKey::Uncategorized => UNCATEGORIZED_LABEL,
            CategoryKey::Named(name) => name,
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        matches!(self, CategoryKey::Uncategorized)
    }
}

impl Ord for CategoryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label()
            .cmp(other.label())
            .then_with(|| other.is_uncategorized().cmp(&self.is_uncategorized()))
    }
}

impl PartialOrd for CategoryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
