//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO external dependencies (except serde for serialization).

mod entity;
mod category;
mod product;
pub mod samples;

pub use entity::{Entity, DomainError, DomainResult};
pub use category::{Category, CategoryKey, CategoryLink, UNCATEGORIZED_LABEL};
pub use product::{ImageRef, Product, ProductDraft, MISSING_NAMES_MESSAGE};
