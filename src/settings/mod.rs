//! Settings Layer
//!
//! Persisted user preferences and the appearance lookups derived from them.

mod facade;
mod preferences;
mod store;

pub use facade::{Appearance, ColorScheme, FontSize, TintColor};
pub use preferences::{seeded_visibility, Preferences};
pub use store::PreferenceStore;
