//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod events;
mod product_repo;
mod category_repo;
mod preference_repo;
mod image_store;


pub use traits::Repository;
pub use db::{init_db, DbState, SharedConnection};
pub use events::{ChangeEvent, EventBus};
pub use product_repo::ProductRepository;
pub use category_repo::CategoryRepository;
pub use preference_repo::PreferenceRepository;
pub use image_store::ImageStore;
