//! Product Saver Core
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - pipeline: Filter, sort and group products for display
//! - repository: Data access abstractions and implementations
//! - settings: Persisted preferences and appearance lookups
//! - commands: Operations called by a presentation layer

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod domain;
pub mod pipeline;
pub mod repository;
pub mod settings;
pub mod commands;

use domain::{DomainError, DomainResult};
use repository::{
    init_db, CategoryRepository, DbState, EventBus, ImageStore, PreferenceRepository,
    ProductRepository, Repository,
};
use settings::PreferenceStore;

const DB_FILE: &str = "product_saver.db";
const IMAGES_DIR: &str = "images";
const LOG_DIR: &str = "logs";
const APP_NAME: &str = "ProductSaver";

/// Where the application keeps its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Platform data directory, falling back to the home directory
    pub fn default_location() -> Self {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("product-saver");
        Self::new(path)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.data_dir.join(IMAGES_DIR)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR)
    }
}

/// Application state shared across commands
pub struct AppState {
    pub db_state: DbState,
    pub products: ProductRepository,
    pub categories: CategoryRepository,
    pub preferences: PreferenceStore,
    pub images: ImageStore,
    pub events: EventBus,
}

impl AppState {
    /// Open the database at `db_path` and wire every repository to it
    pub async fn open(db_path: &Path, images_dir: PathBuf) -> DomainResult<Self> {
        let db_state = init_db(db_path).await.map_err(DomainError::Internal)?;
        let events = EventBus::default();

        let products = ProductRepository::new(db_state.conn.clone(), events.clone());
        let categories = CategoryRepository::new(db_state.conn.clone(), events.clone());
        let preference_repo = Arc::new(PreferenceRepository::new(db_state.conn.clone(), events.clone()));

        let known = categories.list().await?;
        let preferences = PreferenceStore::load(preference_repo, &known).await?;

        // Files left by writes that failed halfway
        let images = ImageStore::new(images_dir);
        images.remove_unreferenced(&products.referenced_images().await?).await?;

        Ok(Self {
            db_state,
            products,
            categories,
            preferences,
            images,
            events,
        })
    }
}

/// Create the data directory and open the store
///
/// Any storage failure is returned; callers should not continue without a
/// working store.
pub async fn init_app(config: &AppConfig) -> DomainResult<AppState> {
    std::fs::create_dir_all(&config.data_dir).map_err(|e| {
        DomainError::Internal(format!(
            "Failed to create data dir {}: {}",
            config.data_dir.display(),
            e
        ))
    })?;

    match AppState::open(&config.db_path(), config.images_dir()).await {
        Ok(state) => {
            log::info!("Product Saver ready at {}", config.data_dir.display());
            Ok(state)
        }
        Err(e) => {
            log::error!("Failed to open store: {}", e);
            Err(e)
        }
    }
}

/// Install the rolling file logger under the configured log directory
pub fn init_logging(config: &AppConfig) -> Result<(), String> {
    rolling_logger::init_logger(config.log_dir(), APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        let config = AppConfig::new("/tmp/ps");
        assert_eq!(config.db_path(), PathBuf::from("/tmp/ps/product_saver.db"));
        assert_eq!(config.images_dir(), PathBuf::from("/tmp/ps/images"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/ps/logs"));
    }

    #[test]
    fn test_default_location_is_named_after_app() {
        let config = AppConfig::default_location();
        assert!(config.data_dir.ends_with("product-saver"));
    }

    #[tokio::test]
    async fn test_init_app_creates_store() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig::new(tmp.path().join("data"));

        let state = init_app(&config).await.expect("init failed");
        assert!(state.db_state.is_initialized().await);
        assert!(config.db_path().exists());
        assert!(state.products.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_init_app_fails_on_unusable_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"not a dir").unwrap();

        let result = init_app(&AppConfig::new(blocker.join("data"))).await;
        assert!(matches!(result, Err(DomainError::Internal(_))));
    }
}
