//! Preference Store
//!
//! Holds the current `Preferences`, persists each change in one transaction and
//! publishes every new snapshot on a watch channel. Commands get the store
//! injected through `AppState`; nothing here is global.

use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use crate::domain::{Category, DomainResult};
use crate::repository::PreferenceRepository;
use super::preferences::{Preferences, ALL_KEYS, KEY_VISIBLE_CATEGORIES};

pub struct PreferenceStore {
    repo: Arc<PreferenceRepository>,
    sender: watch::Sender<Preferences>,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    /// Read every stored preference, falling back to defaults
    ///
    /// A missing visibility entry means the store is fresh: every known
    /// category becomes visible and that choice is written back.
    pub async fn load(repo: Arc<PreferenceRepository>, known: &[Category]) -> DomainResult<Self> {
        let mut prefs = Preferences::defaults_for(known);
        let mut seed_visibility = true;

        for key in ALL_KEYS {
            let Some(raw) = repo.get_raw(key).await? else {
                continue;
            };
            match prefs.apply(key, &raw) {
                Ok(()) => {
                    if key == KEY_VISIBLE_CATEGORIES {
                        seed_visibility = false;
                    }
                }
                Err(e) => log::warn!("Using default for preference {}: {}", key, e),
            }
        }

        if seed_visibility {
            let entries = prefs.entries()?;
            if let Some((key, value)) = entries.iter().find(|(k, _)| *k == KEY_VISIBLE_CATEGORIES) {
                repo.set_raw(key, value).await?;
            }
        }

        let (sender, _) = watch::channel(prefs);
        Ok(Self {
            repo,
            sender,
            write_lock: Mutex::new(()),
        })
    }

    /// Snapshot of the current preferences
    pub fn get(&self) -> Preferences {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Preferences> {
        self.sender.subscribe()
    }

    /// Apply `f` to a copy of the preferences, persist what changed and
    /// publish the result
    ///
    /// If `f` fails nothing is written and subscribers are not notified.
    pub async fn update<F>(&self, f: F) -> DomainResult<Preferences>
    where
        F: FnOnce(&mut Preferences) -> DomainResult<()>,
    {
        let _lock = self.write_lock.lock().await;

        let before = self.get();
        let mut next = before.clone();
        f(&mut next)?;

        if next == before {
            return Ok(next);
        }

        let old_entries = before.entries()?;
        let changed: Vec<(&str, String)> = next
            .entries()?
            .into_iter()
            .zip(old_entries)
            .filter(|((_, value), (_, old))| value != old)
            .map(|(entry, _)| entry)
            .collect();
        self.repo.set_many(&changed).await?;

        self.sender.send_replace(next.clone());
        Ok(next)
    }

    /// Restore every default, re-seeding visibility from `known`
    pub async fn reset(&self, known: &[Category]) -> DomainResult<Preferences> {
        let _lock = self.write_lock.lock().await;

        let prefs = Preferences::defaults_for(known);
        self.repo.replace_all(&prefs.entries()?).await?;

        log::info!("Preferences reset to defaults");
        self.sender.send_replace(prefs.clone());
        Ok(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryKey, DomainError};
    use crate::pipeline::SortOption;
    use crate::repository::{init_db, DbState, EventBus};
    use crate::settings::preferences::{KEY_FONT_SIZE, KEY_GROUP_BY_CATEGORY, KEY_SORT_OPTION};
    use std::path::Path;

    async fn setup_db() -> (DbState, Arc<PreferenceRepository>) {
        let db = init_db(Path::new(":memory:")).await.expect("Failed to init test DB");
        let repo = Arc::new(PreferenceRepository::new(db.conn.clone(), EventBus::default()));
        (db, repo)
    }

    async fn setup_repo() -> Arc<PreferenceRepository> {
        setup_db().await.1
    }

    /// Make every write of `key` fail inside SQLite
    async fn reject_writes_of(db: &DbState, key: &str) {
        let guard = db.conn.lock().await;
        let conn = guard.as_ref().expect("open connection");
        conn.execute_batch(&format!(
            "CREATE TRIGGER reject_{key} BEFORE INSERT ON preferences
             WHEN NEW.key = '{key}'
             BEGIN SELECT RAISE(ABORT, 'disk full'); END;"
        ))
        .expect("create trigger");
    }

    fn known() -> Vec<Category> {
        vec![Category::new(1, "Dairy".to_string())]
    }

    #[tokio::test]
    async fn test_first_load_seeds_visibility() {
        let repo = setup_repo().await;
        let store = PreferenceStore::load(repo.clone(), &known()).await.unwrap();

        let prefs = store.get();
        assert!(prefs.visible_categories.contains(&CategoryKey::Named("Dairy".to_string())));
        assert!(prefs.visible_categories.contains(&CategoryKey::Uncategorized));
        assert!(repo.get_raw(KEY_VISIBLE_CATEGORIES).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_persists_and_reloads() {
        let repo = setup_repo().await;
        let store = PreferenceStore::load(repo.clone(), &known()).await.unwrap();

        store
            .update(|p| {
                p.sort_option = SortOption::Brand;
                p.visible_categories.clear();
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(repo.get_raw(KEY_SORT_OPTION).await.unwrap().as_deref(), Some("\"Brand\""));
        assert!(repo.get_raw(KEY_FONT_SIZE).await.unwrap().is_none());

        // An empty stored set is a real choice, not a reason to re-seed
        let reloaded = PreferenceStore::load(repo, &known()).await.unwrap();
        assert_eq!(reloaded.get().sort_option, SortOption::Brand);
        assert!(reloaded.get().visible_categories.is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_changes_nothing() {
        let repo = setup_repo().await;
        let store = PreferenceStore::load(repo, &known()).await.unwrap();
        let rx = store.subscribe();

        let result = store
            .update(|p| {
                p.font_size = 6;
                Err(DomainError::InvalidInput("nope".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(store.get().font_size, 3);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let repo = setup_repo().await;
        let store = PreferenceStore::load(repo, &known()).await.unwrap();
        let mut rx = store.subscribe();

        store.update(|p| { p.tint_color = 2; Ok(()) }).await.unwrap();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().tint_color, 2);
    }

    #[tokio::test]
    async fn test_garbage_value_falls_back_to_default() {
        let repo = setup_repo().await;
        repo.set_raw(KEY_FONT_SIZE, "not json").await.unwrap();

        let store = PreferenceStore::load(repo, &known()).await.unwrap();
        assert_eq!(store.get().font_size, 3);
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let repo = setup_repo().await;
        let store = PreferenceStore::load(repo.clone(), &known()).await.unwrap();
        store.update(|p| { p.hide_blank_fields = false; p.font_size = 0; Ok(()) }).await.unwrap();

        let more = vec![Category::new(1, "Dairy".to_string()), Category::new(2, "Frozen".to_string())];
        let prefs = store.reset(&more).await.unwrap();
        assert!(prefs.hide_blank_fields);
        assert_eq!(prefs.font_size, 3);
        assert_eq!(prefs.visible_categories.len(), 3);
        assert_eq!(repo.get_raw(KEY_FONT_SIZE).await.unwrap().as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_failed_write_keeps_disk_and_memory_in_step() {
        let (db, repo) = setup_db().await;
        let store = PreferenceStore::load(repo.clone(), &known()).await.unwrap();
        store.update(|p| { p.sort_option = SortOption::Category; Ok(()) }).await.unwrap();

        reject_writes_of(&db, KEY_GROUP_BY_CATEGORY).await;
        let result = store
            .update(|p| {
                p.sort_option = SortOption::RecentlyAdded;
                p.group_by_category = true;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(DomainError::Internal(_))));

        assert_eq!(store.get().sort_option, SortOption::Category);
        assert!(!store.get().group_by_category);

        let reloaded = PreferenceStore::load(repo, &known()).await.unwrap();
        assert_eq!(reloaded.get().sort_option, SortOption::Category);
        assert!(!reloaded.get().group_by_category);
    }

    #[tokio::test]
    async fn test_failed_reset_keeps_stored_values() {
        let (db, repo) = setup_db().await;
        let store = PreferenceStore::load(repo.clone(), &known()).await.unwrap();
        store.update(|p| { p.font_size = 6; p.sort_option = SortOption::Brand; Ok(()) }).await.unwrap();

        reject_writes_of(&db, KEY_FONT_SIZE).await;
        assert!(store.reset(&known()).await.is_err());
        assert_eq!(store.get().font_size, 6);

        assert_eq!(repo.get_raw(KEY_FONT_SIZE).await.unwrap().as_deref(), Some("6"));
        assert_eq!(repo.get_raw(KEY_SORT_OPTION).await.unwrap().as_deref(), Some("\"Brand\""));
        assert!(repo.get_raw(KEY_VISIBLE_CATEGORIES).await.unwrap().is_some());
    }
}
