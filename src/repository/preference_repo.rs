//! Preference Repository
//!
//! Raw key/value persistence for user preferences. Values are stored as
//! JSON text; typing them is the settings layer's job.

use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainError, DomainResult};
use super::db::{connection, SharedConnection};
use super::events::{ChangeEvent, EventBus};

pub struct PreferenceRepository {
    conn: SharedConnection,
    events: EventBus,
}

impl PreferenceRepository {
    pub fn new(conn: SharedConnection, events: EventBus) -> Self {
        Self { conn, events }
    }

    pub async fn get_raw(&self, key: &str) -> DomainResult<Option<String>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.query_row(
            "SELECT value FROM preferences WHERE key = ?",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| DomainError::Internal(e.to_string()))
    }

    pub async fn set_raw(&self, key: &str, value: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?, ?)",
            params![key, value],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        log::debug!("Preference {} = {}", key, value);
        self.events.emit(ChangeEvent::PreferencesChanged);
        Ok(())
    }

    /// Write several entries in one transaction; on failure none are kept
    pub async fn set_many(&self, entries: &[(&str, String)]) -> DomainResult<()> {
        self.write_entries(entries, false).await
    }

    /// Forget every stored preference and write `entries`, all or nothing
    pub async fn replace_all(&self, entries: &[(&str, String)]) -> DomainResult<()> {
        self.write_entries(entries, true).await
    }

    async fn write_entries(&self, entries: &[(&str, String)], clear_first: bool) -> DomainResult<()> {
        if entries.is_empty() && !clear_first {
            return Ok(());
        }

        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if clear_first {
            tx.execute("DELETE FROM preferences", [])
                .map_err(|e| DomainError::Internal(e.to_string()))?;
        }
        for (key, value) in entries {
            tx.execute(
                "INSERT OR REPLACE INTO preferences (key, value) VALUES (?, ?)",
                params![key, value],
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        }
        tx.commit().map_err(|e| DomainError::Internal(e.to_string()))?;

        log::debug!("Wrote {} preference(s)", entries.len());
        self.events.emit(ChangeEvent::PreferencesChanged);
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.execute("DELETE FROM preferences WHERE key = ?", params![key])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        self.events.emit(ChangeEvent::PreferencesChanged);
        Ok(())
    }

    /// Forget every stored preference
    pub async fn clear(&self) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.execute("DELETE FROM preferences", [])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        self.events.emit(ChangeEvent::PreferencesChanged);
        Ok(())
    }
}
