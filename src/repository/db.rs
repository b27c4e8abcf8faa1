//! Database Connection and Setup
//!
//! Manages SQLite database connection and migrations.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Shared handle to the single SQLite connection
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConnection,
    pub db_path: PathBuf,
}

impl DbState {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
            db_path,
        }
    }

    pub async fn is_initialized(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Drop the connection; later repository calls fail as uninitialized
    pub async fn close(&self) {
        *self.conn.lock().await = None;
    }
}

/// Borrow the connection out of a locked slot
pub(crate) fn connection(slot: &Option<Connection>) -> DomainResult<&Connection> {
    slot.as_ref()
        .ok_or(DomainError::Internal("Database not initialized".to_string()))
}

/// Open the database at `db_path` (":memory:" for a throwaway store) and run
/// migrations
pub async fn init_db(db_path: &Path) -> Result<DbState, String> {
    let conn = Connection::open(db_path).map_err(|e| format!("Failed to open db: {}", e))?;

    run_migrations(&conn)?;

    let state = DbState::new(db_path.to_path_buf());
    *state.conn.lock().await = Some(conn);

    log::info!("Database initialized at {}", db_path.display());
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(mut rows) = stmt.query([]) else {
        return false;
    };
    while let Ok(Some(row)) = rows.next() {
        if let Ok(name) = row.get::<_, String>(1) {
            if name == column {
                return true;
            }
        }
    }
    false
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| format!("Failed to enable foreign keys: {}", e))?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE COLLATE NOCASE,
            created_at INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_name TEXT NOT NULL,
            brand_name TEXT NOT NULL,
            description TEXT,
            notes TEXT,
            category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
            created_at INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS preferences (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )
    .map_err(|e| e.to_string())?;

    // Photos moved out of the row into the image store
    if !column_exists(conn, "products", "image_hash") {
        conn.execute("ALTER TABLE products ADD COLUMN image_hash TEXT", [])
            .map_err(|e| format!("Failed to add image_hash: {}", e))?;
    }

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_products_category ON products(category_id)",
        [],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_in_memory() {
        let state = init_db(Path::new(":memory:")).await.expect("init failed");
        assert!(state.is_initialized().await);

        let guard = state.conn.lock().await;
        let conn = connection(&guard).unwrap();
        assert!(column_exists(conn, "products", "image_hash"));
        assert!(column_exists(conn, "categories", "name"));
        assert!(!column_exists(conn, "products", "missing"));
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let state = init_db(Path::new(":memory:")).await.unwrap();
        let guard = state.conn.lock().await;
        assert!(run_migrations(connection(&guard).unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_closed_state_reports_uninitialized() {
        let state = init_db(Path::new(":memory:")).await.unwrap();
        state.close().await;
        let guard = state.conn.lock().await;
        assert!(connection(&guard).is_err());
    }
}
