//! Category Repository
//!
//! SQLite-backed implementation of Repository<Category>, plus the guarded
//! create used by the commands layer. Deleting a category never deletes
//! products; their link is cleared in the same transaction.

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::domain::{Category, DomainError, DomainResult};
use super::db::{connection, SharedConnection};
use super::events::{ChangeEvent, EventBus};
use super::traits::Repository;

/// SQLite implementation of Category repository
pub struct CategoryRepository {
    conn: SharedConnection,
    events: EventBus,
}

impl CategoryRepository {
    pub fn new(conn: SharedConnection, events: EventBus) -> Self {
        Self { conn, events }
    }

    /// Validate `name` against the stored categories and insert it
    ///
    /// The check and the insert run under one lock so two callers can't both
    /// pass the guard with the same name.
    pub async fn create_unique(&self, name: &str) -> DomainResult<Category> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let existing = query_all(conn)?;
        let category = Category::checked_new(&existing, name)?;
        let created = insert(conn, &category)?;

        log::info!("Created category {} ({})", created.id, created.name);
        self.events.emit(ChangeEvent::CategoriesChanged);
        Ok(created)
    }

    /// Case-insensitive lookup by name
    pub async fn find_by_name(&self, name: &str) -> DomainResult<Option<Category>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.query_row(
            "SELECT id, name, created_at FROM categories WHERE name = ? COLLATE NOCASE",
            params![name],
            row_to_category,
        )
        .optional()
        .map_err(|e| DomainError::Internal(e.to_string()))
    }

    /// Delete every category; products keep existing, uncategorized
    pub async fn delete_all(&self) -> DomainResult<usize> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        tx.execute("UPDATE products SET category_id = NULL WHERE category_id IS NOT NULL", [])
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let removed = tx
            .execute("DELETE FROM categories", [])
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        tx.commit().map_err(|e| DomainError::Internal(e.to_string()))?;

        self.events.emit(ChangeEvent::CategoriesChanged);
        self.events.emit(ChangeEvent::ProductsChanged);
        Ok(removed)
    }
}

#[async_trait]
impl Repository<Category> for CategoryRepository {
    /// Insert without the guard; the unique column still rejects duplicates
    async fn create(&self, entity: &Category) -> DomainResult<Category> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let created = insert(conn, entity)?;
        self.events.emit(ChangeEvent::CategoriesChanged);
        Ok(created)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Category>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        conn.query_row(
            "SELECT id, name, created_at FROM categories WHERE id = ?",
            params![id],
            row_to_category,
        )
        .optional()
        .map_err(|e| DomainError::Internal(e.to_string()))
    }

    async fn list(&self) -> DomainResult<Vec<Category>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;
        query_all(conn)
    }

    /// Rename, applying the same guard as create while ignoring the row itself
    async fn update(&self, entity: &Category) -> DomainResult<Category> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let others: Vec<Category> = query_all(conn)?
            .into_iter()
            .filter(|c| c.id != entity.id)
            .collect();
        Category::checked_new(&others, &entity.name)?;

        let changed = conn
            .execute(
                "UPDATE categories SET name = ? WHERE id = ?",
                params![entity.name, entity.id],
            )
            .map_err(|e| map_insert_error(e, &entity.name))?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Category {}", entity.id)));
        }

        let updated = conn
            .query_row(
                "SELECT id, name, created_at FROM categories WHERE id = ?",
                params![entity.id],
                row_to_category,
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        self.events.emit(ChangeEvent::CategoriesChanged);
        self.events.emit(ChangeEvent::ProductsChanged);
        Ok(updated)
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let cleared = tx
            .execute(
                "UPDATE products SET category_id = NULL WHERE category_id = ?",
                params![id],
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let removed = tx
            .execute("DELETE FROM categories WHERE id = ?", params![id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if removed == 0 {
            // Dropping the transaction rolls it back
            return Err(DomainError::NotFound(format!("Category {}", id)));
        }
        tx.commit().map_err(|e| DomainError::Internal(e.to_string()))?;

        log::info!("Deleted category {} and cleared {} product link(s)", id, cleared);
        self.events.emit(ChangeEvent::CategoriesChanged);
        if cleared > 0 {
            self.events.emit(ChangeEvent::ProductsChanged);
        }
        Ok(())
    }
}

fn insert(conn: &Connection, entity: &Category) -> DomainResult<Category> {
    let now = chrono::Utc::now().timestamp_millis();
    conn.execute(
        "INSERT INTO categories (name, created_at) VALUES (?, ?)",
        params![entity.name, now],
    )
    .map_err(|e| map_insert_error(e, &entity.name))?;

    Ok(Category {
        id: conn.last_insert_rowid() as u32,
        name: entity.name.clone(),
        created_at: now,
    })
}

fn query_all(conn: &Connection) -> DomainResult<Vec<Category>> {
    let mut stmt = conn
        .prepare("SELECT id, name, created_at FROM categories ORDER BY id ASC")
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    let categories = stmt
        .query_map([], row_to_category)
        .map_err(|e| DomainError::Internal(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    Ok(categories)
}

/// A unique-constraint hit means the name is taken
fn map_insert_error(err: rusqlite::Error, name: &str) -> DomainError {
    match err {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            DomainError::DuplicateName(name.to_string())
        }
        other => DomainError::Internal(other.to_string()),
    }
}

fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}
