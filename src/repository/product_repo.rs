//! Product Repository
//!
//! SQLite-backed implementation of Repository<Product>. Category names are
//! resolved with a join so products come back ready for the pipeline.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;

use crate::domain::{CategoryLink, DomainError, DomainResult, ImageRef, Product};
use super::db::{connection, SharedConnection};
use super::events::{ChangeEvent, EventBus};
use super::traits::Repository;

const SELECT_PRODUCT: &str = "SELECT p.id, p.item_name, p.brand_name, p.description, p.notes, p.image_hash, p.category_id, c.name, p.created_at, p.updated_at
     FROM products p LEFT JOIN categories c ON c.id = p.category_id";

/// SQLite implementation of Product repository
pub struct ProductRepository {
    conn: SharedConnection,
    events: EventBus,
}

impl ProductRepository {
    pub fn new(conn: SharedConnection, events: EventBus) -> Self {
        Self { conn, events }
    }

    /// Delete every product, returning how many were removed
    pub async fn delete_all(&self) -> DomainResult<usize> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let removed = conn
            .execute("DELETE FROM products", [])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        self.events.emit(ChangeEvent::ProductsChanged);
        Ok(removed)
    }

    /// Image hashes still referenced by some product
    pub async fn referenced_images(&self) -> DomainResult<HashSet<String>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut stmt = conn
            .prepare("SELECT DISTINCT image_hash FROM products WHERE image_hash IS NOT NULL")
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let hashes = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| DomainError::Internal(e.to_string()))?
            .collect::<Result<HashSet<_>, _>>()
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(hashes)
    }
}

#[async_trait]
impl Repository<Product> for ProductRepository {
    async fn create(&self, entity: &Product) -> DomainResult<Product> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let now = chrono::Utc::now().timestamp_millis();
        conn.execute(
            "INSERT INTO products (item_name, brand_name, description, notes, image_hash, category_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                entity.item_name,
                entity.brand_name,
                entity.description,
                entity.notes,
                entity.image.as_ref().map(|i| i.as_str()),
                entity.category.as_ref().map(|c| c.id),
                now,
                now
            ],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        let id = conn.last_insert_rowid() as u32;
        let created = query_product(conn, id)?
            .ok_or_else(|| DomainError::Internal(format!("Product {} vanished after insert", id)))?;

        log::info!("Created product {} ({} / {})", id, created.item_name, created.brand_name);
        self.events.emit(ChangeEvent::ProductsChanged);
        Ok(created)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Product>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;
        query_product(conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<Product>> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let mut stmt = conn
            .prepare(&format!("{} ORDER BY p.id ASC", SELECT_PRODUCT))
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let mut rows = stmt.query([]).map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut products = Vec::new();
        while let Some(row) = rows.next().map_err(|e| DomainError::Internal(e.to_string()))? {
            products.push(row_to_product(row).map_err(|e| DomainError::Internal(e.to_string()))?);
        }
        Ok(products)
    }

    async fn update(&self, entity: &Product) -> DomainResult<Product> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let changed = conn
            .execute(
                "UPDATE products SET item_name = ?, brand_name = ?, description = ?, notes = ?, image_hash = ?, category_id = ?, updated_at = ? WHERE id = ?",
                params![
                    entity.item_name,
                    entity.brand_name,
                    entity.description,
                    entity.notes,
                    entity.image.as_ref().map(|i| i.as_str()),
                    entity.category.as_ref().map(|c| c.id),
                    chrono::Utc::now().timestamp_millis(),
                    entity.id
                ],
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Product {}", entity.id)));
        }

        let updated = query_product(conn, entity.id)?
            .ok_or_else(|| DomainError::NotFound(format!("Product {}", entity.id)))?;

        self.events.emit(ChangeEvent::ProductsChanged);
        Ok(updated)
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = connection(&guard)?;

        let removed = conn
            .execute("DELETE FROM products WHERE id = ?", params![id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if removed == 0 {
            return Err(DomainError::NotFound(format!("Product {}", id)));
        }

        log::info!("Deleted product {}", id);
        self.events.emit(ChangeEvent::ProductsChanged);
        Ok(())
    }
}

fn query_product(conn: &Connection, id: u32) -> DomainResult<Option<Product>> {
    conn.query_row(
        &format!("{} WHERE p.id = ?", SELECT_PRODUCT),
        params![id],
        row_to_product,
    )
    .optional()
    .map_err(|e| DomainError::Internal(e.to_string()))
}

/// Convert a database row to Product
fn row_to_product(row: &rusqlite::Row) -> rusqlite::Result<Product> {
    let category_id: Option<u32> = row.get(6)?;
    let category_name: Option<String> = row.get(7)?;

    Ok(Product {
        id: row.get(0)?,
        item_name: row.get(1)?,
        brand_name: row.get(2)?,
        description: row.get(3)?,
        notes: row.get(4)?,
        image: row.get::<_, Option<String>>(5)?.map(ImageRef),
        category: category_id
            .zip(category_name)
            .map(|(id, name)| CategoryLink { id, name }),
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
