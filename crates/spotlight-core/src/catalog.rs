//! Catalog access for the rotation.
//!
//! The rotation only depends on the [`Catalog`] trait: a filtered, ordered,
//! bounded id lookup plus per-product resolve and save. [`SqliteCatalog`] is
//! the bundled implementation backing the `spotlight product` commands and
//! the server.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, SpotlightError};
use crate::types::{Product, ProductId, ProductQuery, QueryOrder};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS products (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT    NOT NULL,
    featured   INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS products_featured_created
    ON products (featured, created_at, id);
";

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

pub trait Catalog: Send + Sync {
    /// Ids of up to `query.limit` products matching the featured filter, in
    /// the requested order.
    fn query(&self, query: &ProductQuery) -> Result<Vec<ProductId>>;

    /// Resolve an id to a live product. `None` when it no longer exists.
    fn get(&self, id: ProductId) -> Result<Option<Product>>;

    /// Persist the product's mutable fields.
    fn save(&self, product: &Product) -> Result<()>;
}

// ---------------------------------------------------------------------------
// SqliteCatalog
// ---------------------------------------------------------------------------

pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| SpotlightError::Catalog("catalog connection lock poisoned".into()))
    }

    /// Add a product created now.
    pub fn add(&self, name: &str, featured: bool) -> Result<Product> {
        self.add_at(name, featured, Utc::now())
    }

    /// Add a product with an explicit creation time.
    pub fn add_at(&self, name: &str, featured: bool, created_at: DateTime<Utc>) -> Result<Product> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SpotlightError::InvalidProductName(
                "name must not be empty".into(),
            ));
        }
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO products (name, featured, created_at) VALUES (?1, ?2, ?3)",
            params![name, featured, created_at.timestamp_micros()],
        )?;
        Ok(Product {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            featured,
            created_at,
        })
    }

    pub fn remove(&self, id: ProductId) -> Result<()> {
        let conn = self.conn()?;
        let n = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
        if n == 0 {
            return Err(SpotlightError::ProductNotFound(id));
        }
        Ok(())
    }

    /// All products, oldest first. `featured` narrows to one side of the flag.
    pub fn list(&self, featured: Option<bool>) -> Result<Vec<Product>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, featured, created_at FROM products
             WHERE (?1 IS NULL OR featured = ?1)
             ORDER BY created_at ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![featured], row_to_product)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row??);
        }
        Ok(out)
    }

    pub fn count(&self, featured: bool) -> Result<usize> {
        let conn = self.conn()?;
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM products WHERE featured = ?1",
            params![featured],
            |r| r.get(0),
        )?;
        Ok(n as usize)
    }
}

impl Catalog for SqliteCatalog {
    fn query(&self, query: &ProductQuery) -> Result<Vec<ProductId>> {
        let order = match query.order {
            QueryOrder::CreatedAsc => "created_at ASC, id ASC",
            QueryOrder::Random => "RANDOM()",
        };
        let sql = format!("SELECT id FROM products WHERE featured = ?1 ORDER BY {order} LIMIT ?2");
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let ids = stmt
            .query_map(params![query.featured, limit], |r| r.get::<_, i64>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn get(&self, id: ProductId) -> Result<Option<Product>> {
        let conn = self.conn()?;
        let product = conn
            .query_row(
                "SELECT id, name, featured, created_at FROM products WHERE id = ?1",
                params![id],
                row_to_product,
            )
            .optional()?;
        product.transpose()
    }

    fn save(&self, product: &Product) -> Result<()> {
        let conn = self.conn()?;
        let n = conn.execute(
            "UPDATE products SET name = ?1, featured = ?2 WHERE id = ?3",
            params![product.name, product.featured, product.id],
        )?;
        if n == 0 {
            return Err(SpotlightError::ProductNotFound(product.id));
        }
        Ok(())
    }
}

/// Row mapper. The outer error is SQLite's, the inner one a bad timestamp.
fn row_to_product(r: &rusqlite::Row<'_>) -> rusqlite::Result<Result<Product>> {
    let id: i64 = r.get(0)?;
    let name: String = r.get(1)?;
    let featured: bool = r.get(2)?;
    let micros: i64 = r.get(3)?;
    Ok(DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| SpotlightError::Catalog(format!("product {id}: bad created_at {micros}")))
        .map(|created_at| Product {
            id,
            name,
            featured,
            created_at,
        }))
}
