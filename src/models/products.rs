//! Products data access

use chrono::Utc;
use log::{debug, error, info};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::types::{NewProduct, Product};
use crate::error::{InventoryError, InventoryResult};

const SELECT_PRODUCTS: &str = "SELECT p.id, p.supplier_id, p.name, p.price, p.stock, p.updated_at, s.company_name
     FROM products p LEFT JOIN suppliers s ON s.id = p.supplier_id";

/// Data-access object for the `products` table
pub struct Products<'a> {
    conn: &'a Connection,
}

impl<'a> Products<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
        Ok(Product {
            id: row.get(0)?,
            supplier_id: row.get(1)?,
            name: row.get(2)?,
            price: row.get(3)?,
            stock: row.get(4)?,
            updated_at: row.get(5)?,
            supplier: row.get(6)?,
        })
    }

    fn query(&self, sql: &str, params: impl rusqlite::Params) -> InventoryResult<Vec<Product>> {
        let mut stmt = self.conn.prepare(sql)?;
        let products = stmt
            .query_map(params, Self::from_row)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                error!("Failed to read products: {}", e);
                InventoryError::from(e)
            })?;
        debug!("Fetched {} products", products.len());
        Ok(products)
    }

    /// All products in insertion order
    pub fn get_all(&self) -> InventoryResult<Vec<Product>> {
        self.query(&format!("{} ORDER BY p.id", SELECT_PRODUCTS), [])
    }

    pub fn get_by_id(&self, id: i64) -> InventoryResult<Option<Product>> {
        self.conn
            .query_row(
                &format!("{} WHERE p.id = ?1", SELECT_PRODUCTS),
                params![id],
                Self::from_row,
            )
            .optional()
            .map_err(|e| {
                error!("Failed to read product {}: {}", id, e);
                InventoryError::from(e)
            })
    }

    /// Lookup by name ignoring case, preferring an exact match
    pub fn find_by_name(&self, name: &str) -> InventoryResult<Option<Product>> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "{} WHERE p.name = ?1 COLLATE NOCASE
                     ORDER BY p.name = ?1 COLLATE BINARY DESC, p.id LIMIT 1",
                    SELECT_PRODUCTS
                ),
                params![name],
                Self::from_row,
            )
            .optional()?)
    }

    /// Products whose stock is below `threshold`, lowest stock first
    pub fn get_low_stock(&self, threshold: i64) -> InventoryResult<Vec<Product>> {
        self.query(
            &format!(
                "{} WHERE p.stock < ?1 ORDER BY p.stock ASC, p.id",
                SELECT_PRODUCTS
            ),
            params![threshold],
        )
    }

    /// Product names for the sales form, alphabetical
    pub fn names(&self) -> InventoryResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM products ORDER BY name COLLATE NOCASE")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Insert a product and return its id
    pub fn add(&self, product: &NewProduct) -> InventoryResult<i64> {
        self.conn
            .execute(
                "INSERT INTO products (name, price, stock, supplier_id, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    product.name,
                    product.price,
                    product.stock,
                    product.supplier_id,
                    Utc::now()
                ],
            )
            .map_err(|e| {
                error!("Failed to add product {}: {}", product.name, e);
                InventoryError::from_write("Product", e)
            })?;

        let id = self.conn.last_insert_rowid();
        info!("Added product: {} ({})", product.name, id);
        Ok(id)
    }

    pub fn edit(&self, id: i64, product: &NewProduct) -> InventoryResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE products SET name = ?1, price = ?2, stock = ?3, supplier_id = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![
                    product.name,
                    product.price,
                    product.stock,
                    product.supplier_id,
                    Utc::now(),
                    id
                ],
            )
            .map_err(|e| {
                error!("Failed to edit product {}: {}", id, e);
                InventoryError::from_write("Product", e)
            })?;

        if changed == 0 {
            return Err(InventoryError::NotFound { entity: "Product", id });
        }
        info!("Updated product: {} ({})", product.name, id);
        Ok(())
    }

    /// Delete a product. Its sales go with it.
    pub fn delete(&self, id: i64) -> InventoryResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1", params![id])
            .map_err(|e| {
                error!("Failed to delete product {}: {}", id, e);
                InventoryError::from_write("Product", e)
            })?;

        if changed == 0 {
            return Err(InventoryError::NotFound { entity: "Product", id });
        }
        info!("Deleted product: {}", id);
        Ok(())
    }
}
