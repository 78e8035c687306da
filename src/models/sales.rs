//! Sales data access
//!
//! Recording, changing or removing a sale moves the product's stock by
//! the same quantity inside one transaction.

use chrono::Utc;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::types::Sale;
use crate::error::{InventoryError, InventoryResult};

const SELECT_SALES: &str = "SELECT sa.id, sa.product_id, p.name, sa.product_sold, s.company_name, sa.sold_at
     FROM sales sa
     JOIN products p ON p.id = sa.product_id
     LEFT JOIN suppliers s ON s.id = p.supplier_id";

/// Data-access object for the `sales` table
pub struct Sales<'a> {
    conn: &'a Connection,
}

impl<'a> Sales<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Sale> {
        Ok(Sale {
            id: row.get(0)?,
            product_id: row.get(1)?,
            product_name: row.get(2)?,
            product_sold: row.get(3)?,
            supplier: row.get(4)?,
            sold_at: row.get(5)?,
        })
    }

    /// All sales, largest quantity first
    pub fn get_all(&self) -> InventoryResult<Vec<Sale>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} ORDER BY sa.product_sold DESC, sa.id",
            SELECT_SALES
        ))?;
        let sales = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                error!("Error: {}", e);
                InventoryError::from(e)
            })?;
        Ok(sales)
    }

    pub fn get_by_id(&self, id: i64) -> InventoryResult<Option<Sale>> {
        Ok(self
            .conn
            .query_row(
                &format!("{} WHERE sa.id = ?1", SELECT_SALES),
                params![id],
                Self::from_row,
            )
            .optional()?)
    }

    /// Record a sale of `sold` units and take them out of stock
    pub fn add(&self, product_id: i64, sold: i64) -> InventoryResult<i64> {
        ensure_positive(sold)?;

        let tx = self.conn.unchecked_transaction()?;
        let (name, stock) = product_stock(&tx, product_id)?;
        if stock < sold {
            return Err(InventoryError::InsufficientStock {
                product: name,
                available: stock,
                requested: sold,
            });
        }

        tx.execute(
            "INSERT INTO sales (product_id, product_sold, sold_at) VALUES (?1, ?2, ?3)",
            params![product_id, sold, Utc::now()],
        )
        .map_err(|e| {
            error!("Error: {}", e);
            InventoryError::from_write("Sale", e)
        })?;
        let id = tx.last_insert_rowid();
        adjust_stock(&tx, product_id, -sold)?;
        tx.commit()?;

        info!("Recorded sale {}: {} x {}", id, sold, name);
        Ok(id)
    }

    /// Change the quantity of a sale; stock absorbs the difference
    pub fn edit(&self, id: i64, sold: i64) -> InventoryResult<()> {
        ensure_positive(sold)?;

        let tx = self.conn.unchecked_transaction()?;
        let (product_id, previous) = sale_quantity(&tx, id)?;
        let (name, stock) = product_stock(&tx, product_id)?;
        let delta = sold - previous;
        if delta > 0 && delta > stock {
            return Err(InventoryError::InsufficientStock {
                product: name,
                available: stock,
                requested: delta,
            });
        }

        tx.execute(
            "UPDATE sales SET product_sold = ?1 WHERE id = ?2",
            params![sold, id],
        )
        .map_err(|e| {
            error!("Error: {}", e);
            InventoryError::from_write("Sale", e)
        })?;
        adjust_stock(&tx, product_id, -delta)?;
        tx.commit()?;

        info!("Updated sale {}: {} -> {}", id, previous, sold);
        Ok(())
    }

    /// Remove a sale and put its units back in stock
    pub fn delete(&self, id: i64) -> InventoryResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let (product_id, previous) = sale_quantity(&tx, id)?;

        tx.execute("DELETE FROM sales WHERE id = ?1", params![id])
            .map_err(|e| {
                error!("Error: {}", e);
                InventoryError::from_write("Sale", e)
            })?;
        adjust_stock(&tx, product_id, previous)?;
        tx.commit()?;

        info!("Deleted sale {}", id);
        Ok(())
    }
}

fn ensure_positive(sold: i64) -> InventoryResult<()> {
    if sold <= 0 {
        return Err(InventoryError::Validation(format!(
            "sold quantity must be positive, got {}",
            sold
        )));
    }
    Ok(())
}

fn product_stock(conn: &Connection, product_id: i64) -> InventoryResult<(String, i64)> {
    conn.query_row(
        "SELECT name, stock FROM products WHERE id = ?1",
        params![product_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()?
    .ok_or(InventoryError::NotFound {
        entity: "Product",
        id: product_id,
    })
}

fn sale_quantity(conn: &Connection, id: i64) -> InventoryResult<(i64, i64)> {
    conn.query_row(
        "SELECT product_id, product_sold FROM sales WHERE id = ?1",
        params![id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()?
    .ok_or(InventoryError::NotFound { entity: "Sale", id })
}

/// Move stock by `delta`, refusing results outside the INTEGER range
fn adjust_stock(conn: &Connection, product_id: i64, delta: i64) -> InventoryResult<()> {
    let (name, stock) = product_stock(conn, product_id)?;
    let updated = stock.checked_add(delta).ok_or_else(|| {
        error!("Stock overflow for {}: {} + {}", name, stock, delta);
        InventoryError::Validation(format!("Stock for {} is out of range", name))
    })?;
    conn.execute(
        "UPDATE products SET stock = ?1, updated_at = ?2 WHERE id = ?3",
        params![updated, Utc::now(), product_id],
    )?;
    Ok(())
}
