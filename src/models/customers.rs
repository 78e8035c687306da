//! Customers data access

use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};

use super::types::Customer;
use crate::error::{InventoryError, InventoryResult};

/// Data-access object for the `customers` table
pub struct Customers<'a> {
    conn: &'a Connection,
}

impl<'a> Customers<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn get_all(&self) -> InventoryResult<Vec<Customer>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM customers ORDER BY id")?;
        let customers = stmt
            .query_map([], |row| {
                Ok(Customer {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(customers)
    }

    pub fn get_by_id(&self, id: i64) -> InventoryResult<Option<Customer>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name FROM customers WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Customer {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?)
    }

    pub fn add(&self, name: &str) -> InventoryResult<i64> {
        self.conn
            .execute("INSERT INTO customers (name) VALUES (?1)", params![name])
            .map_err(|e| {
                error!("Error: {}", e);
                InventoryError::from_write("Customer", e)
            })?;
        let id = self.conn.last_insert_rowid();
        info!("Added customer: {} ({})", name, id);
        Ok(id)
    }

    pub fn edit(&self, id: i64, name: &str) -> InventoryResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE customers SET name = ?1 WHERE id = ?2",
                params![name, id],
            )
            .map_err(|e| {
                error!("Error: {}", e);
                InventoryError::from_write("Customer", e)
            })?;
        if changed == 0 {
            return Err(InventoryError::NotFound { entity: "Customer", id });
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> InventoryResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM customers WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(InventoryError::NotFound { entity: "Customer", id });
        }
        info!("Deleted customer: {}", id);
        Ok(())
    }
}
