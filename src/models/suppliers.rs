//! Suppliers data access

use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::types::{NewSupplier, Supplier};
use crate::error::{InventoryError, InventoryResult};

/// Data-access object for the `suppliers` table
pub struct Suppliers<'a> {
    conn: &'a Connection,
}

impl<'a> Suppliers<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Supplier> {
        Ok(Supplier {
            id: row.get(0)?,
            company_name: row.get(1)?,
            supplier_name: row.get(2)?,
            email: row.get(3)?,
            phone: row.get(4)?,
        })
    }

    pub fn get_all(&self) -> InventoryResult<Vec<Supplier>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, company_name, supplier_name, email, phone FROM suppliers ORDER BY id",
        )?;
        let suppliers = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                error!("Database error: {}", e);
                InventoryError::from(e)
            })?;
        Ok(suppliers)
    }

    pub fn get_by_id(&self, id: i64) -> InventoryResult<Option<Supplier>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, company_name, supplier_name, email, phone FROM suppliers WHERE id = ?1",
                params![id],
                Self::from_row,
            )
            .optional()?)
    }

    /// Lookup by company name ignoring case. An exact match wins when a
    /// database created before names were case-insensitive holds both.
    pub fn find_by_company(&self, company_name: &str) -> InventoryResult<Option<Supplier>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, company_name, supplier_name, email, phone FROM suppliers
                 WHERE company_name = ?1 COLLATE NOCASE
                 ORDER BY company_name = ?1 COLLATE BINARY DESC, id
                 LIMIT 1",
                params![company_name],
                Self::from_row,
            )
            .optional()?)
    }

    pub fn add(&self, supplier: &NewSupplier) -> InventoryResult<i64> {
        self.conn
            .execute(
                "INSERT INTO suppliers (company_name, supplier_name, email, phone) VALUES (?1, ?2, ?3, ?4)",
                params![
                    supplier.company_name,
                    supplier.supplier_name,
                    supplier.email,
                    supplier.phone
                ],
            )
            .map_err(|e| {
                error!("Integrity error: {}", e);
                InventoryError::from_write("Supplier", e)
            })?;

        let id = self.conn.last_insert_rowid();
        info!("Added supplier: {} ({})", supplier.company_name, id);
        Ok(id)
    }

    pub fn edit(&self, id: i64, supplier: &NewSupplier) -> InventoryResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE suppliers SET company_name = ?1, supplier_name = ?2, email = ?3, phone = ?4 WHERE id = ?5",
                params![
                    supplier.company_name,
                    supplier.supplier_name,
                    supplier.email,
                    supplier.phone,
                    id
                ],
            )
            .map_err(|e| {
                error!("Integrity error: {}", e);
                InventoryError::from_write("Supplier", e)
            })?;

        if changed == 0 {
            return Err(InventoryError::NotFound { entity: "Supplier", id });
        }
        info!("Updated supplier: {} ({})", supplier.company_name, id);
        Ok(())
    }

    /// Delete a supplier. Its products keep existing without a supplier.
    pub fn delete(&self, id: i64) -> InventoryResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM suppliers WHERE id = ?1", params![id])
            .map_err(|e| {
                error!("Database error: {}", e);
                InventoryError::from_write("Supplier", e)
            })?;

        if changed == 0 {
            return Err(InventoryError::NotFound { entity: "Supplier", id });
        }
        info!("Deleted supplier: {}", id);
        Ok(())
    }
}
