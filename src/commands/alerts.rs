//! Alert Commands
//!
//! Read-only view of products under the low-stock threshold.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::Database;
use crate::error::InventoryResult;
use crate::models::{Product, Products};
use crate::table::{self, TableRow};

/// Stock status of an alerted product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Stock at or below zero
    OutOfStock,
    /// Stock positive but under the threshold
    LowStock,
}

impl StockStatus {
    pub fn for_stock(stock: i64) -> Self {
        if stock <= 0 {
            StockStatus::OutOfStock
        } else {
            StockStatus::LowStock
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::OutOfStock => f.write_str("Out of Stock"),
            StockStatus::LowStock => f.write_str("Low Stock"),
        }
    }
}

/// Alert row for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRow {
    pub id: i64,
    pub product: String,
    pub stock: i64,
    pub status: StockStatus,
}

impl From<&Product> for AlertRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            product: product.name.clone(),
            stock: product.stock,
            status: StockStatus::for_stock(product.stock),
        }
    }
}

impl TableRow for AlertRow {
    const COLUMNS: &'static [&'static str] = &["ID", "Product", "Stock", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.product.clone(),
            self.stock.to_string(),
            self.status.to_string(),
        ]
    }
}

/// Products with stock below `threshold`, lowest first
pub fn list_alerts(
    db: &Database,
    threshold: i64,
    search: Option<&str>,
) -> InventoryResult<Vec<AlertRow>> {
    let rows: Vec<AlertRow> = db.with_conn(|conn| {
        Ok(Products::new(conn)
            .get_low_stock(threshold)?
            .iter()
            .map(AlertRow::from)
            .collect())
    })?;
    Ok(table::search(rows, search.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewProduct;

    fn db_with_stock(levels: &[(&str, i64)]) -> Database {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let products = Products::new(conn);
            for (name, stock) in levels {
                products.add(&NewProduct {
                    name: name.to_string(),
                    price: 1.0,
                    stock: *stock,
                    supplier_id: None,
                })?;
            }
            Ok(())
        })
        .unwrap();
        db
    }

    #[test]
    fn test_status_boundaries() {
        assert_eq!(StockStatus::for_stock(-1), StockStatus::OutOfStock);
        assert_eq!(StockStatus::for_stock(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::for_stock(1), StockStatus::LowStock);
        assert_eq!(StockStatus::OutOfStock.to_string(), "Out of Stock");
    }

    #[test]
    fn test_alerts_respect_threshold() {
        let db = db_with_stock(&[("Apple", 100), ("Kiwi", 9), ("Lime", 0), ("Fig", 10)]);

        let rows = list_alerts(&db, 10, None).unwrap();
        let summary: Vec<(&str, StockStatus)> =
            rows.iter().map(|r| (r.product.as_str(), r.status)).collect();
        assert_eq!(
            summary,
            vec![("Lime", StockStatus::OutOfStock), ("Kiwi", StockStatus::LowStock)]
        );

        assert_eq!(list_alerts(&db, 11, None).unwrap().len(), 3);
    }

    #[test]
    fn test_search_matches_status_text() {
        let db = db_with_stock(&[("Kiwi", 3), ("Lime", 0)]);
        let rows = list_alerts(&db, 10, Some("out of")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product, "Lime");
    }
}
