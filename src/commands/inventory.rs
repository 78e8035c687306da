//! Inventory Commands
//!
//! Product list with stock value, plus the product entry form.

use log::debug;
use serde::{Deserialize, Serialize};

use super::required;
use crate::db::Database;
use crate::error::{InventoryError, InventoryResult};
use crate::models::{NewProduct, Product, Products, Suppliers};
use crate::table::{self, format_money, TableRow};

/// Inventory row for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub id: i64,
    pub product: String,
    pub stock: i64,
    pub price: String,
    pub total: String,
    pub updated: String,
    pub supplier: String,
}

impl From<&Product> for InventoryRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            product: product.name.clone(),
            stock: product.stock,
            price: format_money(product.price),
            total: format_money(product.total_value()),
            updated: product.updated_at.format("%Y-%m-%d").to_string(),
            supplier: product.supplier.clone().unwrap_or_default(),
        }
    }
}

impl TableRow for InventoryRow {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Product", "Stock", "Price", "Total", "Updated", "Supplier"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.product.clone(),
            self.stock.to_string(),
            self.price.clone(),
            self.total.clone(),
            self.updated.clone(),
            self.supplier.clone(),
        ]
    }
}

/// Product entry form, as typed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductForm {
    pub product: String,
    pub stock: String,
    pub price: String,
    /// Supplier company name; blank for none
    pub supplier: String,
}

impl ProductForm {
    /// Check the fields and resolve the supplier name to its id
    pub fn validate(&self, suppliers: &Suppliers<'_>) -> InventoryResult<NewProduct> {
        let name = required("Product", &self.product)?;

        let stock = self
            .stock
            .trim()
            .parse::<i64>()
            .map_err(|_| InventoryError::Validation("Invalid stock number".to_string()))?;

        let price = self
            .price
            .trim()
            .trim_start_matches('$')
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| InventoryError::Validation("Invalid price".to_string()))?;

        let supplier = self.supplier.trim();
        let supplier_id = if supplier.is_empty() {
            None
        } else {
            let found = suppliers.find_by_company(supplier)?.ok_or_else(|| {
                InventoryError::Validation(format!("Unknown supplier: {}", supplier))
            })?;
            Some(found.id)
        };

        Ok(NewProduct {
            name,
            price,
            stock,
            supplier_id,
        })
    }
}

impl From<&Product> for ProductForm {
    /// Prefill the form from the stored product, keeping the exact price
    fn from(product: &Product) -> Self {
        Self {
            product: product.name.clone(),
            stock: product.stock.to_string(),
            price: product.price.to_string(),
            supplier: product.supplier.clone().unwrap_or_default(),
        }
    }
}

/// Form for editing product `id`, filled with its current values
pub fn product_form(db: &Database, id: i64) -> InventoryResult<ProductForm> {
    db.with_conn(|conn| Products::new(conn).get_by_id(id))?
        .map(|product| ProductForm::from(&product))
        .ok_or(InventoryError::NotFound {
            entity: "Product",
            id,
        })
}

/// List products, optionally filtered by a search term
pub fn list_inventory(db: &Database, search: Option<&str>) -> InventoryResult<Vec<InventoryRow>> {
    let rows: Vec<InventoryRow> = db.with_conn(|conn| {
        Ok(Products::new(conn)
            .get_all()?
            .iter()
            .map(InventoryRow::from)
            .collect())
    })?;
    debug!("Inventory tab: {} rows", rows.len());
    Ok(table::search(rows, search.unwrap_or_default()))
}

/// Add a product from the form, then return the refreshed list
pub fn add_item(db: &Database, form: &ProductForm) -> InventoryResult<Vec<InventoryRow>> {
    db.with_conn(|conn| {
        let product = form.validate(&Suppliers::new(conn))?;
        Products::new(conn).add(&product)?;
        Ok(())
    })?;
    list_inventory(db, None)
}

/// Overwrite the selected product with the form
pub fn edit_item(db: &Database, id: i64, form: &ProductForm) -> InventoryResult<Vec<InventoryRow>> {
    db.with_conn(|conn| {
        let product = form.validate(&Suppliers::new(conn))?;
        Products::new(conn).edit(id, &product)
    })?;
    list_inventory(db, None)
}

pub fn delete_item(db: &Database, id: i64) -> InventoryResult<Vec<InventoryRow>> {
    db.with_conn(|conn| Products::new(conn).delete(id))?;
    list_inventory(db, None)
}
