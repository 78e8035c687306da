//! Sales Commands
//!
//! Sales list ordered by quantity sold, plus the sale entry form whose
//! product picker offers the existing product names.

use serde::{Deserialize, Serialize};

use super::required;
use crate::db::Database;
use crate::error::{InventoryError, InventoryResult};
use crate::models::{Products, Sale, Sales};
use crate::table::{self, TableRow};

/// Picker entry shown when there are no products yet
pub const NO_PRODUCTS: &str = "No Products";

/// Sale row for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRow {
    pub id: i64,
    pub product: String,
    pub sold: i64,
    pub supplier: String,
}

impl From<&Sale> for SaleRow {
    fn from(sale: &Sale) -> Self {
        Self {
            id: sale.id,
            product: sale.product_name.clone(),
            sold: sale.product_sold,
            supplier: sale.supplier.clone().unwrap_or_default(),
        }
    }
}

impl TableRow for SaleRow {
    const COLUMNS: &'static [&'static str] = &["ID", "Product", "Sold", "Supplier"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.product.clone(),
            self.sold.to_string(),
            self.supplier.clone(),
        ]
    }
}

/// Sale entry form, as typed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleForm {
    pub product: String,
    pub sold: String,
}

impl SaleForm {
    fn sold(&self) -> InventoryResult<i64> {
        self.sold
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| InventoryError::Validation("Invalid sold number".to_string()))
    }
}

/// Choices for the product picker
pub fn product_options(db: &Database) -> InventoryResult<Vec<String>> {
    let names = db.with_conn(|conn| Products::new(conn).names())?;
    if names.is_empty() {
        return Ok(vec![NO_PRODUCTS.to_string()]);
    }
    Ok(names)
}

pub fn list_sales(db: &Database, search: Option<&str>) -> InventoryResult<Vec<SaleRow>> {
    let rows: Vec<SaleRow> = db.with_conn(|conn| {
        Ok(Sales::new(conn).get_all()?.iter().map(SaleRow::from).collect())
    })?;
    Ok(table::search(rows, search.unwrap_or_default()))
}

/// Record a sale of the chosen product
pub fn add_sale(db: &Database, form: &SaleForm) -> InventoryResult<Vec<SaleRow>> {
    let product = required("Product", &form.product)?;
    if product == NO_PRODUCTS {
        return Err(InventoryError::Validation("No product selected".to_string()));
    }
    let sold = form.sold()?;

    db.with_conn(|conn| {
        let found = Products::new(conn).find_by_name(&product)?.ok_or_else(|| {
            InventoryError::Validation(format!("Unknown product: {}", product))
        })?;
        Sales::new(conn).add(found.id, sold)
    })?;
    list_sales(db, None)
}

/// Change the quantity of the selected sale
pub fn edit_sale(db: &Database, id: i64, form: &SaleForm) -> InventoryResult<Vec<SaleRow>> {
    let sold = form.sold()?;
    db.with_conn(|conn| Sales::new(conn).edit(id, sold))?;
    list_sales(db, None)
}

pub fn delete_sale(db: &Database, id: i64) -> InventoryResult<Vec<SaleRow>> {
    db.with_conn(|conn| Sales::new(conn).delete(id))?;
    list_sales(db, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::inventory::{add_item, list_inventory, ProductForm};

    fn sale(product: &str, sold: &str) -> SaleForm {
        SaleForm {
            product: product.to_string(),
            sold: sold.to_string(),
        }
    }

    fn db_with_products() -> Database {
        let db = Database::open_in_memory().unwrap();
        for (name, stock) in [("Apple", "100"), ("Banana", "150")] {
            add_item(
                &db,
                &ProductForm {
                    product: name.to_string(),
                    stock: stock.to_string(),
                    price: "1.00".to_string(),
                    supplier: String::new(),
                },
            )
            .unwrap();
        }
        db
    }

    #[test]
    fn test_product_options_placeholder() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(product_options(&db).unwrap(), vec![NO_PRODUCTS]);

        let db = db_with_products();
        assert_eq!(product_options(&db).unwrap(), vec!["Apple", "Banana"]);
    }

    #[test]
    fn test_add_sale_moves_stock() {
        let db = db_with_products();
        let rows = add_sale(&db, &sale("Banana", "30")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product, "Banana");
        assert_eq!(rows[0].sold, 30);

        let inventory = list_inventory(&db, Some("banana")).unwrap();
        assert_eq!(inventory[0].stock, 120);
    }

    #[test]
    fn test_product_picked_ignoring_case() {
        let db = db_with_products();
        let rows = add_sale(&db, &sale("  banana ", "3")).unwrap();
        assert_eq!(rows[0].product, "Banana");
        assert!(matches!(
            add_sale(&db, &sale("Cherry", "1")),
            Err(InventoryError::Validation(_))
        ));
    }

    #[test]
    fn test_invalid_sold_number() {
        let db = db_with_products();
        for bad in ["", "ten", "0", "-4"] {
            let err = add_sale(&db, &sale("Apple", bad)).unwrap_err();
            assert_eq!(err.to_string(), "Invalid input: Invalid sold number");
        }
        assert!(matches!(
            add_sale(&db, &sale(NO_PRODUCTS, "1")),
            Err(InventoryError::Validation(_))
        ));
    }

    #[test]
    fn test_edit_delete_and_order() {
        let db = db_with_products();
        add_sale(&db, &sale("Apple", "5")).unwrap();
        let rows = add_sale(&db, &sale("Banana", "12")).unwrap();
        assert_eq!(rows[0].product, "Banana");

        let apple = rows.iter().find(|r| r.product == "Apple").unwrap().id;
        let rows = edit_sale(&db, apple, &sale("Apple", "20")).unwrap();
        assert_eq!(rows[0].product, "Apple");
        assert_eq!(rows[0].sold, 20);

        let rows = delete_sale(&db, apple).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(matches!(
            edit_sale(&db, apple, &sale("Apple", "1")),
            Err(InventoryError::NotFound { entity: "Sale", .. })
        ));
    }
}
