//! Row types for the entity tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product row, joined with its supplier's company name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub supplier_id: Option<i64>,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub updated_at: DateTime<Utc>,
    /// `suppliers.company_name`, when the product has a supplier
    pub supplier: Option<String>,
}

impl Product {
    /// Stock value at the current price
    pub fn total_value(&self) -> f64 {
        self.stock as f64 * self.price
    }
}

/// Fields written by `Products::add` / `Products::edit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub supplier_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub company_name: String,
    pub supplier_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSupplier {
    pub company_name: String,
    pub supplier_name: String,
    pub email: String,
    pub phone: String,
}

/// A sale row, joined with product name and supplier company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub product_sold: i64,
    pub supplier: Option<String>,
    pub sold_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_value() {
        let product = Product {
            id: 1,
            supplier_id: None,
            name: "Apple".to_string(),
            price: 1.99,
            stock: 100,
            updated_at: Utc::now(),
            supplier: None,
        };
        assert!((product.total_value() - 199.0).abs() < 1e-9);
    }
}
