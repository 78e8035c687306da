//! Customer Commands

use serde::{Deserialize, Serialize};

use super::required;
use crate::db::Database;
use crate::error::InventoryResult;
use crate::models::{Customer, Customers};
use crate::table::{self, TableRow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id: i64,
    pub name: String,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
        }
    }
}

impl TableRow for CustomerRow {
    const COLUMNS: &'static [&'static str] = &["ID", "Name"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone()]
    }
}

pub fn list_customers(db: &Database, search: Option<&str>) -> InventoryResult<Vec<CustomerRow>> {
    let rows: Vec<CustomerRow> = db.with_conn(|conn| {
        Ok(Customers::new(conn)
            .get_all()?
            .iter()
            .map(CustomerRow::from)
            .collect())
    })?;
    Ok(table::search(rows, search.unwrap_or_default()))
}

pub fn add_customer(db: &Database, name: &str) -> InventoryResult<Vec<CustomerRow>> {
    let name = required("Name", name)?;
    db.with_conn(|conn| Customers::new(conn).add(&name))?;
    list_customers(db, None)
}

pub fn edit_customer(db: &Database, id: i64, name: &str) -> InventoryResult<Vec<CustomerRow>> {
    let name = required("Name", name)?;
    db.with_conn(|conn| Customers::new(conn).edit(id, &name))?;
    list_customers(db, None)
}

pub fn delete_customer(db: &Database, id: i64) -> InventoryResult<Vec<CustomerRow>> {
    db.with_conn(|conn| Customers::new(conn).delete(id))?;
    list_customers(db, None)
}
