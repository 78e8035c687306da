//! Supplier Commands

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::required;
use crate::db::Database;
use crate::error::{InventoryError, InventoryResult};
use crate::models::{NewSupplier, Supplier, Suppliers};
use crate::table::{self, TableRow};

/// Supplier row for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRow {
    pub id: i64,
    pub company: String,
    pub supplier: String,
    pub email: String,
    pub contact: String,
}

impl From<&Supplier> for SupplierRow {
    fn from(supplier: &Supplier) -> Self {
        Self {
            id: supplier.id,
            company: supplier.company_name.clone(),
            supplier: supplier.supplier_name.clone(),
            email: supplier.email.clone(),
            contact: supplier.phone.clone(),
        }
    }
}

impl TableRow for SupplierRow {
    const COLUMNS: &'static [&'static str] = &["ID", "Company", "Supplier", "Email", "Contact"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.company.clone(),
            self.supplier.clone(),
            self.email.clone(),
            self.contact.clone(),
        ]
    }
}

/// Supplier entry form, as typed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierForm {
    pub company: String,
    pub supplier: String,
    pub email: String,
    pub contact: String,
}

/// Mobile number: 11 digits starting with `09`
fn contact_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^09\d{9}$").expect("valid contact pattern"))
}

pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

pub fn is_valid_contact(contact: &str) -> bool {
    contact_pattern().is_match(contact)
}

impl SupplierForm {
    pub fn validate(&self) -> InventoryResult<NewSupplier> {
        let company_name = required("Company", &self.company)?;
        let supplier_name = required("Supplier", &self.supplier)?;
        let email = required("Email", &self.email)?;
        let phone = required("Contact", &self.contact)?;

        match (is_valid_email(&email), is_valid_contact(&phone)) {
            (true, true) => {}
            (false, false) => {
                return Err(InventoryError::Validation(
                    "Invalid email and contact number".to_string(),
                ))
            }
            (false, true) => {
                return Err(InventoryError::Validation("Invalid email".to_string()))
            }
            (true, false) => {
                return Err(InventoryError::Validation(
                    "Invalid contact number".to_string(),
                ))
            }
        }

        Ok(NewSupplier {
            company_name,
            supplier_name,
            email,
            phone,
        })
    }
}

impl From<&SupplierRow> for SupplierForm {
    fn from(row: &SupplierRow) -> Self {
        Self {
            company: row.company.clone(),
            supplier: row.supplier.clone(),
            email: row.email.clone(),
            contact: row.contact.clone(),
        }
    }
}

pub fn list_suppliers(db: &Database, search: Option<&str>) -> InventoryResult<Vec<SupplierRow>> {
    let rows: Vec<SupplierRow> = db.with_conn(|conn| {
        Ok(Suppliers::new(conn)
            .get_all()?
            .iter()
            .map(SupplierRow::from)
            .collect())
    })?;
    Ok(table::search(rows, search.unwrap_or_default()))
}

pub fn add_supplier(db: &Database, form: &SupplierForm) -> InventoryResult<Vec<SupplierRow>> {
    let supplier = form.validate()?;
    db.with_conn(|conn| Suppliers::new(conn).add(&supplier))?;
    list_suppliers(db, None)
}

pub fn edit_supplier(
    db: &Database,
    id: i64,
    form: &SupplierForm,
) -> InventoryResult<Vec<SupplierRow>> {
    let supplier = form.validate()?;
    db.with_conn(|conn| Suppliers::new(conn).edit(id, &supplier))?;
    list_suppliers(db, None)
}

pub fn delete_supplier(db: &Database, id: i64) -> InventoryResult<Vec<SupplierRow>> {
    db.with_conn(|conn| Suppliers::new(conn).delete(id))?;
    list_suppliers(db, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(company: &str, email: &str, contact: &str) -> SupplierForm {
        SupplierForm {
            company: company.to_string(),
            supplier: "Lena Cruz".to_string(),
            email: email.to_string(),
            contact: contact.to_string(),
        }
    }

    #[test]
    fn test_contact_rule() {
        assert!(is_valid_contact("09171234567"));
        assert!(!is_valid_contact("0917123456"));
        assert!(!is_valid_contact("08171234567"));
        assert!(!is_valid_contact("0917123456a"));
    }

    #[test]
    fn test_email_rule() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("ab.co"));
        assert!(!is_valid_email("a@bco"));
    }

    #[test]
    fn test_validation_messages() {
        let err = form("X", "bad", "123").validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Invalid email and contact number");

        let err = form("X", "bad", "09171234567").validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Invalid email");

        let err = form("X", "a@b.co", "123").validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Invalid contact number");

        let err = form("", "a@b.co", "09171234567").validate().unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));
    }

    #[test]
    fn test_add_edit_delete() {
        let db = Database::open_in_memory().unwrap();

        let rows = add_supplier(&db, &form("CitrusWorld", "hi@citrus.world", "09171234567")).unwrap();
        assert_eq!(rows.len(), 1);
        let id = rows[0].id;

        assert!(matches!(
            add_supplier(&db, &form("CitrusWorld", "x@y.z", "09170000000")),
            Err(InventoryError::Duplicate { .. })
        ));

        let mut edited = SupplierForm::from(&rows[0]);
        edited.contact = "09998887777".to_string();
        let rows = edit_supplier(&db, id, &edited).unwrap();
        assert_eq!(rows[0].contact, "09998887777");

        assert_eq!(list_suppliers(&db, Some("citrus")).unwrap().len(), 1);
        assert!(list_suppliers(&db, Some("tropical")).unwrap().is_empty());

        assert!(delete_supplier(&db, id).unwrap().is_empty());
    }
}
