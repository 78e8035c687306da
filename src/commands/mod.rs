//! Tab Commands
//!
//! One module per tab. Each lists its rows, validates its entry form and
//! runs the add/edit/delete actions, returning the refreshed listing.

pub mod alerts;
pub mod customers;
pub mod inventory;
pub mod sales;
pub mod suppliers;

use serde::Serialize;
use std::fmt;

use crate::error::InventoryError;

/// Form action performed by a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Edit,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Action::Add => "Add",
            Action::Edit => "Edit",
            Action::Delete => "Delete",
        };
        f.write_str(verb)
    }
}

/// Dialog-style message shown when an action fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    /// Turn a failed `action` on `entity` into the message the user sees
    pub fn from_error(entity: &str, action: Action, err: &InventoryError) -> Self {
        let (title, message) = match err {
            InventoryError::Duplicate { .. } => (
                format!("Cannot {} {}", action, entity),
                format!("{} already exists", entity),
            ),
            InventoryError::NotFound { .. } => (
                format!("Cannot {} {}", action, entity),
                format!("{} not found", entity),
            ),
            InventoryError::InsufficientStock { .. } => (
                format!("Cannot {} {}", action, entity),
                err.to_string(),
            ),
            InventoryError::Validation(message) => ("Invalid Input".to_string(), message.clone()),
            InventoryError::Cancelled => ("Cancelled".to_string(), "No changes made".to_string()),
            other => ("Database Error".to_string(), other.to_string()),
        };
        Self { title, message }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl std::error::Error for Notice {}

/// Trimmed required text field
pub(crate) fn required(field: &str, value: &str) -> Result<String, InventoryError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InventoryError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}
