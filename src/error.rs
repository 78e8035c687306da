//! Inventory Error Types
//!
//! Error handling shared by the data-access layer and the tab commands

use thiserror::Error;

/// Inventory-specific errors
#[derive(Error, Debug)]
pub enum InventoryError {
    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("{entity} already exists: {detail}")]
    Duplicate { entity: &'static str, detail: String },

    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    // Form errors
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Insufficient stock for {product}: {available} available, {requested} requested")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl InventoryError {
    /// Classify a rusqlite error raised while writing `entity`.
    pub fn from_write(entity: &'static str, err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref failure, ref message) = err {
            let detail = message.clone().unwrap_or_else(|| err.to_string());
            match failure.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return InventoryError::Duplicate { entity, detail };
                }
                _ if failure.code == rusqlite::ErrorCode::ConstraintViolation => {
                    return InventoryError::Constraint(detail);
                }
                _ => {}
            }
        }
        InventoryError::Database(err.to_string())
    }

    /// True for errors caused by user input rather than the database.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            InventoryError::Duplicate { .. }
                | InventoryError::NotFound { .. }
                | InventoryError::Validation(_)
                | InventoryError::InsufficientStock { .. }
                | InventoryError::Cancelled
        )
    }
}

impl From<rusqlite::Error> for InventoryError {
    fn from(err: rusqlite::Error) -> Self {
        InventoryError::Database(err.to_string())
    }
}

impl From<std::io::Error> for InventoryError {
    fn from(err: std::io::Error) -> Self {
        InventoryError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for InventoryError {
    fn from(err: toml::de::Error) -> Self {
        InventoryError::InvalidConfig(err.to_string())
    }
}

/// Result type alias for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_violation_is_duplicate() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE t (name TEXT UNIQUE)", []).unwrap();
        conn.execute("INSERT INTO t (name) VALUES ('a')", []).unwrap();
        let err = conn
            .execute("INSERT INTO t (name) VALUES ('a')", [])
            .unwrap_err();

        let classified = InventoryError::from_write("Thing", err);
        assert!(matches!(classified, InventoryError::Duplicate { entity: "Thing", .. }));
        assert!(classified.is_user_error());
    }

    #[test]
    fn test_check_violation_is_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE t (n INTEGER CHECK(n > 0))", []).unwrap();
        let err = conn.execute("INSERT INTO t (n) VALUES (0)", []).unwrap_err();

        let classified = InventoryError::from_write("Thing", err);
        assert!(matches!(classified, InventoryError::Constraint(_)));
        assert!(!classified.is_user_error());
    }

    #[test]
    fn test_not_found_message() {
        let err = InventoryError::NotFound { entity: "Supplier", id: 7 };
        assert_eq!(err.to_string(), "Supplier not found: 7");
    }
}
