//! Database Module
//!
//! Owns the single SQLite connection behind a mutex. Every tab command
//! borrows it for one statement (or one transaction) at a time.

pub mod schema;

use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{InventoryError, InventoryResult};

/// Handle to the inventory database
pub struct Database {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Database {
    /// Open (creating if needed) the database file and initialize the schema
    pub fn open(path: &Path) -> InventoryResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let existed = path.exists();
        let conn = Connection::open(path)?;
        Self::prepare(&conn)?;

        if existed {
            debug!("Opened existing database at {:?}", path);
        } else {
            info!("Created database at {:?}", path);
        }

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> InventoryResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::prepare(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    fn prepare(conn: &Connection) -> InventoryResult<()> {
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            ",
        )?;
        schema::init_schema(conn)?;
        Ok(())
    }

    /// Run `f` with the connection locked
    pub fn with_conn<F, T>(&self, f: F) -> InventoryResult<T>
    where
        F: FnOnce(&Connection) -> InventoryResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|_| InventoryError::Database("connection lock poisoned".to_string()))?;
        f(&guard)
    }

    /// Database file path (None for in-memory)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("inventory.db");

        let db = Database::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(db.path(), Some(path.as_path()));
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.db");

        {
            let db = Database::open(&path).unwrap();
            db.with_conn(|conn| {
                conn.execute("INSERT INTO customers (name) VALUES ('Ada')", [])?;
                Ok(())
            })
            .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::open_in_memory().unwrap();
        let enabled: i64 = db
            .with_conn(|conn| {
                Ok(conn.pragma_query_value(None, "foreign_keys", |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
