//! Configuration
//!
//! Resolves where the database lives and the low-stock threshold.
//! Precedence: command-line flag, `INVENTORY_DB`, config file, defaults.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{InventoryError, InventoryResult};

/// Environment variable overriding the database location
pub const DB_ENV_VAR: &str = "INVENTORY_DB";

/// Products with stock below this show up under Alerts
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

const APP_DIR: &str = "inventory";
const DB_FILE: &str = "database.db";
const CONFIG_FILE: &str = "config.toml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Stock level under which a product is reported as low
    pub low_stock_threshold: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> InventoryResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file. A missing file yields the defaults.
    pub fn load_file(path: &Path) -> InventoryResult<Self> {
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            InventoryError::InvalidConfig(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Resolve the effective configuration.
    ///
    /// `config_path` defaults to `<config_dir>/inventory/config.toml`;
    /// `db_override` comes from the command line and wins over everything.
    pub fn resolve(
        config_path: Option<&Path>,
        db_override: Option<&Path>,
    ) -> InventoryResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_file(path)?,
            None => match default_config_path() {
                Some(path) => Self::load_file(&path)?,
                None => Self::default(),
            },
        };

        if let Some(path) = db_override {
            config.database_path = path.to_path_buf();
        } else if let Some(path) = std::env::var_os(DB_ENV_VAR).filter(|v| !v.is_empty()) {
            config.database_path = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> InventoryResult<()> {
        if self.low_stock_threshold <= 0 {
            return Err(InventoryError::InvalidConfig(format!(
                "low_stock_threshold must be positive, got {}",
                self.low_stock_threshold
            )));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(InventoryError::InvalidConfig(
                "database_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// `<data_dir>/inventory/database.db`, or `./database.db` when the
/// platform has no data directory.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR).join(DB_FILE))
        .unwrap_or_else(|| PathBuf::from(DB_FILE))
}

/// `<config_dir>/inventory/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.low_stock_threshold, 10);
        assert!(config.database_path.ends_with("database.db"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("low_stock_threshold = 25\n").unwrap();
        assert_eq!(config.low_stock_threshold, 25);
        assert_eq!(config.database_path, default_database_path());
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        let result = Config::from_toml("low_stock_threshold = 0\n");
        assert!(matches!(result, Err(InventoryError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_flag_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "database_path = \"/tmp/from-file.db\"\nlow_stock_threshold = 5\n",
        )
        .unwrap();

        let from_file = Config::load_file(&config_path).unwrap();
        assert_eq!(from_file.database_path, PathBuf::from("/tmp/from-file.db"));

        let flag = dir.path().join("flag.db");
        let resolved = Config::resolve(Some(&config_path), Some(&flag)).unwrap();
        assert_eq!(resolved.database_path, flag);
        assert_eq!(resolved.low_stock_threshold, 5);
    }

    #[test]
    fn test_malformed_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "low_stock_threshold = \"many\"\n").unwrap();

        let err = Config::load_file(&config_path).unwrap_err().to_string();
        assert!(err.contains("config.toml"));
        assert_eq!(err.matches("Invalid configuration").count(), 1);
    }
}
