//! Configuration
//!
//! Where state and logs live, plus the seed data used when nothing has been saved yet.
//! Loaded from a JSON file; every field is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, DomainResult, Item};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("shopping_list.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    pub app_name: String,
    pub max_file_bytes: u64,
    pub max_files: usize,
    /// Recent lines kept in memory
    pub buffer_lines: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("logs"),
            app_name: "ShoppingList".to_string(),
            max_file_bytes: 1024 * 1024,
            max_files: 5,
            buffer_lines: 500,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl LoggingConfig {
    pub fn to_logger_config(&self) -> rolling_logger::LoggerConfig {
        rolling_logger::LoggerConfig {
            max_file_bytes: self.max_file_bytes,
            max_files: self.max_files,
            buffer_lines: self.buffer_lines,
            ..rolling_logger::LoggerConfig::new(&self.dir, &self.app_name)
        }
    }
}

/// State used when storage holds nothing usable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub items: Vec<Item>,
    pub categories: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            items: vec![
                Item::new("Apple", 5, 1.5, "Fruits"),
                Item::new("Banana", 3, 0.5, "Fruits"),
            ],
            categories: vec![
                "Fruits".to_string(),
                "Vegetables".to_string(),
                "Cleaning Products".to_string(),
            ],
        }
    }
}

impl Config {
    /// Read a JSON config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> DomainResult<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| DomainError::InvalidInput(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_seed() {
        let config = Config::default();
        assert_eq!(config.seed.items.len(), 2);
        assert_eq!(config.seed.items[0], Item::new("Apple", 5, 1.5, "Fruits"));
        assert_eq!(config.seed.categories, vec!["Fruits", "Vegetables", "Cleaning Products"]);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"storage":{"db_path":"data/list.db"},"logging":{"enabled":false},"seed":{"categories":["Dairy"]}}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.db_path, PathBuf::from("data/list.db"));
        assert!(!config.logging.enabled);
        assert_eq!(config.logging.app_name, "ShoppingList");
        assert_eq!(config.seed.categories, vec!["Dairy"]);
        assert_eq!(config.seed.items, SeedConfig::default().items);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_logger_config_mapping() {
        let logging = LoggingConfig {
            max_files: 2,
            ..LoggingConfig::default()
        };
        let logger = logging.to_logger_config();
        assert_eq!(logger.max_files, 2);
        assert_eq!(logger.app_name, "ShoppingList");
        assert_eq!(logger.dir, PathBuf::from("logs"));
    }
}
