//! Shopping List
//!
//! Layered architecture:
//! - domain: Items, cart entries, errors
//! - repository: Key-value persistence (SQLite, localStorage, in-memory)
//! - notification: Severity-tagged user messages
//! - store: The state manager owning every collection and the dirty flag
//! - config: Storage/logging locations and seed data

pub mod config;
pub mod domain;
pub mod notification;
pub mod repository;
pub mod store;

pub use config::{Config, LoggingConfig, SeedConfig, StorageConfig};
pub use domain::{CartEntry, DomainError, DomainResult, Entity, Item};
pub use notification::{Notice, NoticeLog, Notifier, Severity, Silent};
pub use repository::{KeyValueStore, MemoryStore};
pub use store::{BudgetStatus, ItemAdded, ListState, SaveOutcome, ShoppingList};

#[cfg(not(target_arch = "wasm32"))]
pub use repository::SqliteStore;
#[cfg(all(feature = "web-storage", target_arch = "wasm32"))]
pub use repository::LocalStorage;

/// Start a session: file logging (if enabled), SQLite storage, loaded state.
///
/// Logging problems are reported and otherwise ignored; only storage failures abort.
#[cfg(not(target_arch = "wasm32"))]
pub fn open(config: &Config) -> DomainResult<ShoppingList<SqliteStore, NoticeLog>> {
    if config.logging.enabled {
        match rolling_logger::init_with(config.logging.to_logger_config()) {
            Ok(()) => {}
            Err(rolling_logger::LoggerError::AlreadyInitialized) => {
                log::debug!("Logger already running");
            }
            Err(e) => eprintln!(
                "[{}] Logging disabled: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                e
            ),
        }
    }

    let store = SqliteStore::open(&config.storage.db_path)?;
    log::info!("Session storage at {}", config.storage.db_path.display());
    Ok(ShoppingList::open_with_seed(store, NoticeLog::new(), config.seed.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &std::path::Path) -> Config {
        Config {
            storage: StorageConfig {
                db_path: dir.join("data").join("list.db"),
            },
            logging: LoggingConfig {
                enabled: false,
                ..LoggingConfig::default()
            },
            seed: SeedConfig::default(),
        }
    }

    #[test]
    fn test_open_persists_between_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        {
            let mut list = open(&config).expect("Failed to open");
            list.add_item_to_inventory(Item::new("Rice", 1, 3.2, "Grains")).unwrap();
            list.set_budget(50.0).unwrap();
            assert_eq!(list.save().unwrap(), SaveOutcome::Saved);
        }

        let list = open(&config).expect("Failed to reopen");
        assert_eq!(list.items().len(), 3);
        assert_eq!(list.items()[2].name, "Rice");
        assert!(list.categories().iter().any(|c| c == "Grains"));
        assert_eq!(list.budget(), 50.0);
        assert!(!list.is_dirty());
    }

    #[test]
    fn test_open_uses_configured_seed() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.seed = SeedConfig {
            items: vec![Item::uncategorized("Water", 6, 0.4)],
            categories: vec!["Drinks".to_string()],
        };

        let list = open(&config).unwrap();
        assert_eq!(list.items(), &[Item::uncategorized("Water", 6, 0.4)]);
        assert_eq!(list.categories(), &["Drinks"]);
    }

    #[test]
    fn test_open_with_file_logging() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.logging = LoggingConfig {
            enabled: true,
            dir: dir.path().join("logs"),
            ..LoggingConfig::default()
        };

        let mut list = open(&config).unwrap();
        list.add_category("Frozen").unwrap();
        list.save().unwrap();

        let lines = rolling_logger::recent_lines(50);
        assert!(lines.iter().any(|l| l.contains("Session storage at")));
        assert!(lines.iter().any(|l| l.contains("Saved 2 items")));
    }
}
