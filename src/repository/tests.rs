//! Repository Integration Tests
//!
//! Tests for the key-value stores with in-memory and on-disk SQLite databases.

#[cfg(test)]
mod tests {
    use crate::repository::{KeyValueStore, MemoryStore, SqliteStore};
    use rusqlite::Connection;

    fn setup_test_db() -> SqliteStore {
        SqliteStore::open_in_memory().expect("Failed to init test DB")
    }

    #[test]
    fn test_get_missing_key() {
        let store = setup_test_db();
        assert_eq!(store.get("items").expect("Get failed"), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut store = setup_test_db();
        store.set("budget", "12.5").expect("Set failed");
        assert_eq!(store.get("budget").unwrap(), Some("12.5".to_string()));
    }

    #[test]
    fn test_set_replaces_value() {
        let mut store = setup_test_db();
        store.set("budget", "1").unwrap();
        store.set("budget", "2").unwrap();
        assert_eq!(store.get("budget").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_set_many_writes_batch() {
        let mut store = setup_test_db();
        store
            .set_many(&[("cart", "[]".to_string()), ("budget", "0".to_string())])
            .expect("Batch failed");
        assert_eq!(store.get("cart").unwrap(), Some("[]".to_string()));
        assert_eq!(store.get("budget").unwrap(), Some("0".to_string()));
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("shopping.db");
        {
            let mut store = SqliteStore::open(&path).expect("Failed to open");
            store.set("categories", r#"["Fruits"]"#).unwrap();
        }
        let store = SqliteStore::open(&path).expect("Failed to reopen");
        assert_eq!(store.path(), Some(path.as_path()));
        assert_eq!(store.get("categories").unwrap(), Some(r#"["Fruits"]"#.to_string()));
    }

    #[test]
    fn test_batch_writes_share_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopping.db");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store
                .set_many(&[("items", "[]".to_string()), ("cart", "[]".to_string())])
                .unwrap();
        }

        let conn = Connection::open(&path).unwrap();
        let stamps: Vec<i64> = conn
            .prepare("SELECT updated_at FROM kv ORDER BY key")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(stamps.len(), 2);
        assert!(stamps[0] > 0);
        assert_eq!(stamps[0], stamps[1]);
    }

    #[test]
    fn test_memory_store_default_batch() {
        let mut store = MemoryStore::new();
        store
            .set_many(&[("items", "[]".to_string()), ("budget", "3".to_string())])
            .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.raw("budget"), Some("3"));
        assert_eq!(store.remove("items"), Some("[]".to_string()));
        assert_eq!(store.get("items").unwrap(), None);
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::with_entries([("cart", "[]")]));
        assert_eq!(store.get("cart").unwrap(), Some("[]".to_string()));
        store.set("cart", "[1]").unwrap();
        assert_eq!(store.get("cart").unwrap(), Some("[1]".to_string()));
    }
}
