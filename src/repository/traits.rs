//! Repository Layer - Core Traits
//!
//! The persistence collaborator is a plain string key-value store.
//! Implementations can use SQLite, browser localStorage, in-memory, etc.

use crate::domain::DomainResult;

/// String key-value store used to persist the shopping list between sessions
///
/// All operations are synchronous; a read miss is `Ok(None)`, not an error.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> DomainResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> DomainResult<()>;

    /// Write several keys as one logical batch
    ///
    /// The default writes keys one after another. Backends with transactions
    /// should override this to make the batch atomic.
    fn set_many(&mut self, entries: &[(&str, String)]) -> DomainResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> DomainResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> DomainResult<()> {
        (**self).set(key, value)
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> DomainResult<()> {
        (**self).set_many(entries)
    }
}
