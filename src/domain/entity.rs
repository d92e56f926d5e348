//! Domain Layer - Core Entity Trait
//!
//! Every named collection entry (inventory item, favorite, cart entry) is
//! identified by its name. Helpers here keep the name-uniqueness rule in one place.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Core trait for named domain entities
pub trait Entity: Clone {
    /// The entity's identity key (case-sensitive)
    fn key(&self) -> &str;
}

/// Position of the entry with the given key
pub fn position_of<T: Entity>(entries: &[T], key: &str) -> Option<usize> {
    entries.iter().position(|e| e.key() == key)
}

pub fn contains_key<T: Entity>(entries: &[T], key: &str) -> bool {
    position_of(entries, key).is_some()
}

/// Drop later entries whose key was already seen. Returns the dropped keys.
pub fn dedupe_by_key<T: Entity>(entries: &mut Vec<T>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dropped = Vec::new();
    entries.retain(|e| {
        if seen.insert(e.key().to_string()) {
            true
        } else {
            dropped.push(e.key().to_string());
            false
        }
    });
    dropped
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Index {index} out of range for {collection} (len {len})")]
    IndexOutOfRange {
        collection: String,
        index: usize,
        len: usize,
    },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}
