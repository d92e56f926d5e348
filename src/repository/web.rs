//! Browser localStorage store (wasm32, `web-storage` feature)

use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::domain::{DomainError, DomainResult};
use super::traits::KeyValueStore;

/// `window.localStorage`, optionally namespaced with a key prefix
pub struct LocalStorage {
    storage: Storage,
    prefix: String,
}

impl LocalStorage {
    pub fn new() -> DomainResult<Self> {
        Self::with_prefix("")
    }

    pub fn with_prefix(prefix: &str) -> DomainResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| DomainError::Storage("No window available".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(js_err)?
            .ok_or_else(|| DomainError::Storage("localStorage unavailable".to_string()))?;
        Ok(Self {
            storage,
            prefix: prefix.to_string(),
        })
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> DomainResult<Option<String>> {
        self.storage.get_item(&self.full_key(key)).map_err(js_err)
    }

    fn set(&mut self, key: &str, value: &str) -> DomainResult<()> {
        self.storage.set_item(&self.full_key(key), value).map_err(js_err)
    }
}

fn js_err(e: JsValue) -> DomainError {
    DomainError::Storage(format!("{:?}", e))
}
