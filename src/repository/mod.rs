//! Repository Layer
//!
//! Key-value persistence abstractions and implementations.

mod traits;
mod memory;
#[cfg(not(target_arch = "wasm32"))]
mod db;
#[cfg(all(feature = "web-storage", target_arch = "wasm32"))]
mod web;

#[cfg(test)]
mod tests;

pub use traits::KeyValueStore;
pub use memory::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
pub use db::SqliteStore;
#[cfg(all(feature = "web-storage", target_arch = "wasm32"))]
pub use web::LocalStorage;
