//! Domain Layer
//!
//! Contains the shopping list entities and core abstractions.
//! This layer has NO storage dependencies (except serde for serialization).

mod entity;
mod item;
mod cart;

pub use entity::{Entity, DomainError, DomainResult, position_of, contains_key, dedupe_by_key};
pub use item::Item;
pub use cart::CartEntry;
