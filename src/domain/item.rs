//! Item Entity
//!
//! A tracked product: name, how many, unit price and an optional category.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// An inventory item, identified by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Identity key, case-sensitive
    pub name: String,
    pub quantity: u32,
    /// Unit price
    pub price: f64,
    /// Category name ("" = uncategorized). Soft reference, not checked against the category list.
    #[serde(default)]
    pub category: String,
}

impl Item {
    pub fn new(name: &str, quantity: u32, price: f64, category: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity,
            price,
            category: category.to_string(),
        }
    }

    /// Create an item without a category
    pub fn uncategorized(name: &str, quantity: u32, price: f64) -> Self {
        Self::new(name, quantity, price, "")
    }

    /// Accepted for entry into the inventory: non-blank name, quantity > 0, price > 0
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && self.quantity > 0 && self.price.is_finite() && self.price > 0.0
    }

    /// Minimal sanity for values read back from storage
    pub fn is_sane(&self) -> bool {
        !self.name.trim().is_empty() && self.price.is_finite() && self.price >= 0.0
    }

    /// Copy with name and category trimmed
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            quantity: self.quantity,
            price: self.price,
            category: self.category.trim().to_string(),
        }
    }

    pub fn has_category(&self) -> bool {
        !self.category.is_empty()
    }
}

impl Entity for Item {
    fn key(&self) -> &str {
        &self.name
    }
}
