//! Cart Entry
//!
//! A line in the shopping cart. Quantity counts units in the cart, independent of
//! the inventory quantity of the item it was created from.

use serde::{Deserialize, Serialize};
use super::entity::Entity;
use super::item::Item;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub name: String,
    /// Always > 0 while the entry is in a cart
    pub quantity: u32,
    pub price: f64,
    #[serde(default)]
    pub category: String,
}

impl CartEntry {
    /// First unit of an item put into the cart
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            quantity: 1,
            price: item.price,
            category: item.category.clone(),
        }
    }

    /// quantity × price
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }

    pub fn is_sane(&self) -> bool {
        !self.name.trim().is_empty() && self.quantity > 0 && self.price.is_finite() && self.price >= 0.0
    }
}

impl Entity for CartEntry {
    fn key(&self) -> &str {
        &self.name
    }
}
