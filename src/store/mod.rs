//! Shopping List State Store
//!
//! `ShoppingList` is the single owner of the five collections (inventory, favorites,
//! categories, cart, budget) and of the dirty flag. Callers read through the accessors
//! and change state only through the mutators below; only `save` writes to storage.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::SeedConfig;
use crate::domain::{
    contains_key, dedupe_by_key, position_of, CartEntry, DomainError, DomainResult, Entity, Item,
};
use crate::notification::{messages, Notice, Notifier};
use crate::repository::KeyValueStore;


/// Storage keys, one per persisted collection
pub mod keys {
    pub const ITEMS: &str = "items";
    pub const FAVORITES: &str = "favorites";
    pub const CATEGORIES: &str = "categories";
    pub const BUDGET: &str = "budget";
    pub const CART: &str = "cart";
}

/// Everything that is persisted
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListState {
    pub items: Vec<Item>,
    pub favorites: Vec<Item>,
    pub categories: Vec<String>,
    pub cart: Vec<CartEntry>,
    /// 0 = no budget set
    pub budget: f64,
}

/// What `add_item_to_inventory` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAdded {
    /// Quantity was added to the existing entry at this index
    Merged(usize),
    /// A new entry was appended at this index
    Inserted(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    NoChanges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    /// Budget is 0, nothing to compare against
    Unset,
    WithinBudget,
    Exceeded,
}

/// Inventory & cart state manager
pub struct ShoppingList<S: KeyValueStore, N: Notifier> {
    store: S,
    notifier: N,
    seed: SeedConfig,
    state: ListState,
    dirty: bool,
    /// Budget as of the last load or save
    persisted_budget: f64,
}

impl<S: KeyValueStore, N: Notifier> ShoppingList<S, N> {
    /// Create the manager and load persisted state, falling back to the built-in seeds
    pub fn open(store: S, notifier: N) -> Self {
        Self::open_with_seed(store, notifier, SeedConfig::default())
    }

    pub fn open_with_seed(store: S, notifier: N, seed: SeedConfig) -> Self {
        let mut list = Self {
            store,
            notifier,
            seed,
            state: ListState::default(),
            dirty: false,
            persisted_budget: 0.0,
        };
        list.load();
        list
    }

    // ========================
    // Accessors
    // ========================

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn items(&self) -> &[Item] {
        &self.state.items
    }

    pub fn favorites(&self) -> &[Item] {
        &self.state.favorites
    }

    pub fn categories(&self) -> &[String] {
        &self.state.categories
    }

    pub fn cart(&self) -> &[CartEntry] {
        &self.state.cart
    }

    pub fn budget(&self) -> f64 {
        self.state.budget
    }

    /// Unsaved changes exist
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn into_parts(self) -> (S, N) {
        (self.store, self.notifier)
    }

    // ========================
    // Load
    // ========================

    /// Re-derive all state from storage and clear the dirty flag.
    ///
    /// Absent, unreadable or unparsable values are replaced by their defaults;
    /// individually broken entries are dropped.
    pub fn load(&mut self) {
        let items = self
            .read_entries::<Item>(keys::ITEMS)
            .unwrap_or_else(|| self.seed.items.clone());
        let favorites = self.read_entries::<Item>(keys::FAVORITES).unwrap_or_default();
        let categories = self
            .read_entries::<String>(keys::CATEGORIES)
            .unwrap_or_else(|| self.seed.categories.clone());
        let cart = self.read_entries::<CartEntry>(keys::CART).unwrap_or_default();
        let budget = self.read_budget();

        self.state = ListState {
            items: sanitize_items(keys::ITEMS, items),
            favorites: sanitize_items(keys::FAVORITES, favorites),
            categories: sanitize_categories(categories),
            cart: sanitize_cart(cart),
            budget,
        };
        self.persisted_budget = budget;
        self.dirty = false;

        log::info!(
            "Loaded {} items, {} favorites, {} categories, {} cart entries, budget {}",
            self.state.items.len(),
            self.state.favorites.len(),
            self.state.categories.len(),
            self.state.cart.len(),
            self.state.budget
        );
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(Some(raw)) => Some(raw),
            Ok(None) => {
                log::debug!("No stored value for '{}', using default", key);
                None
            }
            Err(e) => {
                log::warn!("Failed to read '{}': {}, using default", key, e);
                None
            }
        }
    }

    /// Decode a stored JSON array entry by entry. `None` only when the value is
    /// missing or not an array at all; undecodable entries are dropped.
    fn read_entries<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let raw = self.read_raw(key)?;
        let entries = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                log::warn!("Stored '{}' is not a list, using default", key);
                return None;
            }
            Err(e) => {
                log::warn!("Stored '{}' is unparsable ({}), using default", key, e);
                return None;
            }
        };

        let decoded = entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value(entry) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("Dropping entry {} of '{}': {}", i, key, e);
                    None
                }
            })
            .collect();
        Some(decoded)
    }

    fn read_budget(&self) -> f64 {
        let Some(raw) = self.read_raw(keys::BUDGET) else {
            return 0.0;
        };
        match raw.trim().parse::<f64>() {
            // + 0.0 folds -0 into 0
            Ok(budget) if budget.is_finite() && budget >= 0.0 => budget + 0.0,
            _ => {
                log::warn!("Stored budget '{}' is not a usable number, using 0", raw);
                0.0
            }
        }
    }

    // ========================
    // Inventory
    // ========================

    /// Add an item, merging quantities into an existing entry with the same name.
    ///
    /// A new item with an unknown category also registers that category.
    pub fn add_item_to_inventory(&mut self, item: Item) -> DomainResult<ItemAdded> {
        if !item.is_valid() {
            return Err(self.reject(
                DomainError::InvalidInput(format!("item '{}' needs a name, quantity > 0 and price > 0", item.name)),
                messages::INVALID_ITEM,
            ));
        }
        let item = item.normalized();

        let outcome = match position_of(&self.state.items, &item.name) {
            Some(index) => {
                let existing = &mut self.state.items[index];
                existing.quantity = existing.quantity.saturating_add(item.quantity);
                log::debug!("Merged {} into '{}' (now {})", item.quantity, existing.name, existing.quantity);
                ItemAdded::Merged(index)
            }
            None => {
                if item.has_category() && !self.state.categories.contains(&item.category) {
                    log::debug!("Registering category '{}' from new item", item.category);
                    self.state.categories.push(item.category.clone());
                }
                log::debug!("Inserted item '{}'", item.name);
                self.state.items.push(item);
                ItemAdded::Inserted(self.state.items.len() - 1)
            }
        };

        self.changed(messages::ITEM_ADDED);
        Ok(outcome)
    }

    /// Remove the item at `index` and any favorite with the same name
    pub fn remove_item(&mut self, index: usize) -> DomainResult<Item> {
        self.check_index("inventory", index, self.state.items.len())?;

        let removed = self.state.items.remove(index);
        self.state.favorites.retain(|fav| fav.name != removed.name);
        log::debug!("Removed item '{}'", removed.name);

        self.changed(messages::ITEM_REMOVED);
        Ok(removed)
    }

    // ========================
    // Favorites
    // ========================

    /// Mark an inventory item as favorite. Returns false if it already was one.
    pub fn add_favorite(&mut self, item: &Item) -> DomainResult<bool> {
        if contains_key(&self.state.favorites, item.key()) {
            self.notifier.notify(Notice::info(messages::FAVORITE_EXISTS));
            return Ok(false);
        }

        let Some(index) = position_of(&self.state.items, item.key()) else {
            return Err(self.reject(
                DomainError::NotFound(format!("item '{}'", item.name)),
                messages::FAVORITE_NOT_IN_INVENTORY,
            ));
        };

        let favorite = self.state.items[index].clone();
        log::debug!("Added favorite '{}'", favorite.name);
        self.state.favorites.push(favorite);

        self.changed(messages::FAVORITE_ADDED);
        Ok(true)
    }

    pub fn remove_favorite(&mut self, index: usize) -> DomainResult<Item> {
        self.check_index("favorites", index, self.state.favorites.len())?;

        let removed = self.state.favorites.remove(index);
        log::debug!("Removed favorite '{}'", removed.name);

        self.changed(messages::FAVORITE_REMOVED);
        Ok(removed)
    }

    // ========================
    // Categories
    // ========================

    /// Register a category. Names are trimmed and must be unique.
    pub fn add_category(&mut self, name: &str) -> DomainResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.reject(
                DomainError::InvalidInput("empty category name".to_string()),
                messages::CATEGORY_INVALID,
            ));
        }
        if self.state.categories.iter().any(|c| c == name) {
            return Err(self.reject(
                DomainError::Conflict(format!("category '{}'", name)),
                messages::CATEGORY_EXISTS,
            ));
        }

        self.state.categories.push(name.to_string());
        log::debug!("Added category '{}'", name);

        self.changed(messages::CATEGORY_ADDED);
        Ok(())
    }

    /// Delete a category and blank it on every item tagged with it.
    /// Returns how many items were untagged.
    pub fn remove_category(&mut self, name: &str) -> DomainResult<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.reject(
                DomainError::InvalidInput("empty category name".to_string()),
                messages::CATEGORY_INVALID,
            ));
        }

        let known = self.state.categories.iter().any(|c| c == name);
        let tagged = self.state.items.iter().filter(|item| item.category == name).count();
        if !known && tagged == 0 {
            return Err(self.reject(
                DomainError::NotFound(format!("category '{}'", name)),
                messages::CATEGORY_UNKNOWN,
            ));
        }

        self.state.categories.retain(|c| c != name);
        for item in self.state.items.iter_mut().filter(|item| item.category == name) {
            item.category.clear();
        }
        log::debug!("Removed category '{}', untagged {} items", name, tagged);

        self.changed(messages::CATEGORY_DELETED);
        Ok(tagged)
    }

    // ========================
    // Cart
    // ========================

    /// Put one unit of `item` in the cart. Returns the entry's new quantity.
    pub fn add_to_cart(&mut self, item: &Item) -> DomainResult<u32> {
        if !item.is_sane() {
            return Err(self.reject(
                DomainError::InvalidInput(format!("item '{}' cannot go in the cart", item.name)),
                messages::INVALID_ITEM,
            ));
        }

        let quantity = match position_of(&self.state.cart, item.key()) {
            Some(index) => {
                let entry = &mut self.state.cart[index];
                entry.quantity = entry.quantity.saturating_add(1);
                entry.quantity
            }
            None => {
                self.state.cart.push(CartEntry::from_item(item));
                1
            }
        };
        log::debug!("Cart '{}' x{}", item.name, quantity);

        self.changed(messages::CART_ADDED);
        Ok(quantity)
    }

    /// Take one unit out of the entry at `index`; the entry goes away at 0.
    /// Returns the remaining quantity.
    pub fn remove_one_from_cart(&mut self, index: usize) -> DomainResult<u32> {
        self.check_index("cart", index, self.state.cart.len())?;

        let entry = &mut self.state.cart[index];
        entry.quantity = entry.quantity.saturating_sub(1);
        let remaining = entry.quantity;
        if remaining == 0 {
            let removed = self.state.cart.remove(index);
            log::debug!("Cart '{}' emptied", removed.name);
        }

        self.changed(messages::CART_REMOVED_ONE);
        Ok(remaining)
    }

    /// Drop the entry at `index` whatever its quantity
    pub fn remove_all_from_cart(&mut self, index: usize) -> DomainResult<CartEntry> {
        self.check_index("cart", index, self.state.cart.len())?;

        let removed = self.state.cart.remove(index);
        log::debug!("Cart '{}' removed ({} units)", removed.name, removed.quantity);

        self.changed(messages::CART_REMOVED_ALL);
        Ok(removed)
    }

    /// Σ quantity × price
    pub fn cart_total(&self) -> f64 {
        self.state.cart.iter().map(CartEntry::line_total).sum()
    }

    pub fn is_budget_exceeded(&self) -> bool {
        self.cart_total() > self.state.budget
    }

    /// Budget comparison as shown to the user; a zero budget means none is set
    pub fn budget_status(&self) -> BudgetStatus {
        if self.state.budget <= 0.0 {
            BudgetStatus::Unset
        } else if self.is_budget_exceeded() {
            BudgetStatus::Exceeded
        } else {
            BudgetStatus::WithinBudget
        }
    }

    // ========================
    // Budget
    // ========================

    /// Set the budget. NaN, infinite and negative values are refused without a notice.
    pub fn set_budget(&mut self, value: f64) -> DomainResult<()> {
        if !value.is_finite() || value < 0.0 {
            log::debug!("Ignoring budget {}", value);
            return Err(DomainError::InvalidInput(format!("budget {}", value)));
        }
        let value = value + 0.0;

        self.state.budget = value;
        if value != self.persisted_budget {
            self.dirty = true;
        }
        Ok(())
    }

    // ========================
    // Save
    // ========================

    /// Write all five values to storage if anything changed since the last load or save
    pub fn save(&mut self) -> DomainResult<SaveOutcome> {
        if !self.dirty {
            self.notifier.notify(Notice::info(messages::NO_CHANGES));
            return Ok(SaveOutcome::NoChanges);
        }

        let entries = [
            (keys::ITEMS, serde_json::to_string(&self.state.items)?),
            (keys::FAVORITES, serde_json::to_string(&self.state.favorites)?),
            (keys::CATEGORIES, serde_json::to_string(&self.state.categories)?),
            (keys::CART, serde_json::to_string(&self.state.cart)?),
            (keys::BUDGET, self.state.budget.to_string()),
        ];

        if let Err(e) = self.store.set_many(&entries) {
            log::error!("Save failed: {}", e);
            self.notifier.notify(Notice::error(messages::SAVE_FAILED));
            return Err(e);
        }

        self.persisted_budget = self.state.budget;
        self.dirty = false;
        log::info!("Saved {} items, {} cart entries", self.state.items.len(), self.state.cart.len());
        self.notifier.notify(Notice::success(messages::SAVED));
        Ok(SaveOutcome::Saved)
    }

    // ========================
    // Helpers
    // ========================

    /// Last step of every successful mutation
    fn changed(&mut self, message: &str) {
        self.dirty = true;
        self.notifier.notify(Notice::success(message));
    }

    fn reject(&mut self, err: DomainError, message: &str) -> DomainError {
        log::debug!("Rejected: {}", err);
        self.notifier.notify(Notice::error(message));
        err
    }

    fn check_index(&mut self, collection: &str, index: usize, len: usize) -> DomainResult<()> {
        if index < len {
            return Ok(());
        }
        Err(self.reject(
            DomainError::IndexOutOfRange {
                collection: collection.to_string(),
                index,
                len,
            },
            messages::NO_SUCH_ENTRY,
        ))
    }
}

fn sanitize_items(key: &str, mut items: Vec<Item>) -> Vec<Item> {
    items.retain(|item| {
        let sane = item.is_sane();
        if !sane {
            log::warn!("Dropping malformed entry {:?} from '{}'", item.name, key);
        }
        sane
    });
    for name in dedupe_by_key(&mut items) {
        log::warn!("Dropping duplicate '{}' from '{}'", name, key);
    }
    items
}

fn sanitize_categories(categories: Vec<String>) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(categories.len());
    for category in categories {
        if category.trim().is_empty() || kept.contains(&category) {
            log::warn!("Dropping category {:?}", category);
            continue;
        }
        kept.push(category);
    }
    kept
}

fn sanitize_cart(mut cart: Vec<CartEntry>) -> Vec<CartEntry> {
    cart.retain(|entry| {
        let sane = entry.is_sane();
        if !sane {
            log::warn!("Dropping malformed cart entry {:?}", entry.name);
        }
        sane
    });
    for name in dedupe_by_key(&mut cart) {
        log::warn!("Dropping duplicate cart entry '{}'", name);
    }
    cart
}
