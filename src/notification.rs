//! User Notifications
//!
//! Fire-and-forget messages from the shopping list to whoever renders them.
//! Every notice carries an explicit severity so errors are never styled as confirmations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A change was applied
    Success,
    /// Nothing went wrong, nothing changed
    Info,
    /// The request was rejected
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Error => "error",
        }
    }
}

/// A transient user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: &str) -> Self {
        Self { severity: Severity::Success, message: message.to_string() }
    }

    pub fn info(message: &str) -> Self {
        Self { severity: Severity::Info, message: message.to_string() }
    }

    pub fn error(message: &str) -> Self {
        Self { severity: Severity::Error, message: message.to_string() }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Receiver of notices
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

impl<F: FnMut(Notice)> Notifier for F {
    fn notify(&mut self, notice: Notice) {
        self(notice)
    }
}

/// Records every notice in order
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    notices: Vec<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The notice a banner would currently show
    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn all(&self) -> &[Notice] {
        &self.notices
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }
}

impl Notifier for NoticeLog {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// Discards notices
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {
    fn notify(&mut self, _notice: Notice) {}
}

/// Message texts shown to the user
pub mod messages {
    pub const ITEM_ADDED: &str = "Item added.";
    pub const INVALID_ITEM: &str = "Please fill in all fields and enter valid values.";
    pub const ITEM_REMOVED: &str = "Item removed.";
    pub const FAVORITE_ADDED: &str = "Item added to favorites.";
    pub const FAVORITE_EXISTS: &str = "Item is already in favorites.";
    pub const FAVORITE_NOT_IN_INVENTORY: &str = "Item is not in the inventory.";
    pub const FAVORITE_REMOVED: &str = "Item removed from favorites.";
    pub const CATEGORY_ADDED: &str = "Category added.";
    pub const CATEGORY_INVALID: &str = "Please enter a valid category name.";
    pub const CATEGORY_EXISTS: &str = "Category already exists.";
    pub const CATEGORY_DELETED: &str = "Category deleted.";
    pub const CATEGORY_UNKNOWN: &str = "Category not found.";
    pub const CART_ADDED: &str = "Item added to cart.";
    pub const CART_REMOVED_ONE: &str = "Item removed from cart.";
    pub const CART_REMOVED_ALL: &str = "Item overall removed from cart.";
    pub const NO_SUCH_ENTRY: &str = "That entry no longer exists.";
    pub const SAVED: &str = "Changes saved.";
    pub const NO_CHANGES: &str = "No changes made.";
    pub const SAVE_FAILED: &str = "Failed to save changes.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_log_keeps_order() {
        let mut log = NoticeLog::new();
        log.notify(Notice::success("one"));
        log.notify(Notice::error("two"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.latest(), Some(&Notice::error("two")));
        assert!(log.latest().unwrap().is_error());
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_closure_notifier() {
        let mut seen = Vec::new();
        {
            let mut notifier = |n: Notice| seen.push(n.severity);
            notifier.notify(Notice::info("hi"));
        }
        assert_eq!(seen, vec![Severity::Info]);
    }

    #[test]
    fn test_silent_discards() {
        let mut silent = Silent;
        silent.notify(Notice::error("ignored"));
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Notice::success("ok")).unwrap();
        assert_eq!(json, r#"{"severity":"success","message":"ok"}"#);
        assert_eq!(Severity::Error.as_str(), "error");
    }
}
