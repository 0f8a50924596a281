//! ID types for inventory entries.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for item instance IDs.
static ITEM_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Handle of one item instance held by an inventory.
///
/// Recipes never compare items by this handle; it only lets an inventory
/// address the entry it stored. Clones of an item get a fresh handle when
/// they are inserted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(u64);

impl ItemId {
    /// Creates a new unique item ID.
    #[must_use]
    pub fn new() -> Self {
        Self(ITEM_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
