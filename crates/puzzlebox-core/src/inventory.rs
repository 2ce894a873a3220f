//! Player inventory and cross-system item routing.
//!
//! The inventory is an ordered collection of held item ids. When a puzzle
//! UI is open it installs a routing tag on the inventory so that clicking
//! a held item sends it through a bridge into the puzzle's slots instead
//! of the default examine action; the puzzle clears the tag on close.
//! Bridges implement the [`ItemHandler`] contract and borrow both ends at
//! dispatch time -- no bridge owns any item.

use crate::id::ItemTypeId;

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Destination for cross-system item clicks. Installed on the inventory
/// (or on a puzzle-owned slot) while the corresponding UI is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ItemRoute {
    /// Clicks move the item into the open fabricator's ingredient slots.
    ToFabricator,
    /// Clicks return the item to the player inventory.
    ToInventory,
}

/// Handler contract consumed and produced by bridges: process one item,
/// reporting whether it was accepted. A `false` return means the item must
/// stay where it is.
pub trait ItemHandler {
    fn process_item(&mut self, item: ItemTypeId) -> bool;
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Ordered collection of held items.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Inventory {
    items: Vec<ItemTypeId>,
    route: Option<ItemRoute>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item. Duplicates are allowed; items are value tokens.
    pub fn add_item(&mut self, item: ItemTypeId) {
        self.items.push(item);
    }

    /// Remove the first held instance of `item`. Returns `false` if none
    /// is held.
    pub fn remove_item(&mut self, item: ItemTypeId) -> bool {
        match self.items.iter().position(|held| *held == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, item: ItemTypeId) -> bool {
        self.items.contains(&item)
    }

    /// Number of held instances of `item`.
    pub fn count(&self, item: ItemTypeId) -> usize {
        self.items.iter().filter(|held| **held == item).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemTypeId> + '_ {
        self.items.iter().copied()
    }

    /// The currently installed item route, if any.
    pub fn route(&self) -> Option<ItemRoute> {
        self.route
    }

    /// Install (or clear, with `None`) the active item route.
    pub fn set_route(&mut self, route: Option<ItemRoute>) {
        self.route = route;
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove() {
        let mut inv = Inventory::new();
        inv.add_item(ItemTypeId(0));
        inv.add_item(ItemTypeId(1));
        assert_eq!(inv.len(), 2);
        assert!(inv.remove_item(ItemTypeId(0)));
        assert_eq!(inv.len(), 1);
        assert!(!inv.contains(ItemTypeId(0)));
    }

    #[test]
    fn remove_missing_item_fails() {
        let mut inv = Inventory::new();
        inv.add_item(ItemTypeId(0));
        assert!(!inv.remove_item(ItemTypeId(9)));
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn remove_takes_first_instance_only() {
        let mut inv = Inventory::new();
        inv.add_item(ItemTypeId(3));
        inv.add_item(ItemTypeId(3));
        assert_eq!(inv.count(ItemTypeId(3)), 2);
        assert!(inv.remove_item(ItemTypeId(3)));
        assert_eq!(inv.count(ItemTypeId(3)), 1);
    }

    #[test]
    fn order_is_preserved() {
        let mut inv = Inventory::new();
        inv.add_item(ItemTypeId(2));
        inv.add_item(ItemTypeId(0));
        inv.add_item(ItemTypeId(1));
        let held: Vec<_> = inv.iter().collect();
        assert_eq!(held, vec![ItemTypeId(2), ItemTypeId(0), ItemTypeId(1)]);
    }

    #[test]
    fn route_installs_and_clears() {
        let mut inv = Inventory::new();
        assert_eq!(inv.route(), None);
        inv.set_route(Some(ItemRoute::ToFabricator));
        assert_eq!(inv.route(), Some(ItemRoute::ToFabricator));
        inv.set_route(None);
        assert_eq!(inv.route(), None);
    }
}
