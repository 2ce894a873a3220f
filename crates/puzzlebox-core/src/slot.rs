//! Item slots -- physical placement points for a single item.

use crate::id::ItemTypeId;
use crate::inventory::ItemRoute;

/// A fixed-capacity container for exactly one item.
///
/// Occupancy is derived from the held item: there is no separate flag that
/// could fall out of agreement with the item's presence. The routing tag
/// records which container system currently handles clicks on this slot;
/// it is swapped at runtime by the owning puzzle.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ItemSlot {
    item: Option<ItemTypeId>,
    route: Option<ItemRoute>,
}

impl ItemSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_full(&self) -> bool {
        self.item.is_some()
    }

    pub fn item(&self) -> Option<ItemTypeId> {
        self.item
    }

    /// Place an item into the slot. Fails (returns `false`) when occupied.
    pub fn place(&mut self, item: ItemTypeId) -> bool {
        if self.item.is_some() {
            return false;
        }
        self.item = Some(item);
        true
    }

    /// Empty the slot, returning what it held.
    pub fn take(&mut self) -> Option<ItemTypeId> {
        self.item.take()
    }

    /// Whether the slot currently holds exactly `item`.
    pub fn contains(&self, item: ItemTypeId) -> bool {
        self.item == Some(item)
    }

    pub fn route(&self) -> Option<ItemRoute> {
        self.route
    }

    /// Install (or clear) the handler routing for this slot.
    pub fn set_route(&mut self, route: Option<ItemRoute>) {
        self.route = route;
    }
}
