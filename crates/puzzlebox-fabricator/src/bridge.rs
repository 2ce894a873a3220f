//! Bridges routing item clicks between the inventory and the fabricator.
//!
//! A bridge is a relation, not an owner: it borrows the fabricator and the
//! puzzle context for the duration of one [`ItemHandler::process_item`]
//! call and translates the click into a slot mutation on one side and an
//! inventory mutation on the other. Items are value ids throughout; a
//! rejected transfer leaves the item exactly where it was.

use crate::Fabricator;
use puzzlebox_core::context::PuzzleContext;
use puzzlebox_core::event::Event;
use puzzlebox_core::id::ItemTypeId;
use puzzlebox_core::inventory::{ItemHandler, ItemRoute};

// ---------------------------------------------------------------------------
// Inventory -> fabricator
// ---------------------------------------------------------------------------

/// Handles clicks on held inventory items while the fabricator UI is open:
/// the item moves into the first free ingredient slot.
pub struct InventoryToFabricatorBridge<'a, 'ctx> {
    fabricator: &'a mut Fabricator,
    ctx: &'a mut PuzzleContext<'ctx>,
}

impl<'a, 'ctx> InventoryToFabricatorBridge<'a, 'ctx> {
    pub fn new(fabricator: &'a mut Fabricator, ctx: &'a mut PuzzleContext<'ctx>) -> Self {
        Self { fabricator, ctx }
    }
}

impl ItemHandler for InventoryToFabricatorBridge<'_, '_> {
    /// Returns `false` -- and leaves the inventory untouched -- when the
    /// item is not actually held or every ingredient slot is occupied.
    fn process_item(&mut self, item: ItemTypeId) -> bool {
        if !self.ctx.inventory.contains(item) {
            return false;
        }
        if !self.fabricator.add_ingredient(item) {
            return false;
        }
        self.ctx.inventory.remove_item(item);
        self.ctx.events.emit(Event::ItemStored {
            puzzle: self.fabricator.id(),
            item,
            tick: self.ctx.tick,
        });
        true
    }
}

// ---------------------------------------------------------------------------
// Fabricator -> inventory
// ---------------------------------------------------------------------------

/// Handles clicks on occupied fabricator slots: the item (ingredient or
/// produced result) moves back to the player inventory.
pub struct FabricatorToInventoryBridge<'a, 'ctx> {
    fabricator: &'a mut Fabricator,
    ctx: &'a mut PuzzleContext<'ctx>,
}

impl<'a, 'ctx> FabricatorToInventoryBridge<'a, 'ctx> {
    pub fn new(fabricator: &'a mut Fabricator, ctx: &'a mut PuzzleContext<'ctx>) -> Self {
        Self { fabricator, ctx }
    }
}

impl ItemHandler for FabricatorToInventoryBridge<'_, '_> {
    fn process_item(&mut self, item: ItemTypeId) -> bool {
        let released =
            self.fabricator.remove_ingredient(item) || self.fabricator.remove_result(item);
        if !released {
            return false;
        }
        self.ctx.inventory.add_item(item);
        self.ctx.events.emit(Event::ItemReturned {
            puzzle: self.fabricator.id(),
            item,
            tick: self.ctx.tick,
        });
        true
    }
}

// ---------------------------------------------------------------------------
// Route dispatch
// ---------------------------------------------------------------------------

/// Dispatch a click on a held inventory item through the inventory's
/// installed route. With no route installed the click is not consumed.
pub fn process_inventory_item(
    fabricator: &mut Fabricator,
    ctx: &mut PuzzleContext<'_>,
    item: ItemTypeId,
) -> bool {
    match ctx.inventory.route() {
        Some(ItemRoute::ToFabricator) => {
            InventoryToFabricatorBridge::new(fabricator, ctx).process_item(item)
        }
        _ => false,
    }
}

/// Dispatch a click on a fabricator slot's contents through the slot route.
pub fn process_slot_item(
    fabricator: &mut Fabricator,
    ctx: &mut PuzzleContext<'_>,
    item: ItemTypeId,
) -> bool {
    FabricatorToInventoryBridge::new(fabricator, ctx).process_item(item)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use puzzlebox_core::event::EventKind;
    use puzzlebox_core::id::PuzzleId;
    use puzzlebox_core::state::Puzzle;
    use puzzlebox_core::test_utils::World;

    fn open_world() -> (World, Fabricator) {
        let mut world = World::new();
        world.notebook.add(world.note("lamp_receipt"));
        let mut fab = Fabricator::new(PuzzleId(0), 2);
        let mut ctx = world.ctx(0);
        fab.show(&mut ctx);
        (world, fab)
    }

    #[test]
    fn inventory_click_moves_item_into_slot() {
        let (mut world, mut fab) = open_world();
        let wire = world.item("wire_spool");
        world.inventory.add_item(wire);

        let mut ctx = world.ctx(0);
        assert!(process_inventory_item(&mut fab, &mut ctx, wire));
        assert!(!ctx.inventory.contains(wire));
        assert!(fab.slots()[0].contains(wire));
        assert_eq!(ctx.events.count(EventKind::ItemStored), 1);
    }

    #[test]
    fn full_slots_leave_item_in_inventory() {
        let (mut world, mut fab) = open_world();
        let wire = world.item("wire_spool");
        let battery = world.item("battery");
        let bulb = world.item("bulb");
        world.inventory.add_item(wire);
        world.inventory.add_item(battery);
        world.inventory.add_item(bulb);

        let mut ctx = world.ctx(0);
        assert!(process_inventory_item(&mut fab, &mut ctx, wire));
        assert!(process_inventory_item(&mut fab, &mut ctx, battery));
        // Both slots occupied: the transfer is rejected, the bulb stays put.
        assert!(!process_inventory_item(&mut fab, &mut ctx, bulb));
        assert!(ctx.inventory.contains(bulb));
        assert_eq!(ctx.inventory.len(), 1);
    }

    #[test]
    fn unheld_item_is_rejected() {
        let (mut world, mut fab) = open_world();
        let wire = world.item("wire_spool");
        let mut ctx = world.ctx(0);
        assert!(!process_inventory_item(&mut fab, &mut ctx, wire));
        assert!(!fab.slots()[0].is_full());
    }

    #[test]
    fn no_route_means_click_not_consumed() {
        let mut world = World::new();
        let mut fab = Fabricator::new(PuzzleId(0), 2);
        let wire = world.item("wire_spool");
        world.inventory.add_item(wire);

        // Fabricator never shown: no route installed.
        let mut ctx = world.ctx(0);
        assert!(!process_inventory_item(&mut fab, &mut ctx, wire));
        assert!(ctx.inventory.contains(wire));
    }

    #[test]
    fn slot_click_returns_ingredient() {
        let (mut world, mut fab) = open_world();
        let wire = world.item("wire_spool");
        fab.add_ingredient(wire);

        let mut ctx = world.ctx(0);
        assert!(process_slot_item(&mut fab, &mut ctx, wire));
        assert!(!fab.slots()[0].is_full());
        assert!(ctx.inventory.contains(wire));
        assert_eq!(ctx.events.count(EventKind::ItemReturned), 1);
    }

    #[test]
    fn slot_click_returns_result() {
        let (mut world, mut fab) = open_world();
        world.notebook.add(world.note("jumper_receipt"));
        fab.load_recipe(world.recipe("jumper_cable"));
        fab.add_ingredient(world.item("wire_spool"));
        {
            let mut ctx = world.ctx(0);
            assert!(fab.run(&mut ctx));
        }
        for tick in 1..=60 {
            let mut ctx = world.ctx(tick);
            fab.tick(&mut ctx);
        }
        let jumper = world.item("jumper_cable");
        assert!(fab.result_slot().contains(jumper));

        let mut ctx = world.ctx(61);
        assert!(process_slot_item(&mut fab, &mut ctx, jumper));
        assert!(!fab.result_slot().is_full());
        assert!(ctx.inventory.contains(jumper));
    }

    #[test]
    fn slot_click_on_absent_item_fails() {
        let (mut world, mut fab) = open_world();
        let wire = world.item("wire_spool");
        let mut ctx = world.ctx(0);
        assert!(!process_slot_item(&mut fab, &mut ctx, wire));
        assert!(!ctx.inventory.contains(wire));
    }
}
