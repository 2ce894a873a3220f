//! Shared test helpers for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests and, via the `test-utils` feature, to the
//! other crates' test suites.

use crate::context::PuzzleContext;
use crate::event::EventBus;
use crate::fixed::{Fixed64, Ticks};
use crate::id::{ItemTypeId, NoteId, RecipeId};
use crate::inventory::Inventory;
use crate::notebook::NoteBook;
use crate::registry::{Registry, RegistryBuilder};
use crate::vars::VarStore;

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

// ===========================================================================
// Standard content set
// ===========================================================================

/// A small registry shared by the test suites: a desk-lamp recipe with three
/// distinct ingredients, a jumper-cable recipe with a duplicated requirement
/// (two wire spools), and a mix of plain and recipe-bearing notes.
pub fn standard_registry() -> Registry {
    let mut b = RegistryBuilder::new();
    let wire = b.register_item("wire_spool", "a spool of copper wire");
    let battery = b.register_item("battery", "a 9-volt battery");
    let bulb = b.register_item("bulb", "a small light bulb");
    let desk_lamp = b.register_item("desk_lamp", "a working desk lamp");
    let jumper = b.register_item("jumper_cable", "a twisted jumper cable");
    b.register_item("brass_key", "a tarnished brass key");
    let lamp_recipe = b.register_recipe(
        "desk_lamp",
        "Desk lamp",
        vec![wire, battery, bulb],
        180,
        desk_lamp,
    );
    let jumper_recipe =
        b.register_recipe("jumper_cable", "Jumper cable", vec![wire, wire], 60, jumper);
    b.register_note("diary_page", "Diary page", "day 14: still locked in", None);
    b.register_note(
        "lamp_receipt",
        "Lamp assembly",
        "wire + battery + bulb",
        Some(lamp_recipe),
    );
    b.register_note(
        "jumper_receipt",
        "Jumper cable",
        "twist two spools together",
        Some(jumper_recipe),
    );
    b.build().expect("standard registry must build")
}

// ===========================================================================
// World
// ===========================================================================

/// Everything a puzzle needs, pre-wired: the standard registry plus fresh
/// mutable stores. `ctx` borrows the lot as a [`PuzzleContext`].
pub struct World {
    pub registry: Registry,
    pub vars: VarStore,
    pub inventory: Inventory,
    pub notebook: NoteBook,
    pub events: EventBus,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self::with_registry(standard_registry())
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            vars: VarStore::new(),
            inventory: Inventory::new(),
            notebook: NoteBook::new(),
            events: EventBus::new(64),
        }
    }

    pub fn ctx(&mut self, tick: Ticks) -> PuzzleContext<'_> {
        PuzzleContext {
            registry: &self.registry,
            vars: &mut self.vars,
            inventory: &mut self.inventory,
            notebook: &mut self.notebook,
            events: &mut self.events,
            tick,
        }
    }

    pub fn item(&self, name: &str) -> ItemTypeId {
        self.registry
            .item_id(name)
            .unwrap_or_else(|| panic!("unknown test item: {name}"))
    }

    pub fn recipe(&self, name: &str) -> RecipeId {
        self.registry
            .recipe_id(name)
            .unwrap_or_else(|| panic!("unknown test recipe: {name}"))
    }

    pub fn note(&self, name: &str) -> NoteId {
        self.registry
            .note_id(name)
            .unwrap_or_else(|| panic!("unknown test note: {name}"))
    }
}
