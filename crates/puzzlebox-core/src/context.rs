//! Explicit puzzle dependencies.
//!
//! The original game reached for process-wide singletons (one shared
//! variable system holding the inventory and note book). Here every puzzle
//! entry point receives a [`PuzzleContext`] instead: the registry, the
//! mutable shared stores, the event bus, and the current tick. Exactly one
//! mutator is active at a time by construction -- the context borrows
//! everything mutably for the duration of one call.

use crate::event::{Event, EventBus};
use crate::fixed::Ticks;
use crate::id::{ItemTypeId, NoteId};
use crate::inventory::Inventory;
use crate::notebook::NoteBook;
use crate::registry::Registry;
use crate::vars::VarStore;

/// Mutable context passed into every puzzle entry point.
pub struct PuzzleContext<'a> {
    pub registry: &'a Registry,
    pub vars: &'a mut VarStore,
    pub inventory: &'a mut Inventory,
    pub notebook: &'a mut NoteBook,
    pub events: &'a mut EventBus,
    /// The current gameplay tick.
    pub tick: Ticks,
}

impl PuzzleContext<'_> {
    /// Write a variable. A notified write fires the store's observers and
    /// emits [`Event::VarChanged`]; the flag is persisted before either, so
    /// dependent reads in the same callback see the new value.
    pub fn set_var(&mut self, key: &str, value: &str, notify: bool) {
        self.vars.set(key, value, notify);
        if notify {
            self.events.emit(Event::VarChanged {
                key: key.to_string(),
                tick: self.tick,
            });
        }
    }

    /// Add an item to the player inventory and announce the grant.
    pub fn grant_item(&mut self, item: ItemTypeId) {
        self.inventory.add_item(item);
        self.events.emit(Event::ItemGranted {
            item,
            tick: self.tick,
        });
    }

    /// Add a note to the note book. Announces only a genuinely new note.
    pub fn add_note(&mut self, note: NoteId) -> bool {
        if !self.notebook.add(note) {
            return false;
        }
        self.events.emit(Event::NoteAdded {
            note,
            tick: self.tick,
        });
        true
    }
}
