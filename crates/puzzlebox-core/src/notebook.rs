//! The player's collected notes.

use crate::id::{NoteId, RecipeId};
use crate::registry::Registry;

/// Ordered set of notes the player has collected. Notes whose definition
/// carries a recipe are the fabricator's selectable recipe list.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NoteBook {
    notes: Vec<NoteId>,
}

impl NoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a note. Returns `false` (without duplicating) if already held.
    pub fn add(&mut self, note: NoteId) -> bool {
        if self.notes.contains(&note) {
            return false;
        }
        self.notes.push(note);
        true
    }

    pub fn contains(&self, note: NoteId) -> bool {
        self.notes.contains(&note)
    }

    pub fn iter(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.notes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Recipes known to the player, in collection order: one entry per held
    /// note that carries a recipe.
    pub fn known_recipes(&self, registry: &Registry) -> Vec<RecipeId> {
        self.notes
            .iter()
            .filter_map(|note| registry.get_note(*note))
            .filter_map(|def| def.recipe)
            .collect()
    }
}
