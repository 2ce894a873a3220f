//! Immutable content registry: items, recipes, and notes.
//!
//! Definitions are static content loaded at startup and never mutated at
//! runtime. Construction follows a three-phase lifecycle -- registration,
//! optional mutation, finalization -- after which the [`Registry`] is
//! frozen and validated: every cross-reference in it resolves.

use crate::fixed::Ticks;
use crate::id::{ItemTypeId, NoteId, RecipeId};
use std::collections::HashMap;

/// An item definition.
#[derive(Debug, Clone)]
pub struct ItemDef {
    pub name: String,
    pub description: String,
}

/// A recipe definition: what the fabricator needs and what it produces.
#[derive(Debug, Clone)]
pub struct RecipeDef {
    pub name: String,
    /// Human-readable name shown in the recipe list.
    pub screen_name: String,
    /// Required item set, in display order. Matching is an existence check
    /// per entry, so a duplicated entry is satisfied by a single slot.
    pub required_items: Vec<ItemTypeId>,
    /// Assembly duration in ticks.
    pub fabrication_time: Ticks,
    pub result: ItemTypeId,
}

/// A note definition. Notes carrying a recipe make that recipe selectable
/// in the fabricator once the note is collected.
#[derive(Debug, Clone)]
pub struct NoteDef {
    pub name: String,
    pub screen_name: String,
    pub text: String,
    pub recipe: Option<RecipeId>,
}

impl NoteDef {
    pub fn is_recipe(&self) -> bool {
        self.recipe.is_some()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing an immutable Registry.
/// Three-phase lifecycle: registration -> mutation -> finalization.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemTypeId>,
    recipes: Vec<RecipeDef>,
    recipe_name_to_id: HashMap<String, RecipeId>,
    notes: Vec<NoteDef>,
    note_name_to_id: HashMap<String, NoteId>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase 1: Register an item. Returns its id.
    pub fn register_item(&mut self, name: &str, description: &str) -> ItemTypeId {
        let id = ItemTypeId(self.items.len() as u32);
        self.items.push(ItemDef {
            name: name.to_string(),
            description: description.to_string(),
        });
        self.item_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Phase 1: Register a recipe. Returns its id.
    pub fn register_recipe(
        &mut self,
        name: &str,
        screen_name: &str,
        required_items: Vec<ItemTypeId>,
        fabrication_time: Ticks,
        result: ItemTypeId,
    ) -> RecipeId {
        let id = RecipeId(self.recipes.len() as u32);
        self.recipes.push(RecipeDef {
            name: name.to_string(),
            screen_name: screen_name.to_string(),
            required_items,
            fabrication_time,
            result,
        });
        self.recipe_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Phase 1: Register a note. Returns its id.
    pub fn register_note(
        &mut self,
        name: &str,
        screen_name: &str,
        text: &str,
        recipe: Option<RecipeId>,
    ) -> NoteId {
        let id = NoteId(self.notes.len() as u32);
        self.notes.push(NoteDef {
            name: name.to_string(),
            screen_name: screen_name.to_string(),
            text: text.to_string(),
            recipe,
        });
        self.note_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Phase 2: Mutate an existing recipe by name.
    pub fn mutate_recipe<F>(&mut self, name: &str, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut RecipeDef),
    {
        let id = self
            .recipe_name_to_id
            .get(name)
            .ok_or(RegistryError::NotFound(name.to_string()))?;
        f(&mut self.recipes[id.0 as usize]);
        Ok(())
    }

    /// Lookup item id by name.
    pub fn item_id(&self, name: &str) -> Option<ItemTypeId> {
        self.item_name_to_id.get(name).copied()
    }

    /// Lookup recipe id by name.
    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_name_to_id.get(name).copied()
    }

    /// Lookup note id by name.
    pub fn note_id(&self, name: &str) -> Option<NoteId> {
        self.note_name_to_id.get(name).copied()
    }

    /// Phase 3: Finalize and build the immutable registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        // Validate: every item referenced by a recipe must exist.
        for recipe in &self.recipes {
            for item in recipe.required_items.iter().chain([&recipe.result]) {
                if item.0 as usize >= self.items.len() {
                    return Err(RegistryError::InvalidItemRef(*item));
                }
            }
        }
        // Validate: every recipe referenced by a note must exist.
        for note in &self.notes {
            if let Some(recipe) = note.recipe
                && recipe.0 as usize >= self.recipes.len()
            {
                return Err(RegistryError::InvalidRecipeRef(recipe));
            }
        }

        Ok(Registry {
            items: self.items,
            item_name_to_id: self.item_name_to_id,
            recipes: self.recipes,
            recipe_name_to_id: self.recipe_name_to_id,
            notes: self.notes,
            note_name_to_id: self.note_name_to_id,
        })
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Immutable registry. Frozen after build().
#[derive(Debug)]
pub struct Registry {
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemTypeId>,
    recipes: Vec<RecipeDef>,
    recipe_name_to_id: HashMap<String, RecipeId>,
    notes: Vec<NoteDef>,
    note_name_to_id: HashMap<String, NoteId>,
}

impl Registry {
    pub fn get_item(&self, id: ItemTypeId) -> Option<&ItemDef> {
        self.items.get(id.0 as usize)
    }

    pub fn get_recipe(&self, id: RecipeId) -> Option<&RecipeDef> {
        self.recipes.get(id.0 as usize)
    }

    pub fn get_note(&self, id: NoteId) -> Option<&NoteDef> {
        self.notes.get(id.0 as usize)
    }

    pub fn item_id(&self, name: &str) -> Option<ItemTypeId> {
        self.item_name_to_id.get(name).copied()
    }

    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_name_to_id.get(name).copied()
    }

    pub fn note_id(&self, name: &str) -> Option<NoteId> {
        self.note_name_to_id.get(name).copied()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid item reference: {0:?}")]
    InvalidItemRef(ItemTypeId),
    #[error("invalid recipe reference: {0:?}")]
    InvalidRecipeRef(RecipeId),
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_builder() -> RegistryBuilder {
        let mut b = RegistryBuilder::new();
        let wire = b.register_item("wire_spool", "a spool of copper wire");
        let battery = b.register_item("battery", "a 9-volt battery");
        let lamp = b.register_item("lamp", "a working lamp");
        let recipe = b.register_recipe("lamp", "Lamp", vec![wire, battery], 180, lamp);
        b.register_note("lamp_receipt", "Lamp assembly", "wire + battery", Some(recipe));
        b
    }

    #[test]
    fn register_and_build() {
        let reg = setup_builder().build().unwrap();
        assert_eq!(reg.item_count(), 3);
        assert_eq!(reg.recipe_count(), 1);
        assert_eq!(reg.note_count(), 1);
    }

    #[test]
    fn lookup_by_name() {
        let reg = setup_builder().build().unwrap();
        assert!(reg.item_id("wire_spool").is_some());
        assert!(reg.recipe_id("lamp").is_some());
        assert!(reg.note_id("lamp_receipt").is_some());
        assert!(reg.item_id("nonexistent").is_none());
    }

    #[test]
    fn note_with_recipe_is_recipe_note() {
        let reg = setup_builder().build().unwrap();
        let note = reg.get_note(reg.note_id("lamp_receipt").unwrap()).unwrap();
        assert!(note.is_recipe());
    }

    #[test]
    fn mutate_recipe() {
        let mut builder = setup_builder();
        let extra = builder.register_item("fuse", "a glass fuse");
        builder
            .mutate_recipe("lamp", |recipe| recipe.required_items.push(extra))
            .unwrap();
        let reg = builder.build().unwrap();
        let recipe = reg.get_recipe(reg.recipe_id("lamp").unwrap()).unwrap();
        assert_eq!(recipe.required_items.len(), 3);
    }

    #[test]
    fn mutate_nonexistent_fails() {
        let mut builder = setup_builder();
        assert!(builder.mutate_recipe("nonexistent", |_| {}).is_err());
    }

    #[test]
    fn invalid_item_ref_in_recipe_fails() {
        let mut b = RegistryBuilder::new();
        b.register_recipe("bad", "Bad", vec![ItemTypeId(999)], 60, ItemTypeId(999));
        match b.build() {
            Err(RegistryError::InvalidItemRef(id)) => assert_eq!(id, ItemTypeId(999)),
            other => panic!("expected InvalidItemRef, got: {other:?}"),
        }
    }

    #[test]
    fn invalid_recipe_ref_in_note_fails() {
        let mut b = RegistryBuilder::new();
        b.register_note("orphan", "Orphan", "", Some(RecipeId(42)));
        match b.build() {
            Err(RegistryError::InvalidRecipeRef(id)) => assert_eq!(id, RecipeId(42)),
            other => panic!("expected InvalidRecipeRef, got: {other:?}"),
        }
    }

    #[test]
    fn registry_get_nonexistent_returns_none() {
        let reg = setup_builder().build().unwrap();
        assert!(reg.get_item(ItemTypeId(999)).is_none());
        assert!(reg.get_recipe(RecipeId(999)).is_none());
        assert!(reg.get_note(NoteId(999)).is_none());
    }

    #[test]
    fn empty_registry_builds_successfully() {
        let reg = RegistryBuilder::new().build().unwrap();
        assert_eq!(reg.item_count(), 0);
        assert_eq!(reg.recipe_count(), 0);
        assert_eq!(reg.note_count(), 0);
    }
}
