//! Fabricator Engine for the puzzlebox adventure core.
//!
//! The fabricator is the crafting station: the player moves held items into
//! its ingredient slots, selects a recipe learned from a collected note,
//! and runs a timed assembly that consumes the slot contents and places the
//! recipe's result into a dedicated result slot.
//!
//! # Matching Semantics
//!
//! `run` builds a boolean match vector over the recipe's required-item
//! list: an entry is satisfied when *some* slot currently holds that item.
//! This is an existence check, not a multiset count -- a requirement listed
//! twice is satisfied by a single matching slot. The behavior is preserved
//! exactly as shipped and pinned by
//! `duplicate_requirement_satisfied_by_single_slot`.
//!
//! # Busy Guard
//!
//! While an assembly is counting down, `run` and `hide` both fail. The
//! assembly runs to completion once started; closing the fabricator UI
//! must never interrupt it.

pub mod bridge;

use puzzlebox_core::context::PuzzleContext;
use puzzlebox_core::event::Event;
use puzzlebox_core::fixed::Ticks;
use puzzlebox_core::id::{ItemTypeId, PuzzleId, RecipeId};
use puzzlebox_core::inventory::ItemRoute;
use puzzlebox_core::slot::ItemSlot;
use puzzlebox_core::state::{Puzzle, PuzzleState, StateCell};

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// An in-flight timed assembly. Exists only between a successful `run` and
/// its completion tick.
#[derive(Debug, Clone, Copy)]
struct Assembly {
    recipe: RecipeId,
    remaining: Ticks,
}

// ---------------------------------------------------------------------------
// UI state
// ---------------------------------------------------------------------------

/// One row of the scrollable recipe list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RecipeRow {
    pub recipe: RecipeId,
    pub selected: bool,
}

/// Button/list state the presentation layer reads every frame.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FabricatorUiState {
    pub run_enabled: bool,
    pub back_enabled: bool,
    pub recipes: Vec<RecipeRow>,
}

// ---------------------------------------------------------------------------
// Fabricator
// ---------------------------------------------------------------------------

/// The crafting station puzzle.
pub struct Fabricator {
    id: PuzzleId,
    state: StateCell,
    slots: Vec<ItemSlot>,
    result_slot: ItemSlot,
    /// The selected recipe. `run` is a silent no-op without one.
    recipe: Option<RecipeId>,
    assembly: Option<Assembly>,
    /// Recipes derived from collected notes, refreshed on `show`.
    known_recipes: Vec<RecipeId>,
    world_suspended: bool,
}

impl std::fmt::Debug for Fabricator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fabricator")
            .field("id", &self.id)
            .field("state", &self.state.get())
            .field("slots", &self.slots)
            .field("result_slot", &self.result_slot)
            .field("recipe", &self.recipe)
            .field("processing", &self.assembly.is_some())
            .finish_non_exhaustive()
    }
}

impl Fabricator {
    /// Create a fabricator with `slot_count` ingredient slots plus the
    /// dedicated result slot.
    pub fn new(id: PuzzleId, slot_count: usize) -> Self {
        Self {
            id,
            state: StateCell::new(),
            slots: (0..slot_count).map(|_| ItemSlot::new()).collect(),
            result_slot: ItemSlot::new(),
            recipe: None,
            assembly: None,
            known_recipes: Vec::new(),
            world_suspended: false,
        }
    }

    pub fn id(&self) -> PuzzleId {
        self.id
    }

    pub fn state_cell(&mut self) -> &mut StateCell {
        &mut self.state
    }

    /// Whether a timed assembly is counting down.
    pub fn is_processing(&self) -> bool {
        self.assembly.is_some()
    }

    pub fn slots(&self) -> &[ItemSlot] {
        &self.slots
    }

    pub fn result_slot(&self) -> &ItemSlot {
        &self.result_slot
    }

    pub fn selected_recipe(&self) -> Option<RecipeId> {
        self.recipe
    }

    pub fn known_recipes(&self) -> &[RecipeId] {
        &self.known_recipes
    }

    /// Whether surrounding world interaction is suspended (UI open).
    pub fn world_suspended(&self) -> bool {
        self.world_suspended
    }

    /// Select the active recipe. No validation is performed; the caller is
    /// responsible for passing a recipe the player actually knows.
    pub fn load_recipe(&mut self, recipe: RecipeId) {
        self.recipe = Some(recipe);
    }

    /// Place an item into the first empty ingredient slot, scanning left to
    /// right. Returns `false` when every slot is occupied -- the caller must
    /// leave the item where it came from.
    pub fn add_ingredient(&mut self, item: ItemTypeId) -> bool {
        self.slots.iter_mut().any(|slot| slot.place(item))
    }

    /// Empty the first occupied slot holding exactly `item`. Returns
    /// `false` if no slot holds it.
    pub fn remove_ingredient(&mut self, item: ItemTypeId) -> bool {
        for slot in &mut self.slots {
            if slot.contains(item) {
                slot.take();
                return true;
            }
        }
        false
    }

    /// Empty the result slot if it holds exactly `item`.
    pub fn remove_result(&mut self, item: ItemTypeId) -> bool {
        if self.result_slot.contains(item) {
            self.result_slot.take();
            return true;
        }
        false
    }

    /// Attempt to start the assembly. Silent no-op without a selected
    /// recipe; fails without mutation when the slot contents do not match
    /// or an assembly is already counting down.
    pub fn run(&mut self, ctx: &mut PuzzleContext<'_>) -> bool {
        if self.assembly.is_some() {
            return false;
        }
        let Some(recipe_id) = self.recipe else {
            return false;
        };
        let Some(recipe) = ctx.registry.get_recipe(recipe_id) else {
            return false;
        };

        // One match entry per required item: satisfied when some slot holds
        // that item. Existence, not count -- see the module docs.
        let all_match = recipe
            .required_items
            .iter()
            .all(|required| self.slots.iter().any(|slot| slot.contains(*required)));

        if !all_match {
            ctx.events.emit(Event::RunRejected {
                puzzle: self.id,
                recipe: recipe_id,
                tick: ctx.tick,
            });
            return false;
        }

        for slot in &mut self.slots {
            slot.take();
        }
        self.assembly = Some(Assembly {
            recipe: recipe_id,
            remaining: recipe.fabrication_time,
        });
        ctx.events.emit(Event::FabricationStarted {
            puzzle: self.id,
            recipe: recipe_id,
            tick: ctx.tick,
        });
        true
    }

    /// Advance the in-flight assembly by one tick. On expiry the recipe's
    /// result lands in the result slot and the processing flag clears.
    pub fn tick(&mut self, ctx: &mut PuzzleContext<'_>) {
        let Some(assembly) = &mut self.assembly else {
            return;
        };
        assembly.remaining = assembly.remaining.saturating_sub(1);
        if assembly.remaining > 0 {
            return;
        }
        let recipe_id = assembly.recipe;
        self.assembly = None;
        let Some(recipe) = ctx.registry.get_recipe(recipe_id) else {
            return;
        };
        self.result_slot.take();
        self.result_slot.place(recipe.result);
        ctx.events.emit(Event::FabricationCompleted {
            puzzle: self.id,
            result: recipe.result,
            tick: ctx.tick,
        });
    }

    /// Button/list state for the presentation layer. Run and back are both
    /// gated on the processing flag; the selected recipe's row is marked.
    pub fn ui_state(&self) -> FabricatorUiState {
        FabricatorUiState {
            run_enabled: !self.is_processing(),
            back_enabled: !self.is_processing(),
            recipes: self
                .known_recipes
                .iter()
                .map(|recipe| RecipeRow {
                    recipe: *recipe,
                    selected: self.recipe == Some(*recipe),
                })
                .collect(),
        }
    }

    fn emit_transition(
        &mut self,
        ctx: &mut PuzzleContext<'_>,
        transition: Option<(PuzzleState, PuzzleState)>,
    ) {
        if let Some((from, to)) = transition {
            ctx.events.emit(Event::StateChanged {
                puzzle: self.id,
                from,
                to,
                tick: ctx.tick,
            });
        }
    }

    /// Return every held slot item (ingredients and result) to the player
    /// inventory. Nothing may be silently destroyed on close.
    fn flush_slots(&mut self, ctx: &mut PuzzleContext<'_>) {
        for index in 0..self.slots.len() {
            if let Some(item) = self.slots[index].take() {
                ctx.inventory.add_item(item);
                ctx.events.emit(Event::ItemReturned {
                    puzzle: self.id,
                    item,
                    tick: ctx.tick,
                });
            }
        }
        if let Some(item) = self.result_slot.take() {
            ctx.inventory.add_item(item);
            ctx.events.emit(Event::ItemReturned {
                puzzle: self.id,
                item,
                tick: ctx.tick,
            });
        }
    }
}

impl Puzzle for Fabricator {
    fn state(&self) -> PuzzleState {
        self.state.get()
    }

    fn is_busy(&self) -> bool {
        self.is_processing()
    }

    /// Open the fabricator UI: suspend the surrounding world, bind
    /// inventory clicks to this fabricator, derive the recipe list from
    /// the player's recipe-bearing notes, and auto-select the first entry.
    fn show(&mut self, ctx: &mut PuzzleContext<'_>) {
        let transition = self.state.set(PuzzleState::Active);
        self.emit_transition(ctx, transition);

        self.world_suspended = true;
        ctx.inventory.set_route(Some(ItemRoute::ToFabricator));
        for slot in &mut self.slots {
            slot.set_route(Some(ItemRoute::ToInventory));
        }
        self.result_slot.set_route(Some(ItemRoute::ToInventory));

        self.known_recipes = ctx.notebook.known_recipes(ctx.registry);
        self.recipe = self.known_recipes.first().copied();
    }

    /// Close the fabricator UI. Refuses while an assembly is counting
    /// down. Otherwise flushes every slot back into the inventory, unbinds
    /// the inventory route, and restores the world.
    fn hide(&mut self, ctx: &mut PuzzleContext<'_>) -> bool {
        if self.is_processing() {
            return false;
        }
        self.flush_slots(ctx);
        ctx.inventory.set_route(None);
        self.world_suspended = false;
        let transition = self.state.set(PuzzleState::Idle);
        self.emit_transition(ctx, transition);
        true
    }
}

// ===========================================================================
// Tests
// ===========================================================================
