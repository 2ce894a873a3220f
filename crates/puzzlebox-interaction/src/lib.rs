//! Item interaction contract and the interactions built on it.
//!
//! An [`Interaction`] is the polymorphic trigger surface the player-action
//! loop consumes: it names the player state it requires, whether it is
//! currently enabled, what happens on activation, and how to re-derive its
//! enabled/visible status from persisted variables on load. Variants
//! compose sub-puzzles rather than inheriting; [`SecuredBoxInteraction`]
//! wires a [`CodeLock`] to unlock-flag persistence and one-shot grants.

pub mod code_lock;
pub mod secured_box;

pub use code_lock::CodeLock;
pub use secured_box::SecuredBoxInteraction;

use puzzlebox_core::context::PuzzleContext;
use puzzlebox_core::fixed::{seconds_to_ticks, Ticks};
use puzzlebox_core::vars::VarStore;

// ---------------------------------------------------------------------------
// Player state
// ---------------------------------------------------------------------------

/// The player controller state an interaction requires while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlayerState {
    Walk,
    Interact,
    TakeItem,
}

// ---------------------------------------------------------------------------
// Interaction contract
// ---------------------------------------------------------------------------

/// Capability contract for a world item the player can activate.
pub trait Interaction {
    /// The player state required while this interaction runs.
    fn required_state(&self) -> PlayerState;

    /// Whether the interaction is currently enabled.
    fn interactable(&self) -> bool;

    /// How long the player action holds before `interact` fires.
    fn interaction_time(&self) -> Ticks {
        seconds_to_ticks(1.0)
    }

    /// The activation entry point.
    fn interact(&mut self, ctx: &mut PuzzleContext<'_>);

    /// Re-derive enabled/visible status purely from persisted variables.
    /// Never re-runs grant side effects; calling it any number of times
    /// with unchanged variables yields the same outcome.
    fn load_state(&mut self, vars: &VarStore);

    /// Human-readable description shown when the player looks at the item.
    fn overview_info(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Take-item command
// ---------------------------------------------------------------------------

/// A one-shot player action: hold for the interaction's activation time,
/// then fire its `interact` entry point. The player-action loop drives
/// `update` once per tick until `completed` reports true.
#[derive(Debug, Clone, Copy, Default)]
pub struct TakeItemCommand {
    elapsed: Ticks,
    started: bool,
    completed: bool,
}

impl TakeItemCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlayerState {
        PlayerState::TakeItem
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Advance the command by one tick. Fires `interact` exactly once, on
    /// the tick the hold time elapses.
    pub fn update(&mut self, interaction: &mut dyn Interaction, ctx: &mut PuzzleContext<'_>) {
        if self.completed {
            return;
        }
        self.started = true;
        self.elapsed += 1;
        if self.elapsed >= interaction.interaction_time() {
            interaction.interact(ctx);
            self.completed = true;
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
