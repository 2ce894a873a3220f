//! Puzzlebox Core -- the gameplay kernel for a first-person puzzle adventure.
//!
//! This crate provides the shared pieces every puzzle in the game depends on:
//! the puzzle state machine, the cooperative timer scheduler, the variable
//! store, the player inventory and item slots, the note book, the immutable
//! content registry, and the typed event bus.
//!
//! # Tick Model
//!
//! All gameplay logic runs on one logical update thread. The host engine
//! calls each active puzzle's `tick` at a fixed rate ([`fixed::TICK_RATE`]
//! ticks per second). Anything the original game expressed as a coroutine
//! wait is explicit timer state here: a [`timer::Timers`] entry counts down
//! and the owning puzzle reacts when it expires. Between timer boundaries
//! every operation is atomic, so busy flags (fabrication in progress, camera
//! transition running) are the only re-entrancy guards required.
//!
//! # Key Types
//!
//! - [`state::StateCell`] -- puzzle state with change notification.
//! - [`state::Puzzle`] -- show/hide contract with the busy guard.
//! - [`timer::Timers`] -- suspended waits keyed by remaining ticks.
//! - [`vars::VarStore`] -- persisted string flags ("<name>_unlocked" etc.).
//! - [`inventory::Inventory`] -- ordered held items with a routing tag.
//! - [`slot::ItemSlot`] -- a single-item placement point.
//! - [`registry::Registry`] -- immutable items, recipes, and notes.
//! - [`event::EventBus`] -- ring-buffered notifications for the host.
//! - [`context::PuzzleContext`] -- explicit dependencies passed into every
//!   puzzle entry point (no global singletons).

pub mod context;
pub mod event;
pub mod fixed;
pub mod id;
pub mod inventory;
pub mod notebook;
pub mod registry;
pub mod slot;
pub mod state;
pub mod timer;
pub mod vars;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
