//! Code lock puzzle: digit entry against a configured combination.

use puzzlebox_core::context::PuzzleContext;
use puzzlebox_core::event::Event;
use puzzlebox_core::id::PuzzleId;
use puzzlebox_core::state::{Puzzle, PuzzleState, StateCell};

/// A combination lock. The owning interaction sets the password before
/// showing it; a correct submission transitions the lock to Complete, which
/// the owner observes to apply its unlock side effects.
pub struct CodeLock {
    id: PuzzleId,
    state: StateCell,
    password: String,
    entry: String,
    visible: bool,
}

impl std::fmt::Debug for CodeLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeLock")
            .field("id", &self.id)
            .field("state", &self.state.get())
            .field("entry_len", &self.entry.len())
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl CodeLock {
    pub fn new(id: PuzzleId) -> Self {
        Self {
            id,
            state: StateCell::new(),
            password: String::new(),
            entry: String::new(),
            visible: false,
        }
    }

    pub fn id(&self) -> PuzzleId {
        self.id
    }

    pub fn state_cell(&mut self) -> &mut StateCell {
        &mut self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Set the combination. Entry is cleared alongside.
    pub fn set_password(&mut self, password: &str) {
        self.password = password.to_string();
        self.entry.clear();
    }

    /// Append one digit to the current entry. Ignored once the lock is
    /// complete or while it is hidden.
    pub fn push_digit(&mut self, digit: char) {
        if self.state.get() == PuzzleState::Complete || !self.visible {
            return;
        }
        self.entry.push(digit);
    }

    pub fn clear_entry(&mut self) {
        self.entry.clear();
    }

    /// Check the current entry against the combination. A wrong entry is
    /// cleared so the player starts over; a correct one completes the lock.
    pub fn submit(&mut self, ctx: &mut PuzzleContext<'_>) -> bool {
        if self.state.get() == PuzzleState::Complete {
            return false;
        }
        if self.entry != self.password || self.password.is_empty() {
            self.entry.clear();
            return false;
        }
        if let Some((from, to)) = self.state.set(PuzzleState::Complete) {
            ctx.events.emit(Event::StateChanged {
                puzzle: self.id,
                from,
                to,
                tick: ctx.tick,
            });
            ctx.events.emit(Event::PuzzleCompleted {
                puzzle: self.id,
                tick: ctx.tick,
            });
        }
        true
    }
}

impl Puzzle for CodeLock {
    fn state(&self) -> PuzzleState {
        self.state.get()
    }

    fn show(&mut self, ctx: &mut PuzzleContext<'_>) {
        self.visible = true;
        if self.state.get() != PuzzleState::Complete
            && let Some((from, to)) = self.state.set(PuzzleState::Active)
        {
            ctx.events.emit(Event::StateChanged {
                puzzle: self.id,
                from,
                to,
                tick: ctx.tick,
            });
        }
    }

    /// Close the lock UI. An unsolved lock returns to Idle so its owner
    /// can restore the world item's highlight.
    fn hide(&mut self, ctx: &mut PuzzleContext<'_>) -> bool {
        self.visible = false;
        self.entry.clear();
        if self.state.get() != PuzzleState::Complete
            && let Some((from, to)) = self.state.set(PuzzleState::Idle)
        {
            ctx.events.emit(Event::StateChanged {
                puzzle: self.id,
                from,
                to,
                tick: ctx.tick,
            });
        }
        true
    }
}

// ===========================================================================
// Tests
// ===========================================================================
