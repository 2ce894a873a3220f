//! Puzzle state machine shared by every puzzle variant.
//!
//! A puzzle's lifecycle is a small enum ([`PuzzleState`]) held in a
//! [`StateCell`]. Setting the cell skips redundant writes, notifies
//! registered observers synchronously with `(previous, current)`, and
//! returns the transition so the owning puzzle can apply side effects in
//! the same call.

use crate::context::PuzzleContext;

// ---------------------------------------------------------------------------
// PuzzleState
// ---------------------------------------------------------------------------

/// Lifecycle state of a puzzle. `Complete` is terminal: no modeled flow
/// transitions out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum PuzzleState {
    #[default]
    Idle,
    Active,
    Complete,
}

// ---------------------------------------------------------------------------
// StateCell
// ---------------------------------------------------------------------------

/// Observer invoked on every state transition with `(previous, current)`.
pub type StateObserver = Box<dyn FnMut(PuzzleState, PuzzleState)>;

/// Holds a puzzle's current state and its change observers.
pub struct StateCell {
    current: PuzzleState,
    observers: Vec<StateObserver>,
}

impl std::fmt::Debug for StateCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCell")
            .field("current", &self.current)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCell {
    pub fn new() -> Self {
        Self {
            current: PuzzleState::Idle,
            observers: Vec::new(),
        }
    }

    pub fn get(&self) -> PuzzleState {
        self.current
    }

    /// Set the state. A redundant write is skipped entirely: no observer
    /// fires and `None` is returned. On an actual change, observers run
    /// synchronously before this returns, then the `(previous, current)`
    /// pair is handed back to the caller.
    pub fn set(&mut self, new: PuzzleState) -> Option<(PuzzleState, PuzzleState)> {
        if self.current == new {
            return None;
        }
        let prev = self.current;
        self.current = new;
        for observer in &mut self.observers {
            observer(prev, new);
        }
        Some((prev, new))
    }

    /// Register a change observer. Observers fire in registration order.
    pub fn on_change(&mut self, observer: StateObserver) {
        self.observers.push(observer);
    }
}

// ---------------------------------------------------------------------------
// Puzzle contract
// ---------------------------------------------------------------------------

/// The show/hide contract every puzzle variant implements.
///
/// `show` activates puzzle-specific UI and suspends surrounding world
/// interaction; `hide` reverses it. `hide` MUST refuse while a long-running
/// process (fabrication, a completion sequence) is in flight: it returns
/// `false` and changes nothing. State transitions triggered by UI must
/// never interrupt an in-flight timed operation.
pub trait Puzzle {
    fn state(&self) -> PuzzleState;

    /// Whether a timed process is currently running. While true, `hide`
    /// fails and re-entrant starts are rejected.
    fn is_busy(&self) -> bool {
        false
    }

    fn show(&mut self, ctx: &mut PuzzleContext<'_>);

    /// Returns `false` without any state change when the puzzle is busy.
    fn hide(&mut self, ctx: &mut PuzzleContext<'_>) -> bool;
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn default_state_is_idle() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), PuzzleState::Idle);
    }

    #[test]
    fn set_changes_state_and_reports_transition() {
        let mut cell = StateCell::new();
        let transition = cell.set(PuzzleState::Active);
        assert_eq!(transition, Some((PuzzleState::Idle, PuzzleState::Active)));
        assert_eq!(cell.get(), PuzzleState::Active);
    }

    #[test]
    fn redundant_set_is_skipped() {
        let mut cell = StateCell::new();
        let seen = Rc::new(RefCell::new(0u32));
        let counter = Rc::clone(&seen);
        cell.on_change(Box::new(move |_, _| *counter.borrow_mut() += 1));

        assert!(cell.set(PuzzleState::Idle).is_none());
        assert_eq!(*seen.borrow(), 0);

        assert!(cell.set(PuzzleState::Active).is_some());
        assert!(cell.set(PuzzleState::Active).is_none());
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn observers_receive_prev_and_current() {
        let mut cell = StateCell::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        cell.on_change(Box::new(move |prev, current| {
            log.borrow_mut().push((prev, current));
        }));

        cell.set(PuzzleState::Active);
        cell.set(PuzzleState::Complete);

        assert_eq!(
            *seen.borrow(),
            vec![
                (PuzzleState::Idle, PuzzleState::Active),
                (PuzzleState::Active, PuzzleState::Complete),
            ]
        );
    }

    #[test]
    fn observers_fire_in_registration_order() {
        let mut cell = StateCell::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let log = Rc::clone(&seen);
            cell.on_change(Box::new(move |_, _| log.borrow_mut().push(tag)));
        }
        cell.set(PuzzleState::Active);
        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }
}
