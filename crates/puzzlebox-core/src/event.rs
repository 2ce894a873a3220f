//! Typed event system with pre-allocated ring buffers.
//!
//! Events are the core's notification sink: every externally observable
//! thing a puzzle does -- a state transition, an item moving across a
//! system boundary, a door/animation trigger -- is emitted here for the
//! host (UI, audio, save code) to consume. Each event kind has its own
//! [`EventBuffer`] ring buffer with a configurable capacity, plus passive
//! listeners invoked synchronously on emit.
//!
//! Event kinds can be suppressed via [`EventBus::suppress`], which prevents
//! any allocation or recording for that kind.

use crate::fixed::Ticks;
use crate::id::{ItemTypeId, NoteId, PuzzleId, RecipeId};
use crate::state::PuzzleState;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A gameplay event. All events carry the tick at which they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // -- Puzzle lifecycle --
    StateChanged {
        puzzle: PuzzleId,
        from: PuzzleState,
        to: PuzzleState,
        tick: Ticks,
    },
    PuzzleCompleted {
        puzzle: PuzzleId,
        tick: Ticks,
    },
    /// Host-side door/animation/audio trigger fired by a puzzle sequence.
    DoorSequence {
        puzzle: PuzzleId,
        opening: bool,
        tick: Ticks,
    },

    // -- Fabrication --
    FabricationStarted {
        puzzle: PuzzleId,
        recipe: RecipeId,
        tick: Ticks,
    },
    FabricationCompleted {
        puzzle: PuzzleId,
        result: ItemTypeId,
        tick: Ticks,
    },
    /// `run` was invoked but the slot contents did not match the recipe.
    RunRejected {
        puzzle: PuzzleId,
        recipe: RecipeId,
        tick: Ticks,
    },

    // -- Items crossing system boundaries --
    ItemStored {
        puzzle: PuzzleId,
        item: ItemTypeId,
        tick: Ticks,
    },
    ItemReturned {
        puzzle: PuzzleId,
        item: ItemTypeId,
        tick: Ticks,
    },
    ItemGranted {
        item: ItemTypeId,
        tick: Ticks,
    },
    NoteAdded {
        note: NoteId,
        tick: Ticks,
    },

    // -- Variables --
    VarChanged {
        key: String,
        tick: Ticks,
    },

    // -- Wire chain --
    ChainExtended {
        puzzle: PuzzleId,
        segments: u32,
        tick: Ticks,
    },
    ChainCollided {
        puzzle: PuzzleId,
        tick: Ticks,
    },
    ChainReset {
        puzzle: PuzzleId,
        tick: Ticks,
    },
}

/// Discriminant tag for event types, used for suppression and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    StateChanged,
    PuzzleCompleted,
    DoorSequence,
    FabricationStarted,
    FabricationCompleted,
    RunRejected,
    ItemStored,
    ItemReturned,
    ItemGranted,
    NoteAdded,
    VarChanged,
    ChainExtended,
    ChainCollided,
    ChainReset,
}

/// Total number of event kinds.
const EVENT_KIND_COUNT: usize = 14;

impl Event {
    /// Get the discriminant kind for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::StateChanged { .. } => EventKind::StateChanged,
            Event::PuzzleCompleted { .. } => EventKind::PuzzleCompleted,
            Event::DoorSequence { .. } => EventKind::DoorSequence,
            Event::FabricationStarted { .. } => EventKind::FabricationStarted,
            Event::FabricationCompleted { .. } => EventKind::FabricationCompleted,
            Event::RunRejected { .. } => EventKind::RunRejected,
            Event::ItemStored { .. } => EventKind::ItemStored,
            Event::ItemReturned { .. } => EventKind::ItemReturned,
            Event::ItemGranted { .. } => EventKind::ItemGranted,
            Event::NoteAdded { .. } => EventKind::NoteAdded,
            Event::VarChanged { .. } => EventKind::VarChanged,
            Event::ChainExtended { .. } => EventKind::ChainExtended,
            Event::ChainCollided { .. } => EventKind::ChainCollided,
            Event::ChainReset { .. } => EventKind::ChainReset,
        }
    }
}

impl EventKind {
    /// Convert to usize index for array lookups.
    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// EventBuffer -- pre-allocated ring buffer
// ---------------------------------------------------------------------------

/// A pre-allocated ring buffer for events. Fixed capacity; when full, the
/// oldest events are dropped.
#[derive(Debug)]
pub struct EventBuffer {
    events: Vec<Option<Event>>,
    /// Write position (wraps around).
    head: usize,
    len: usize,
    /// Total events ever written (including dropped).
    total_written: u64,
}

impl EventBuffer {
    /// Create a new ring buffer with the given capacity.
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
            total_written: 0,
        }
    }

    /// Push an event. If full, the oldest event is dropped.
    pub fn push(&mut self, event: Event) {
        self.events[self.head] = Some(event);
        self.head = (self.head + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
        self.total_written += 1;
    }

    pub fn capacity(&self) -> usize {
        self.events.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total events written since creation (including dropped).
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Iterate over events in order from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        let start = if self.len < self.capacity() {
            0
        } else {
            // head points to the next write position, which is the oldest entry
            self.head
        };
        (0..self.len).filter_map(move |offset| {
            self.events[(start + offset) % self.capacity()].as_ref()
        })
    }

    /// Clear all events from the buffer.
    pub fn clear(&mut self) {
        for slot in &mut self.events {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// A passive listener receives events read-only, synchronously on emit.
pub type PassiveListener = Box<dyn FnMut(&Event)>;

const fn no_listeners() -> [Vec<PassiveListener>; EVENT_KIND_COUNT] {
    // Cannot use Default in const context, so we build it manually.
    [
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
    ]
}

/// The central event bus. Holds one ring buffer per event kind, listener
/// lists, and suppression flags.
pub struct EventBus {
    buffers: [Option<EventBuffer>; EVENT_KIND_COUNT],
    suppressed: [bool; EVENT_KIND_COUNT],
    listeners: [Vec<PassiveListener>; EVENT_KIND_COUNT],
    /// Default buffer capacity for lazily allocated event buffers.
    default_capacity: usize,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("buffers", &self.buffers)
            .field("suppressed", &self.suppressed)
            .field("default_capacity", &self.default_capacity)
            .finish_non_exhaustive()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl EventBus {
    /// Create a new event bus with the given default buffer capacity per kind.
    pub fn new(default_capacity: usize) -> Self {
        Self {
            buffers: Default::default(),
            suppressed: [false; EVENT_KIND_COUNT],
            listeners: no_listeners(),
            default_capacity,
        }
    }

    /// Suppress an event kind. Suppressed events are never buffered and
    /// never reach listeners.
    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = true;
        self.buffers[kind.index()] = None;
    }

    pub fn is_suppressed(&self, kind: EventKind) -> bool {
        self.suppressed[kind.index()]
    }

    /// Emit an event: buffer it and run this kind's listeners synchronously.
    /// No-ops entirely if the kind is suppressed.
    pub fn emit(&mut self, event: Event) {
        let idx = event.kind().index();
        if self.suppressed[idx] {
            return;
        }
        for listener in &mut self.listeners[idx] {
            listener(&event);
        }
        // Lazily allocate the buffer on first emit.
        if self.buffers[idx].is_none() {
            self.buffers[idx] = Some(EventBuffer::new(self.default_capacity));
        }
        if let Some(buffer) = &mut self.buffers[idx] {
            buffer.push(event);
        }
    }

    /// Register a passive listener for an event kind. Listeners are called
    /// in registration order on every emit of that kind.
    pub fn on(&mut self, kind: EventKind, listener: PassiveListener) {
        self.listeners[kind.index()].push(listener);
    }

    /// The buffered events of one kind, oldest first.
    pub fn events(&self, kind: EventKind) -> Vec<Event> {
        match &self.buffers[kind.index()] {
            Some(buffer) => buffer.iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Number of currently buffered events of one kind.
    pub fn count(&self, kind: EventKind) -> usize {
        self.buffers[kind.index()]
            .as_ref()
            .map_or(0, EventBuffer::len)
    }

    /// Clear the buffered events of one kind.
    pub fn clear(&mut self, kind: EventKind) {
        if let Some(buffer) = &mut self.buffers[kind.index()] {
            buffer.clear();
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn completed(puzzle: u32, tick: Ticks) -> Event {
        Event::PuzzleCompleted {
            puzzle: PuzzleId(puzzle),
            tick,
        }
    }

    #[test]
    fn emit_buffers_event() {
        let mut bus = EventBus::new(8);
        bus.emit(completed(0, 1));
        assert_eq!(bus.count(EventKind::PuzzleCompleted), 1);
        assert_eq!(bus.events(EventKind::PuzzleCompleted), vec![completed(0, 1)]);
    }

    #[test]
    fn kinds_are_buffered_separately() {
        let mut bus = EventBus::new(8);
        bus.emit(completed(0, 1));
        bus.emit(Event::ChainReset {
            puzzle: PuzzleId(0),
            tick: 2,
        });
        assert_eq!(bus.count(EventKind::PuzzleCompleted), 1);
        assert_eq!(bus.count(EventKind::ChainReset), 1);
        assert_eq!(bus.count(EventKind::ChainCollided), 0);
    }

    #[test]
    fn ring_buffer_drops_oldest_when_full() {
        let mut buffer = EventBuffer::new(2);
        buffer.push(completed(0, 1));
        buffer.push(completed(1, 2));
        buffer.push(completed(2, 3));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.total_written(), 3);
        let ticks: Vec<_> = buffer
            .iter()
            .map(|e| match e {
                Event::PuzzleCompleted { tick, .. } => *tick,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(ticks, vec![2, 3]);
    }

    #[test]
    fn zero_capacity_clamps_to_one() {
        let buffer = EventBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);
    }

    #[test]
    fn listeners_run_on_emit_in_order() {
        let mut bus = EventBus::new(8);
        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in ["ui", "audio"] {
            let log = Rc::clone(&seen);
            bus.on(
                EventKind::PuzzleCompleted,
                Box::new(move |_| log.borrow_mut().push(tag)),
            );
        }
        bus.emit(completed(0, 5));
        assert_eq!(*seen.borrow(), vec!["ui", "audio"]);
    }

    #[test]
    fn listeners_only_see_their_kind() {
        let mut bus = EventBus::new(8);
        let seen = Rc::new(RefCell::new(0u32));
        let counter = Rc::clone(&seen);
        bus.on(
            EventKind::ChainCollided,
            Box::new(move |_| *counter.borrow_mut() += 1),
        );
        bus.emit(completed(0, 1));
        assert_eq!(*seen.borrow(), 0);
        bus.emit(Event::ChainCollided {
            puzzle: PuzzleId(0),
            tick: 2,
        });
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn suppressed_kind_is_dropped_entirely() {
        let mut bus = EventBus::new(8);
        let seen = Rc::new(RefCell::new(0u32));
        let counter = Rc::clone(&seen);
        bus.on(
            EventKind::PuzzleCompleted,
            Box::new(move |_| *counter.borrow_mut() += 1),
        );
        bus.suppress(EventKind::PuzzleCompleted);
        bus.emit(completed(0, 1));
        assert!(bus.is_suppressed(EventKind::PuzzleCompleted));
        assert_eq!(bus.count(EventKind::PuzzleCompleted), 0);
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn clear_resets_one_kind() {
        let mut bus = EventBus::new(8);
        bus.emit(completed(0, 1));
        bus.emit(Event::ChainReset {
            puzzle: PuzzleId(0),
            tick: 2,
        });
        bus.clear(EventKind::PuzzleCompleted);
        assert_eq!(bus.count(EventKind::PuzzleCompleted), 0);
        assert_eq!(bus.count(EventKind::ChainReset), 1);
    }
}
