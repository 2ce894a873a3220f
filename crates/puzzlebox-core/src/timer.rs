//! Cooperative timer scheduler.
//!
//! The original game suspended coroutines on "wait for N seconds" points.
//! Here every suspended wait is explicit state: a slotmap entry counting
//! down remaining ticks. The owner calls [`Timers::tick`] once per update
//! and reacts to the ids that expired. Nothing blocks; between `tick`
//! calls every gameplay operation is atomic.

use crate::fixed::Ticks;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Identifies a pending timer.
    pub struct TimerId;
}

/// A set of pending waits keyed by remaining ticks.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    pending: SlotMap<TimerId, Ticks>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a wait. A zero duration expires on the next `tick` call.
    pub fn start(&mut self, duration: Ticks) -> TimerId {
        self.pending.insert(duration)
    }

    /// Advance all timers by one tick. Returns the ids that expired this
    /// tick, in insertion order; expired timers are removed.
    pub fn tick(&mut self) -> Vec<TimerId> {
        let mut expired = Vec::new();
        for (id, remaining) in &mut self.pending {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                expired.push(id);
            }
        }
        for id in &expired {
            self.pending.remove(*id);
        }
        expired
    }

    /// Cancel a pending timer. Returns `false` if it already expired.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(id).is_some()
    }

    pub fn is_running(&self, id: TimerId) -> bool {
        self.pending.contains_key(id)
    }

    pub fn remaining(&self, id: TimerId) -> Option<Ticks> {
        self.pending.get(id).copied()
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
