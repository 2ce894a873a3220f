//! Persisted game variables.
//!
//! A [`VarStore`] is a process-wide string key/value store with change
//! notification. Puzzles encode boolean unlock/possession state as string
//! flags under a naming convention: `"<name>_unlocked"`, `"<name>_taken"`.
//! Entries are created lazily on first write and live for the process's
//! life; the on-disk persistence format is the host's concern.

use std::collections::HashMap;

/// Suffix for "this lock has been opened" flags.
pub const UNLOCKED_SUFFIX: &str = "_unlocked";

/// Suffix for "this item/note has been granted" flags.
pub const TAKEN_SUFFIX: &str = "_taken";

/// Build the unlocked-flag key for a named item.
pub fn unlocked_key(name: &str) -> String {
    format!("{name}{UNLOCKED_SUFFIX}")
}

/// Build the taken-flag key for a named item or note.
pub fn taken_key(name: &str) -> String {
    format!("{name}{TAKEN_SUFFIX}")
}

/// Observer invoked with `(key, new_value)` on notified writes.
pub type VarObserver = Box<dyn FnMut(&str, &str)>;

/// String key/value store with change notification.
pub struct VarStore {
    vars: HashMap<String, String>,
    observers: Vec<VarObserver>,
}

impl std::fmt::Debug for VarStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VarStore")
            .field("vars", &self.vars)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for VarStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VarStore {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
            observers: Vec::new(),
        }
    }

    /// Read a variable. `None` if it was never written.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Write a variable, creating it if absent. Observers fire only when
    /// `notify` is set; they run synchronously, after the write, so a
    /// listener reading back the key sees the new value.
    pub fn set(&mut self, key: &str, value: &str, notify: bool) {
        self.vars.insert(key.to_string(), value.to_string());
        if notify {
            for observer in &mut self.observers {
                observer(key, value);
            }
        }
    }

    /// Read a variable as a boolean flag. Only the literal `"true"` counts;
    /// an absent or different value reads as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    /// Write a boolean flag (see [`VarStore::flag`]).
    pub fn set_flag(&mut self, key: &str, value: bool, notify: bool) {
        self.set(key, if value { "true" } else { "false" }, notify);
    }

    /// Register a change observer. Observers fire in registration order on
    /// every notified write.
    pub fn on_change(&mut self, observer: VarObserver) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
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

    #[test]
    fn unwritten_key_reads_none() {
        let store = VarStore::new();
        assert_eq!(store.get("safe_unlocked"), None);
        assert!(!store.flag("safe_unlocked"));
    }

    #[test]
    fn set_then_get() {
        let mut store = VarStore::new();
        store.set("safe_unlocked", "true", false);
        assert_eq!(store.get("safe_unlocked"), Some("true"));
        assert!(store.flag("safe_unlocked"));
    }

    #[test]
    fn only_literal_true_counts_as_flag() {
        let mut store = VarStore::new();
        store.set("door_unlocked", "TRUE", false);
        assert!(!store.flag("door_unlocked"));
        store.set("door_unlocked", "1", false);
        assert!(!store.flag("door_unlocked"));
    }

    #[test]
    fn notify_fires_observers_after_write() {
        let mut store = VarStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        store.on_change(Box::new(move |key, value| {
            log.borrow_mut().push((key.to_string(), value.to_string()));
        }));

        store.set("note_taken", "true", true);
        store.set("silent", "true", false);

        assert_eq!(
            *seen.borrow(),
            vec![("note_taken".to_string(), "true".to_string())]
        );
    }

    #[test]
    fn suffix_key_builders() {
        assert_eq!(unlocked_key("safe"), "safe_unlocked");
        assert_eq!(taken_key("blueprint_note"), "blueprint_note_taken");
    }

    #[test]
    fn set_flag_roundtrip() {
        let mut store = VarStore::new();
        store.set_flag("lamp_unlocked", true, false);
        assert!(store.flag("lamp_unlocked"));
        store.set_flag("lamp_unlocked", false, false);
        assert!(!store.flag("lamp_unlocked"));
        assert_eq!(store.get("lamp_unlocked"), Some("false"));
    }
}
