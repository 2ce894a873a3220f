use serde::{Deserialize, Serialize};

/// Identifies an item type in the registry. Items are interchangeable value
/// tokens -- nothing in the core owns an item beyond holding its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemTypeId(pub u32);

/// Identifies a recipe in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub u32);

/// Identifies a note in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(pub u32);

/// Identifies a puzzle instance. Assigned by game code at construction and
/// carried in event payloads so listeners can tell puzzles apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PuzzleId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_id_equality() {
        assert_eq!(ItemTypeId(0), ItemTypeId(0));
        assert_ne!(ItemTypeId(0), ItemTypeId(1));
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ItemTypeId(0), "wire_spool");
        map.insert(ItemTypeId(1), "battery");
        assert_eq!(map[&ItemTypeId(1)], "battery");
    }

    #[test]
    fn puzzle_id_copy() {
        let a = PuzzleId(3);
        let b = a;
        assert_eq!(a, b);
    }
}
