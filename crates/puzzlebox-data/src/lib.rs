//! Data-file loading for puzzlebox game content.
//!
//! Reads item, recipe, note, and puzzle definitions from a content
//! directory (RON, JSON, or TOML -- detected by extension), resolves name
//! references, and builds the immutable [`puzzlebox_core::registry::Registry`]
//! plus the per-puzzle configurations.

pub mod loader;
pub mod schema;

pub use loader::{load_game_data, DataLoadError, GameData};
