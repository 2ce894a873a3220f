//! Serde data-file structs for game content definitions.
//!
//! These structs define the on-disk format for items, recipes, notes, and
//! puzzle configurations. They are deserialized from RON, JSON, or TOML
//! data files and then resolved into engine types by the loader. All
//! cross-references are by name; durations are in seconds and converted to
//! ticks at resolution time.

use serde::Deserialize;

// ===========================================================================
// Items
// ===========================================================================

/// An item definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// ===========================================================================
// Recipes
// ===========================================================================

/// A recipe definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub name: String,
    /// Display name; falls back to `name` when omitted.
    #[serde(default)]
    pub screen_name: Option<String>,
    pub required_items: Vec<String>,
    pub fabrication_seconds: f64,
    pub result: String,
}

// ===========================================================================
// Notes
// ===========================================================================

/// A note definition in a data file. A note referencing a recipe makes
/// that recipe selectable in the fabricator once collected.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteData {
    pub name: String,
    #[serde(default)]
    pub screen_name: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub recipe: Option<String>,
}

// ===========================================================================
// Wire box
// ===========================================================================

/// Wire-routing puzzle configuration in a data file. Points are `[x, y, z]`
/// in puzzle-local space; all waits are in seconds with the shipped timings
/// as defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct WireBoxData {
    pub start_point: [f64; 3],
    pub target_point: [f64; 3],
    pub check_distance: f64,
    #[serde(default)]
    pub off_objects: Vec<String>,
    #[serde(default)]
    pub open_delay_seconds: Option<f64>,
    #[serde(default)]
    pub tutorial_delay_seconds: Option<f64>,
    #[serde(default)]
    pub complete_door_delay_seconds: Option<f64>,
    #[serde(default)]
    pub complete_finish_delay_seconds: Option<f64>,
    #[serde(default)]
    pub abort_door_delay_seconds: Option<f64>,
    #[serde(default)]
    pub view_swap_seconds: Option<f64>,
}

// ===========================================================================
// Secured boxes
// ===========================================================================

/// A secured-box interaction definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct SecuredBoxData {
    pub name: String,
    #[serde(default)]
    pub overview_info: String,
    pub code: String,
    #[serde(default)]
    pub hidden_item: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}
