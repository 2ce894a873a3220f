//! Resolution pipeline: reads data files, resolves cross-references, builds
//! the registry and puzzle configurations.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers, plus [`load_game_data`] which ties them into
//! one loading pass over a content directory.

use crate::schema::{ItemData, NoteData, RecipeData, SecuredBoxData, WireBoxData};
use puzzlebox_core::fixed::seconds_to_ticks;
use puzzlebox_core::registry::{Registry, RegistryBuilder};
use puzzlebox_interaction::secured_box::SecuredBoxConfig;
use puzzlebox_wirebox::geometry::Vec3;
use puzzlebox_wirebox::WireBoxConfig;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: &'static str, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without
/// extension). Returns `Ok(None)` if no file is found, or
/// `Err(ConflictingFormats)` if multiple formats exist for the same base
/// name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Read a file and deserialize it according to its format.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. For TOML files, extracts the array at
/// the given `toml_key` from a top-level table. For RON and JSON,
/// deserializes directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let table: toml::Value = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

/// Load a list file if it exists; an absent file yields an empty list.
fn load_optional_list<T: DeserializeOwned>(
    dir: &Path,
    base_name: &str,
    toml_key: &str,
) -> Result<(Vec<T>, PathBuf), DataLoadError> {
    match find_data_file(dir, base_name)? {
        Some(path) => {
            let list = deserialize_list(&path, toml_key)?;
            Ok((list, path))
        }
        None => Ok((Vec::new(), dir.join(base_name))),
    }
}

// ===========================================================================
// Game data
// ===========================================================================

/// Everything a content directory defines: the frozen registry plus the
/// per-puzzle configurations.
#[derive(Debug)]
pub struct GameData {
    pub registry: Registry,
    pub wirebox: Option<WireBoxConfig>,
    pub secured_boxes: Vec<SecuredBoxConfig>,
}

/// Load a content directory. `items` is required; `recipes`, `notes`,
/// `wirebox`, and `secured_boxes` are optional.
pub fn load_game_data(dir: &Path) -> Result<GameData, DataLoadError> {
    let items_path =
        find_data_file(dir, "items")?.ok_or_else(|| DataLoadError::MissingRequired {
            file: "items",
            dir: dir.to_path_buf(),
        })?;
    let items: Vec<ItemData> = deserialize_list(&items_path, "items")?;

    let (recipes, recipes_path): (Vec<RecipeData>, _) =
        load_optional_list(dir, "recipes", "recipes")?;
    let (notes, notes_path): (Vec<NoteData>, _) = load_optional_list(dir, "notes", "notes")?;

    let mut builder = RegistryBuilder::new();
    let mut seen = HashSet::new();

    for item in &items {
        if !seen.insert(item.name.clone()) {
            return Err(DataLoadError::DuplicateName {
                file: items_path.clone(),
                name: item.name.clone(),
            });
        }
        builder.register_item(&item.name, &item.description);
    }

    seen.clear();
    for recipe in &recipes {
        if !seen.insert(recipe.name.clone()) {
            return Err(DataLoadError::DuplicateName {
                file: recipes_path.clone(),
                name: recipe.name.clone(),
            });
        }
        let required = recipe
            .required_items
            .iter()
            .map(|name| resolve_item(&builder, name, &recipes_path))
            .collect::<Result<Vec<_>, _>>()?;
        let result = resolve_item(&builder, &recipe.result, &recipes_path)?;
        builder.register_recipe(
            &recipe.name,
            recipe.screen_name.as_deref().unwrap_or(&recipe.name),
            required,
            seconds_to_ticks(recipe.fabrication_seconds),
            result,
        );
    }

    seen.clear();
    for note in &notes {
        if !seen.insert(note.name.clone()) {
            return Err(DataLoadError::DuplicateName {
                file: notes_path.clone(),
                name: note.name.clone(),
            });
        }
        let recipe = note
            .recipe
            .as_deref()
            .map(|name| {
                builder
                    .recipe_id(name)
                    .ok_or_else(|| DataLoadError::UnresolvedRef {
                        file: notes_path.clone(),
                        name: name.to_string(),
                        expected_kind: "recipe",
                    })
            })
            .transpose()?;
        builder.register_note(
            &note.name,
            note.screen_name.as_deref().unwrap_or(&note.name),
            &note.text,
            recipe,
        );
    }

    let wirebox = match find_data_file(dir, "wirebox")? {
        Some(path) => {
            let data: WireBoxData = deserialize_file(&path)?;
            Some(resolve_wirebox(&data))
        }
        None => None,
    };

    let mut secured_boxes = Vec::new();
    let (boxes, boxes_path): (Vec<SecuredBoxData>, _) =
        load_optional_list(dir, "secured_boxes", "secured_boxes")?;
    for data in &boxes {
        let hidden_item = data
            .hidden_item
            .as_deref()
            .map(|name| resolve_item(&builder, name, &boxes_path))
            .transpose()?;
        let note = data
            .note
            .as_deref()
            .map(|name| {
                builder
                    .note_id(name)
                    .ok_or_else(|| DataLoadError::UnresolvedRef {
                        file: boxes_path.clone(),
                        name: name.to_string(),
                        expected_kind: "note",
                    })
            })
            .transpose()?;
        secured_boxes.push(SecuredBoxConfig {
            item_name: data.name.clone(),
            overview_info: data.overview_info.clone(),
            safe_code: data.code.clone(),
            hidden_item,
            note,
        });
    }

    let registry = builder.build().map_err(|e| DataLoadError::Parse {
        file: dir.to_path_buf(),
        detail: e.to_string(),
    })?;

    Ok(GameData {
        registry,
        wirebox,
        secured_boxes,
    })
}

fn resolve_item(
    builder: &RegistryBuilder,
    name: &str,
    file: &Path,
) -> Result<puzzlebox_core::id::ItemTypeId, DataLoadError> {
    builder
        .item_id(name)
        .ok_or_else(|| DataLoadError::UnresolvedRef {
            file: file.to_path_buf(),
            name: name.to_string(),
            expected_kind: "item",
        })
}

fn resolve_wirebox(data: &WireBoxData) -> WireBoxConfig {
    let defaults = WireBoxConfig::default();
    let ticks_or = |seconds: Option<f64>, default| match seconds {
        Some(s) => seconds_to_ticks(s),
        None => default,
    };
    WireBoxConfig {
        start_point: Vec3::from_f64(data.start_point[0], data.start_point[1], data.start_point[2]),
        target_point: Vec3::from_f64(
            data.target_point[0],
            data.target_point[1],
            data.target_point[2],
        ),
        check_distance: puzzlebox_core::fixed::f64_to_fixed64(data.check_distance),
        open_delay: ticks_or(data.open_delay_seconds, defaults.open_delay),
        tutorial_delay: ticks_or(data.tutorial_delay_seconds, defaults.tutorial_delay),
        complete_door_delay: ticks_or(
            data.complete_door_delay_seconds,
            defaults.complete_door_delay,
        ),
        complete_finish_delay: ticks_or(
            data.complete_finish_delay_seconds,
            defaults.complete_finish_delay,
        ),
        abort_door_delay: ticks_or(data.abort_door_delay_seconds, defaults.abort_door_delay),
        view_swap_time: ticks_or(data.view_swap_seconds, defaults.view_swap_time),
        off_objects: data.off_objects.clone(),
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "puzzlebox_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    // -----------------------------------------------------------------------
    // detect_format / find_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("items.ron")).unwrap(), Format::Ron);
        assert_eq!(
            detect_format(Path::new("items.toml")).unwrap(),
            Format::Toml
        );
        assert_eq!(
            detect_format(Path::new("items.json")).unwrap(),
            Format::Json
        );
    }

    #[test]
    fn detect_format_unsupported() {
        assert!(matches!(
            detect_format(Path::new("items.yaml")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            detect_format(Path::new("items")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("conflict");
        fs::write(dir.join("items.ron"), "[]").unwrap();
        fs::write(dir.join("items.json"), "[]").unwrap();
        assert!(matches!(
            find_data_file(&dir, "items"),
            Err(DataLoadError::ConflictingFormats { .. })
        ));
        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_game_data
    // -----------------------------------------------------------------------

    fn write_ron_content(dir: &Path) {
        fs::write(
            dir.join("items.ron"),
            r#"[
                (name: "wire_spool", description: "a spool of copper wire"),
                (name: "battery"),
                (name: "desk_lamp"),
                (name: "brass_key"),
            ]"#,
        )
        .unwrap();
        fs::write(
            dir.join("recipes.ron"),
            r#"[
                (
                    name: "desk_lamp",
                    screen_name: Some("Desk lamp"),
                    required_items: ["wire_spool", "battery"],
                    fabrication_seconds: 3.0,
                    result: "desk_lamp",
                ),
            ]"#,
        )
        .unwrap();
        fs::write(
            dir.join("notes.ron"),
            r#"[
                (name: "diary_page", text: "day 14"),
                (name: "lamp_receipt", recipe: Some("desk_lamp")),
            ]"#,
        )
        .unwrap();
    }

    #[test]
    fn load_ron_content_directory() {
        let dir = make_test_dir("load_ron");
        write_ron_content(&dir);

        let data = load_game_data(&dir).unwrap();
        assert_eq!(data.registry.item_count(), 4);
        assert_eq!(data.registry.recipe_count(), 1);
        assert_eq!(data.registry.note_count(), 2);

        let recipe = data
            .registry
            .get_recipe(data.registry.recipe_id("desk_lamp").unwrap())
            .unwrap();
        assert_eq!(recipe.screen_name, "Desk lamp");
        assert_eq!(recipe.fabrication_time, 180);
        assert_eq!(recipe.required_items.len(), 2);

        let note = data
            .registry
            .get_note(data.registry.note_id("lamp_receipt").unwrap())
            .unwrap();
        assert!(note.is_recipe());

        cleanup(&dir);
    }

    #[test]
    fn load_json_items_only() {
        let dir = make_test_dir("load_json");
        fs::write(
            dir.join("items.json"),
            r#"[{"name": "wire_spool"}, {"name": "battery"}]"#,
        )
        .unwrap();

        let data = load_game_data(&dir).unwrap();
        assert_eq!(data.registry.item_count(), 2);
        assert_eq!(data.registry.recipe_count(), 0);
        assert!(data.wirebox.is_none());
        assert!(data.secured_boxes.is_empty());

        cleanup(&dir);
    }

    #[test]
    fn load_toml_lists_under_keys() {
        let dir = make_test_dir("load_toml");
        fs::write(
            dir.join("items.toml"),
            r#"
            [[items]]
            name = "wire_spool"

            [[items]]
            name = "desk_lamp"
            "#,
        )
        .unwrap();
        fs::write(
            dir.join("recipes.toml"),
            r#"
            [[recipes]]
            name = "desk_lamp"
            required_items = ["wire_spool"]
            fabrication_seconds = 1.5
            result = "desk_lamp"
            "#,
        )
        .unwrap();

        let data = load_game_data(&dir).unwrap();
        let recipe = data
            .registry
            .get_recipe(data.registry.recipe_id("desk_lamp").unwrap())
            .unwrap();
        // screen_name falls back to the recipe name.
        assert_eq!(recipe.screen_name, "desk_lamp");
        assert_eq!(recipe.fabrication_time, 90);

        cleanup(&dir);
    }

    #[test]
    fn missing_items_file_is_required() {
        let dir = make_test_dir("missing_items");
        assert!(matches!(
            load_game_data(&dir),
            Err(DataLoadError::MissingRequired { file: "items", .. })
        ));
        cleanup(&dir);
    }

    #[test]
    fn duplicate_item_name_rejected() {
        let dir = make_test_dir("dup_item");
        fs::write(
            dir.join("items.ron"),
            r#"[(name: "wire_spool"), (name: "wire_spool")]"#,
        )
        .unwrap();
        match load_game_data(&dir) {
            Err(DataLoadError::DuplicateName { name, .. }) => assert_eq!(name, "wire_spool"),
            other => panic!("expected DuplicateName, got: {other:?}"),
        }
        cleanup(&dir);
    }

    #[test]
    fn unresolved_recipe_ingredient_rejected() {
        let dir = make_test_dir("unresolved_item");
        fs::write(dir.join("items.ron"), r#"[(name: "desk_lamp")]"#).unwrap();
        fs::write(
            dir.join("recipes.ron"),
            r#"[(
                name: "desk_lamp",
                required_items: ["unobtainium"],
                fabrication_seconds: 1.0,
                result: "desk_lamp",
            )]"#,
        )
        .unwrap();
        match load_game_data(&dir) {
            Err(DataLoadError::UnresolvedRef {
                name,
                expected_kind,
                ..
            }) => {
                assert_eq!(name, "unobtainium");
                assert_eq!(expected_kind, "item");
            }
            other => panic!("expected UnresolvedRef, got: {other:?}"),
        }
        cleanup(&dir);
    }

    #[test]
    fn unresolved_note_recipe_rejected() {
        let dir = make_test_dir("unresolved_recipe");
        fs::write(dir.join("items.ron"), r#"[(name: "wire_spool")]"#).unwrap();
        fs::write(
            dir.join("notes.ron"),
            r#"[(name: "lamp_receipt", recipe: Some("desk_lamp"))]"#,
        )
        .unwrap();
        assert!(matches!(
            load_game_data(&dir),
            Err(DataLoadError::UnresolvedRef {
                expected_kind: "recipe",
                ..
            })
        ));
        cleanup(&dir);
    }

    #[test]
    fn wirebox_config_resolves_with_defaults() {
        let dir = make_test_dir("wirebox");
        fs::write(dir.join("items.ron"), "[]").unwrap();
        fs::write(
            dir.join("wirebox.ron"),
            r#"(
                start_point: [0.0, 0.0, 0.0],
                target_point: [10.0, 0.0, 0.0],
                check_distance: 0.1,
                off_objects: ["player"],
                view_swap_seconds: Some(2.0),
            )"#,
        )
        .unwrap();

        let data = load_game_data(&dir).unwrap();
        let config = data.wirebox.unwrap();
        assert_eq!(config.view_swap_time, 120);
        // Unspecified waits keep the shipped defaults.
        assert_eq!(config.open_delay, 30);
        assert_eq!(config.abort_door_delay, 12);
        assert_eq!(config.off_objects, vec!["player".to_string()]);
        cleanup(&dir);
    }

    #[test]
    fn secured_boxes_resolve_against_registry() {
        let dir = make_test_dir("secured");
        fs::write(
            dir.join("items.ron"),
            r#"[(name: "wire_spool"), (name: "brass_key"), (name: "desk_lamp")]"#,
        )
        .unwrap();
        fs::write(
            dir.join("recipes.ron"),
            r#"[(
                name: "desk_lamp",
                required_items: ["wire_spool"],
                fabrication_seconds: 1.0,
                result: "desk_lamp",
            )]"#,
        )
        .unwrap();
        fs::write(
            dir.join("notes.ron"),
            r#"[(name: "lamp_receipt", recipe: Some("desk_lamp"))]"#,
        )
        .unwrap();
        fs::write(
            dir.join("secured_boxes.ron"),
            r#"[(
                name: "supply_box",
                overview_info: "a steel box",
                code: "4812",
                hidden_item: Some("brass_key"),
                note: Some("lamp_receipt"),
            )]"#,
        )
        .unwrap();

        let data = load_game_data(&dir).unwrap();
        assert_eq!(data.secured_boxes.len(), 1);
        let secured = &data.secured_boxes[0];
        assert_eq!(secured.item_name, "supply_box");
        assert_eq!(secured.safe_code, "4812");
        assert_eq!(secured.hidden_item, data.registry.item_id("brass_key"));
        assert_eq!(secured.note, data.registry.note_id("lamp_receipt"));
        cleanup(&dir);
    }
}
