//! Save and load finished layouts as JSON.
//!
//! Loaded layouts are re-validated, so a hand-edited file cannot yield a
//! layout that breaks the index invariants.

use std::path::Path;

use crate::data::layout::NxDataLayout;
use crate::errors::LoadError;

/// Serialize a layout as pretty JSON.
pub fn layout_to_json(layout: &NxDataLayout) -> Result<String, LoadError> {
    Ok(serde_json::to_string_pretty(layout)?)
}

/// Deserialize and validate a layout from JSON.
pub fn layout_from_json(json: &str) -> Result<NxDataLayout, LoadError> {
    let layout: NxDataLayout = serde_json::from_str(json)?;
    layout.validate()?;
    Ok(layout)
}

/// Save a layout to a JSON file at the given path.
pub fn save_layout_to_path(layout: &NxDataLayout, path: &Path) -> Result<(), LoadError> {
    let txt = layout_to_json(layout)?;
    std::fs::write(path, txt)?;
    Ok(())
}

/// Load a layout from a JSON file at the given path.
pub fn load_layout_from_path(path: &Path) -> Result<NxDataLayout, LoadError> {
    let txt = std::fs::read_to_string(path)?;
    layout_from_json(&txt)
}
