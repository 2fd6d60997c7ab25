//! Configuration shared by the assembler, the boundary rendering and scan descriptions.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::LoadError;

/// Marker written into `axes` for a dimension without a default axis.
pub const DEFAULT_PLACEHOLDER: &str = ".";

/// Group under which device fields are stored unless a device says otherwise.
pub const DEFAULT_INSTRUMENT_ROOT: &str = "/entry/instrument";

// ─────────────────────────────────────────────────────────────────────────────
// AxisLabel
// ─────────────────────────────────────────────────────────────────────────────

/// How the default field of a multi-field device is labelled in `axes`.
///
/// Single-field devices are always labelled with the device name, which is
/// also their field name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisLabel {
    /// `<device>_<field>`, the same name the field entry is stored under.
    #[default]
    Qualified,
    /// The bare device name. The default field is recorded under its
    /// qualified name and again under the device name, both linking to the
    /// same target, so the `axes` entry names an existing node.
    DeviceName,
}

// ─────────────────────────────────────────────────────────────────────────────
// LayoutConfig
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Rendering of empty `axes` slots.
    pub placeholder: String,
    /// Root used when deriving source paths of device fields.
    pub instrument_root: String,
    pub default_axis_label: AxisLabel,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            instrument_root: DEFAULT_INSTRUMENT_ROOT.to_string(),
            default_axis_label: AxisLabel::Qualified,
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        read_by_extension(path)
    }
}

/// Read and deserialize a file, choosing the format from its extension.
pub(crate) fn read_by_extension<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match extension.as_str() {
        "json" => {
            let txt = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&txt)?)
        }
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => {
            let txt = std::fs::read_to_string(path)?;
            Ok(serde_yaml::from_str(&txt)?)
        }
        _ => Err(LoadError::UnsupportedFormat { extension }),
    }
}
