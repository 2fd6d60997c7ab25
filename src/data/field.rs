use serde::{Deserialize, Serialize};

use crate::data::shape::Shape;

/// One named field exposed by a device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name local to its device (e.g. `data`, `value`, `rbv`).
    pub name: String,
    pub shape: Shape,
    /// Slash-separated location of the stored data, e.g. `/entry/instrument/x/value`.
    pub source_path: String,
    /// Whether this is the representative field of its device.
    #[serde(default)]
    pub is_default: bool,
}

impl FieldDescriptor {
    pub fn new<S: Into<String>, P: Into<String>>(name: S, shape: Shape, source_path: P) -> Self {
        Self {
            name: name.into(),
            shape,
            source_path: source_path.into(),
            is_default: false,
        }
    }

    /// Mark this field as the device's default field.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }
}

/// Join an instrument root, device name and field name into a source path.
pub fn instrument_path(root: &str, device: &str, field: &str) -> String {
    format!("{}/{}/{}", root.trim_end_matches('/'), device, field)
}
