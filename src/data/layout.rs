//! The finished NXdata layout and its boundary rendering.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::data::shape::Shape;
use crate::errors::{LayoutError, LayoutResult};

/// One slot of the ordered `axes` list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSlot {
    /// Name of the default axis for this signal dimension.
    Axis(String),
    /// No default axis declared for this dimension.
    Placeholder,
}

impl AxisSlot {
    pub fn name(&self) -> Option<&str> {
        match self {
            AxisSlot::Axis(name) => Some(name),
            AxisSlot::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, AxisSlot::Placeholder)
    }

    /// Render the slot, using `placeholder` for empty slots.
    pub fn render<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.name().unwrap_or(placeholder)
    }
}

impl fmt::Display for AxisSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(crate::config::DEFAULT_PLACEHOLDER))
    }
}

/// Shape, signal-dimension indices and link target of one emitted field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub shape: Shape,
    pub indices: Vec<usize>,
    pub target_path: String,
}

/// Output of the axis assembler: everything the group assembler needs to
/// write the `signal`, `axes` and `<field>_indices` attributes plus the links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NxDataLayout {
    signal_name: String,
    default_axes: Vec<AxisSlot>,
    fields: BTreeMap<String, FieldEntry>,
}

impl NxDataLayout {
    pub(crate) fn new(
        signal_name: String,
        default_axes: Vec<AxisSlot>,
        fields: BTreeMap<String, FieldEntry>,
    ) -> Self {
        Self {
            signal_name,
            default_axes,
            fields,
        }
    }

    pub fn signal_name(&self) -> &str {
        &self.signal_name
    }

    pub fn default_axes(&self) -> &[AxisSlot] {
        &self.default_axes
    }

    /// Names of the default axes, one per signal dimension, `None` for placeholders.
    pub fn axis_names(&self) -> Vec<Option<&str>> {
        self.default_axes.iter().map(AxisSlot::name).collect()
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldEntry> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.get(name)
    }

    /// Entry of the signal field.
    pub fn signal(&self) -> Option<&FieldEntry> {
        self.fields.get(&self.signal_name)
    }

    pub fn signal_rank(&self) -> usize {
        self.default_axes.len()
    }

    /// Fields that carry indices but hold no default-axis slot (the signal excluded).
    /// A field recorded under a second name for a slot counts as slotted.
    pub fn auxiliary_fields(&self) -> impl Iterator<Item = (&String, &FieldEntry)> {
        let slotted: BTreeSet<&str> = self
            .default_axes
            .iter()
            .filter_map(AxisSlot::name)
            .filter_map(|name| self.fields.get(name))
            .map(|entry| entry.target_path.as_str())
            .collect();
        self.fields.iter().filter(move |(name, entry)| {
            *name != &self.signal_name && !slotted.contains(entry.target_path.as_str())
        })
    }

    /// Re-check the layout invariants. Layouts produced by the assembler always
    /// pass; this guards layouts loaded from storage.
    pub fn validate(&self) -> LayoutResult<()> {
        let signal = self.signal().ok_or(LayoutError::PrimaryNotSet)?;
        if signal.shape.rank() != self.signal_rank() {
            return Err(LayoutError::IndexRankMismatch {
                field: self.signal_name.clone(),
                rank: signal.shape.rank(),
                indices: (0..self.signal_rank()).collect(),
            });
        }
        if signal.indices != signal.shape.identity_indices() {
            return Err(LayoutError::SignalIndicesNotIdentity {
                field: self.signal_name.clone(),
                indices: signal.indices.clone(),
            });
        }
        for (name, entry) in &self.fields {
            check_indices(name, &entry.shape, &entry.indices, &signal.shape)?;
        }

        let mut seen = BTreeSet::new();
        for (dim, slot) in self.default_axes.iter().enumerate() {
            let Some(name) = slot.name() else { continue };
            if !seen.insert(name) {
                return Err(LayoutError::DuplicateFieldName {
                    name: name.to_string(),
                });
            }
            let entry = self.field(name).ok_or_else(|| LayoutError::MissingIndexMapping {
                field: name.to_string(),
            })?;
            if !entry.indices.contains(&dim) {
                return Err(LayoutError::DefaultAxisNotIndexed {
                    field: name.to_string(),
                    dimension: dim,
                });
            }
        }
        Ok(())
    }

    /// Attribute values for the boundary, placeholders rendered with the configured marker.
    pub fn attributes(&self, config: &LayoutConfig) -> NxDataAttributes {
        NxDataAttributes {
            signal: self.signal_name.clone(),
            axes: self
                .default_axes
                .iter()
                .map(|slot| slot.render(&config.placeholder).to_string())
                .collect(),
            indices: self
                .fields
                .iter()
                .map(|(name, entry)| (indices_attribute_name(name), entry.indices.clone()))
                .collect(),
            targets: self
                .fields
                .iter()
                .map(|(name, entry)| (name.clone(), entry.target_path.clone()))
                .collect(),
        }
    }
}

/// Rendered NXdata attributes and links.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NxDataAttributes {
    pub signal: String,
    pub axes: Vec<String>,
    /// Keyed by `<field>_indices`.
    pub indices: BTreeMap<String, Vec<usize>>,
    /// Field name to link target path.
    pub targets: BTreeMap<String, String>,
}

pub fn indices_attribute_name(field: &str) -> String {
    format!("{}_indices", field)
}

/// Check that `indices` places a field of `shape` onto the signal's dimensions:
/// one index per field dimension, each in range, none repeated, and matching extents.
pub(crate) fn check_indices(
    field: &str,
    shape: &Shape,
    indices: &[usize],
    signal: &Shape,
) -> LayoutResult<()> {
    if indices.len() != shape.rank() {
        return Err(LayoutError::IndexRankMismatch {
            field: field.to_string(),
            rank: shape.rank(),
            indices: indices.to_vec(),
        });
    }
    let mut seen = BTreeSet::new();
    for (k, &dim) in indices.iter().enumerate() {
        let expected = signal.extent(dim).ok_or_else(|| LayoutError::DimensionOutOfRange {
            field: field.to_string(),
            dimension: dim,
            rank: signal.rank(),
        })?;
        if !seen.insert(dim) {
            return Err(LayoutError::DuplicateIndex {
                field: field.to_string(),
                dimension: dim,
            });
        }
        let actual = shape.extents()[k];
        if actual != expected {
            return Err(LayoutError::ShapeMismatch {
                field: field.to_string(),
                dimension: dim,
                expected,
                actual,
            });
        }
    }
    Ok(())
}
