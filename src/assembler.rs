//! The axis-indexing engine.
//!
//! [`AxisAssembler`] takes one primary device and any number of axis devices
//! and works out, for every field it will emit:
//! - which signal dimensions the field's own dimensions correspond to (its `indices`),
//! - whether it is the default axis of a signal dimension (its slot in `axes`),
//! - where its data lives (the link target).
//!
//! Registration order does not influence placement. Slots are driven by the
//! declared default-axis dimension and indices only, and fields are kept in
//! name order.
//!
//! With [`AxisLabel::DeviceName`](crate::config::AxisLabel::DeviceName) the
//! slot label differs from the field name, and the default field is recorded
//! under both names so that every `axes` entry resolves to a node.
//!
//! Every operation validates a whole device before recording anything. The
//! first rejected operation invalidates the assembler; later calls fail with
//! [`LayoutError::Invalidated`].

use std::collections::BTreeMap;

use tracing::{debug, info, trace};

use crate::config::LayoutConfig;
use crate::data::binding::{DeviceBinding, Role};
use crate::data::field::FieldDescriptor;
use crate::data::layout::{check_indices, AxisSlot, FieldEntry, NxDataLayout};
use crate::data::shape::Shape;
use crate::errors::{LayoutError, LayoutResult, PrimaryRejection};
use crate::naming::{axis_label, emitted_field_name};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Open,
    Built,
    Invalidated,
}

#[derive(Clone, Debug)]
struct Signal {
    name: String,
    shape: Shape,
}

/// Assembles one [`NxDataLayout`]. Single use: after [`AxisAssembler::build`]
/// no further devices can be added.
#[derive(Clone, Debug)]
pub struct AxisAssembler {
    config: LayoutConfig,
    state: State,
    signal: Option<Signal>,
    default_axes: Vec<Option<String>>,
    fields: BTreeMap<String, FieldEntry>,
}

impl Default for AxisAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl AxisAssembler {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            config,
            state: State::Open,
            signal: None,
            default_axes: Vec::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Register `primary`, then every binding in `axes`, and build.
    pub fn assemble<'d, I>(
        config: LayoutConfig,
        primary: &DeviceBinding<'d>,
        axes: I,
    ) -> LayoutResult<NxDataLayout>
    where
        I: IntoIterator<Item = DeviceBinding<'d>>,
    {
        let mut assembler = Self::with_config(config);
        assembler.set_primary(primary)?;
        for binding in axes {
            assembler.add_axis(&binding)?;
        }
        assembler.build()
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Name of the signal field, once a primary device is set.
    pub fn signal_name(&self) -> Option<&str> {
        self.signal.as_ref().map(|s| s.name.as_str())
    }

    pub fn is_built(&self) -> bool {
        self.state == State::Built
    }

    pub fn is_invalidated(&self) -> bool {
        self.state == State::Invalidated
    }

    /// Register the primary device. Its default field becomes the signal.
    pub fn set_primary(&mut self, binding: &DeviceBinding<'_>) -> LayoutResult<()> {
        self.ensure_open()?;
        let result = self.try_set_primary(binding);
        self.settle(result)
    }

    /// Register an axis device, placing each of its fields on signal dimensions.
    pub fn add_axis(&mut self, binding: &DeviceBinding<'_>) -> LayoutResult<()> {
        self.ensure_open()?;
        let result = self.try_add_axis(binding);
        self.settle(result)
    }

    /// Finish the layout. Empty default-axis slots become placeholders.
    ///
    /// Calling `build` again returns an equal layout.
    pub fn build(&mut self) -> LayoutResult<NxDataLayout> {
        if self.state == State::Invalidated {
            return Err(LayoutError::Invalidated);
        }
        let Some(signal) = self.signal.as_ref().map(|s| s.name.clone()) else {
            return self.settle(Err(LayoutError::PrimaryNotSet));
        };
        let axes: Vec<AxisSlot> = self
            .default_axes
            .iter()
            .map(|slot| slot.clone().map_or(AxisSlot::Placeholder, AxisSlot::Axis))
            .collect();
        if self.state == State::Open {
            info!(
                signal = %signal,
                axes = ?axes,
                fields = self.fields.len(),
                "built NXdata layout"
            );
        }
        self.state = State::Built;
        Ok(NxDataLayout::new(signal, axes, self.fields.clone()))
    }

    fn ensure_open(&self) -> LayoutResult<()> {
        match self.state {
            State::Open => Ok(()),
            State::Built => Err(LayoutError::AlreadyBuilt),
            State::Invalidated => Err(LayoutError::Invalidated),
        }
    }

    fn settle<T>(&mut self, result: LayoutResult<T>) -> LayoutResult<T> {
        if let Err(e) = &result {
            debug!(error = %e, "rejected NXdata layout operation");
            if self.state == State::Open {
                self.state = State::Invalidated;
            }
        }
        result
    }

    fn try_set_primary(&mut self, binding: &DeviceBinding<'_>) -> LayoutResult<()> {
        let device = binding.device;
        let reject = |reason| LayoutError::InvalidPrimary {
            device: device.name().to_string(),
            reason,
        };
        if self.signal.is_some() {
            return Err(reject(PrimaryRejection::AlreadySet));
        }
        if binding.role != Role::Primary {
            return Err(reject(PrimaryRejection::NotPrimaryRole));
        }
        let default = device
            .default_field()
            .ok_or_else(|| reject(PrimaryRejection::NoDefaultField))?;
        check_field_keys(binding)?;

        let signal = Signal {
            name: emitted_field_name(device, default),
            shape: default.shape.clone(),
        };
        let mut staged = vec![(
            signal.name.clone(),
            FieldEntry {
                shape: signal.shape.clone(),
                indices: signal.shape.identity_indices(),
                target_path: default.source_path.clone(),
            },
        )];

        // Extra primary fields (e.g. a detector's time of flight) only join the
        // group when the binding says where they sit.
        for field in device.fields().iter().filter(|f| f.name != default.name) {
            let name = emitted_field_name(device, field);
            let Some(indices) = explicit_indices(binding, field) else {
                trace!(field = %name, "skipping unmapped primary field");
                continue;
            };
            check_indices(&name, &field.shape, &indices, &signal.shape)?;
            self.check_name_free(&name, &staged)?;
            staged.push((name, entry_for(field, indices)));
        }

        debug!(
            device = binding.device_name(),
            signal = %signal.name,
            shape = %signal.shape,
            "registered primary device"
        );
        self.default_axes = vec![None; signal.shape.rank()];
        self.signal = Some(signal);
        self.fields.extend(staged);
        Ok(())
    }

    fn try_add_axis(&mut self, binding: &DeviceBinding<'_>) -> LayoutResult<()> {
        let signal = self.signal.as_ref().ok_or(LayoutError::PrimaryNotSet)?;
        let device = binding.device;
        if binding.role != Role::Axis {
            return Err(LayoutError::NotAnAxis {
                device: device.name().to_string(),
            });
        }
        check_field_keys(binding)?;
        let default = device.default_field();

        if let Some(dim) = binding.default_axis_dimension {
            let default = default.ok_or_else(|| LayoutError::MissingDefaultField {
                device: device.name().to_string(),
            })?;
            let field = emitted_field_name(device, default);
            if dim >= signal.shape.rank() {
                return Err(LayoutError::DimensionOutOfRange {
                    field,
                    dimension: dim,
                    rank: signal.shape.rank(),
                });
            }
            if let Some(existing) = &self.default_axes[dim] {
                return Err(LayoutError::DuplicateDefaultAxis {
                    dimension: dim,
                    existing: existing.clone(),
                    field,
                });
            }
        }

        let mut staged: Vec<(String, FieldEntry)> = Vec::new();
        let mut slot: Option<(usize, String)> = None;
        for field in device.fields() {
            let name = emitted_field_name(device, field);
            let is_default = device.is_default_field(field);
            let indices = resolve_indices(binding, field, &name, is_default)?;
            check_indices(&name, &field.shape, &indices, &signal.shape)?;
            self.check_name_free(&name, &staged)?;

            let entry = entry_for(field, indices);
            if let (true, Some(dim)) = (is_default, binding.default_axis_dimension) {
                if !entry.indices.contains(&dim) {
                    return Err(LayoutError::DefaultAxisNotIndexed {
                        field: name,
                        dimension: dim,
                    });
                }
                let label = axis_label(device, field, self.config.default_axis_label);
                if label != name {
                    self.check_name_free(&label, &staged)?;
                    staged.push((label.clone(), entry.clone()));
                }
                slot = Some((dim, label));
            }
            staged.push((name, entry));
        }

        for (name, entry) in &staged {
            trace!(
                field = %name,
                indices = ?entry.indices,
                target = %entry.target_path,
                "recorded axis field"
            );
        }
        self.fields.extend(staged);
        if let Some((dim, label)) = slot {
            debug!(
                device = binding.device_name(),
                dimension = dim,
                axis = %label,
                "assigned default axis"
            );
            self.default_axes[dim] = Some(label);
        }
        Ok(())
    }

    /// A name is taken if it is already recorded or staged in the current operation.
    fn check_name_free(&self, name: &str, staged: &[(String, FieldEntry)]) -> LayoutResult<()> {
        let taken = self.fields.contains_key(name) || staged.iter().any(|(n, _)| n == name);
        if taken {
            return Err(LayoutError::DuplicateFieldName {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

/// Every per-field mapping must name a field of the bound device.
fn check_field_keys(binding: &DeviceBinding<'_>) -> LayoutResult<()> {
    let fields = binding.device.fields();
    match binding
        .field_indices
        .keys()
        .find(|key| !fields.iter().any(|f| &f.name == *key))
    {
        Some(key) => Err(LayoutError::UnknownField {
            device: binding.device_name().to_string(),
            field: key.clone(),
        }),
        None => Ok(()),
    }
}

/// Mapping supplied by the caller for `field`: its own entry, or the
/// device-wide mapping. On a multi-field device the device-wide mapping only
/// applies to fields with one dimension per index; the sole field of a
/// single-field device always takes it as given.
fn explicit_indices(binding: &DeviceBinding<'_>, field: &FieldDescriptor) -> Option<Vec<usize>> {
    if let Some(indices) = binding.field_indices.get(&field.name) {
        return Some(indices.clone());
    }
    let single = binding.device.fields().len() == 1;
    binding
        .indices
        .as_ref()
        .filter(|indices| single || indices.len() == field.rank())
        .cloned()
}

fn resolve_indices(
    binding: &DeviceBinding<'_>,
    field: &FieldDescriptor,
    name: &str,
    is_default: bool,
) -> LayoutResult<Vec<usize>> {
    if let Some(indices) = explicit_indices(binding, field) {
        return Ok(indices);
    }
    if let (true, Some(dim), 1) = (is_default, binding.default_axis_dimension, field.rank()) {
        return Ok(vec![dim]);
    }
    match &binding.indices {
        Some(indices) => Err(LayoutError::IndexRankMismatch {
            field: name.to_string(),
            rank: field.rank(),
            indices: indices.clone(),
        }),
        None => Err(LayoutError::MissingIndexMapping {
            field: name.to_string(),
        }),
    }
}

fn entry_for(field: &FieldDescriptor, indices: Vec<usize>) -> FieldEntry {
    FieldEntry {
        shape: field.shape.clone(),
        indices,
        target_path: field.source_path.clone(),
    }
}
