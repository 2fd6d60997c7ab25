//! Role and dimension hints attached to a device for one data-group assembly.

use std::collections::BTreeMap;
use std::fmt;

use crate::data::device::FieldProvider;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The device whose default field is the plotted signal.
    Primary,
    /// A device providing coordinates for signal dimensions.
    Axis,
}

/// Binds a device to a role plus the hints that place its fields on the
/// signal's dimensions.
///
/// `indices` is a device-wide mapping applied to every field whose rank
/// matches its length; `field_indices` overrides it for individual fields.
#[derive(Clone)]
pub struct DeviceBinding<'d> {
    pub device: &'d dyn FieldProvider,
    pub role: Role,
    pub default_axis_dimension: Option<usize>,
    pub indices: Option<Vec<usize>>,
    pub field_indices: BTreeMap<String, Vec<usize>>,
}

impl<'d> DeviceBinding<'d> {
    pub fn new(device: &'d dyn FieldProvider, role: Role) -> Self {
        Self {
            device,
            role,
            default_axis_dimension: None,
            indices: None,
            field_indices: BTreeMap::new(),
        }
    }

    pub fn primary(device: &'d dyn FieldProvider) -> Self {
        Self::new(device, Role::Primary)
    }

    pub fn axis(device: &'d dyn FieldProvider) -> Self {
        Self::new(device, Role::Axis)
    }

    /// Signal dimension the device's default field is the default axis for.
    pub fn default_axis(mut self, dimension: Option<usize>) -> Self {
        self.default_axis_dimension = dimension;
        self
    }

    pub fn indices<I: Into<Vec<usize>>>(mut self, indices: I) -> Self {
        self.indices = Some(indices.into());
        self
    }

    pub fn field_indices<S: Into<String>, I: Into<Vec<usize>>>(mut self, field: S, indices: I) -> Self {
        self.field_indices.insert(field.into(), indices.into());
        self
    }

    pub fn device_name(&self) -> &str {
        self.device.name()
    }
}

impl fmt::Debug for DeviceBinding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceBinding")
            .field("device", &self.device.name())
            .field("role", &self.role)
            .field("default_axis_dimension", &self.default_axis_dimension)
            .field("indices", &self.indices)
            .field("field_indices", &self.field_indices)
            .finish()
    }
}
