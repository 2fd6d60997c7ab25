//! Devices as named bundles of fields.
//!
//! The layout engine never needs to know what kind of instrument produced a
//! field; it only talks to the [`FieldProvider`] trait. [`Device`] is the
//! plain record implementation used by scan descriptions and tests.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_INSTRUMENT_ROOT;
use crate::data::field::{instrument_path, FieldDescriptor};
use crate::data::shape::Shape;

/// Read access to the name and field metadata of a device.
pub trait FieldProvider {
    fn name(&self) -> &str;

    fn fields(&self) -> &[FieldDescriptor];

    /// The representative field: the sole field of a single-field device,
    /// otherwise the one field flagged `is_default`. Returns `None` when zero
    /// or several fields are flagged.
    fn default_field(&self) -> Option<&FieldDescriptor> {
        let fields = self.fields();
        if fields.len() == 1 {
            return fields.first();
        }
        let mut defaults = fields.iter().filter(|f| f.is_default);
        match (defaults.next(), defaults.next()) {
            (Some(f), None) => Some(f),
            _ => None,
        }
    }

    fn is_default_field(&self, field: &FieldDescriptor) -> bool {
        self.default_field().is_some_and(|d| d.name == field.name)
    }
}

/// NeXus base class of a device group.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    #[default]
    Detector,
    Positioner,
    Monitor,
    Other,
}

impl DeviceClass {
    pub fn nx_class(&self) -> &'static str {
        match self {
            DeviceClass::Detector => "NXdetector",
            DeviceClass::Positioner => "NXpositioner",
            DeviceClass::Monitor => "NXmonitor",
            DeviceClass::Other => "NXcollection",
        }
    }

    /// Conventional name of the field holding the device's main data.
    pub fn default_field_name(&self) -> &'static str {
        match self {
            DeviceClass::Positioner => "value",
            DeviceClass::Detector | DeviceClass::Monitor | DeviceClass::Other => "data",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    name: String,
    class: DeviceClass,
    root: String,
    fields: Vec<FieldDescriptor>,
}

impl Device {
    /// A device with no fields yet, located under the default instrument root.
    pub fn new<S: Into<String>>(name: S, class: DeviceClass) -> Self {
        Self {
            name: name.into(),
            class,
            root: DEFAULT_INSTRUMENT_ROOT.to_string(),
            fields: Vec::new(),
        }
    }

    /// Single-field detector; its field is named `data`.
    pub fn detector<S: Into<String>>(name: S, shape: Shape) -> Self {
        Self::with_class_field(name, DeviceClass::Detector, shape)
    }

    /// Single-field positioner; its field is named `value`.
    pub fn positioner<S: Into<String>>(name: S, shape: Shape) -> Self {
        Self::with_class_field(name, DeviceClass::Positioner, shape)
    }

    fn with_class_field<S: Into<String>>(name: S, class: DeviceClass, shape: Shape) -> Self {
        Device::new(name, class).with_default_field(class.default_field_name(), shape)
    }

    /// Root under which fields added afterwards are located.
    pub fn with_root<S: Into<String>>(mut self, root: S) -> Self {
        self.root = root.into();
        self
    }

    /// Add a non-default field at `<root>/<device>/<field>`.
    pub fn with_field<S: Into<String>>(mut self, field: S, shape: Shape) -> Self {
        let field = field.into();
        let path = instrument_path(&self.root, &self.name, &field);
        self.fields.push(FieldDescriptor::new(field, shape, path));
        self
    }

    /// Add the default field at `<root>/<device>/<field>`.
    pub fn with_default_field<S: Into<String>>(mut self, field: S, shape: Shape) -> Self {
        let field = field.into();
        let path = instrument_path(&self.root, &self.name, &field);
        self.fields.push(FieldDescriptor::new(field, shape, path).as_default());
        self
    }

    /// Add a field with an explicit source path.
    pub fn with_descriptor(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn class(&self) -> DeviceClass {
        self.class
    }

    pub fn root(&self) -> &str {
        &self.root
    }
}

impl FieldProvider for Device {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}
