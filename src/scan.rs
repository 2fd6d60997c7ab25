//! Declarative scan descriptions.
//!
//! A scan description lists the devices of a scan and how they bind to the
//! data group, so a layout can be produced from a YAML or JSON document:
//!
//! ```yaml
//! devices:
//!   - { name: det, class: detector, shape: [100, 512, 1000] }
//!   - { name: tof, class: detector, shape: [1000] }
//!   - { name: x, class: positioner, shape: [100, 512] }
//! primary: { device: det }
//! axes:
//!   - { device: tof, default_axis: 2 }
//!   - { device: x, default_axis: 0, indices: [0, 1] }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assembler::AxisAssembler;
use crate::config::{read_by_extension, LayoutConfig};
use crate::data::binding::{DeviceBinding, Role};
use crate::data::device::{Device, DeviceClass, FieldProvider};
use crate::data::field::FieldDescriptor;
use crate::data::layout::NxDataLayout;
use crate::data::shape::Shape;
use crate::errors::LoadError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub shape: Shape,
    /// Explicit data location; derived from the instrument root when absent.
    #[serde(default)]
    pub source_path: Option<String>,
    #[serde(default)]
    pub default: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSpec {
    pub name: String,
    #[serde(default)]
    pub class: DeviceClass,
    /// Shape of the class's conventional field (`data` or `value`).
    #[serde(default)]
    pub shape: Option<Shape>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    /// Overrides the configured instrument root for this device.
    #[serde(default)]
    pub root: Option<String>,
}

impl DeviceSpec {
    pub fn to_device(&self, config: &LayoutConfig) -> Device {
        let root = self.root.as_deref().unwrap_or(&config.instrument_root);
        let mut device = Device::new(self.name.clone(), self.class).with_root(root);
        if let Some(shape) = &self.shape {
            device = device.with_default_field(self.class.default_field_name(), shape.clone());
        }
        for f in &self.fields {
            device = match (&f.source_path, f.default) {
                (Some(path), default) => {
                    let mut descriptor = FieldDescriptor::new(f.name.clone(), f.shape.clone(), path.clone());
                    descriptor.is_default = default;
                    device.with_descriptor(descriptor)
                }
                (None, true) => device.with_default_field(f.name.clone(), f.shape.clone()),
                (None, false) => device.with_field(f.name.clone(), f.shape.clone()),
            };
        }
        device
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSpec {
    pub device: String,
    #[serde(default)]
    pub default_axis: Option<usize>,
    #[serde(default)]
    pub indices: Option<Vec<usize>>,
    #[serde(default)]
    pub field_indices: BTreeMap<String, Vec<usize>>,
}

impl BindingSpec {
    fn bind<'d>(&self, devices: &'d [Device], role: Role) -> Result<DeviceBinding<'d>, LoadError> {
        let device = devices
            .iter()
            .find(|d| d.name() == self.device)
            .ok_or_else(|| LoadError::UnknownDevice {
                name: self.device.clone(),
            })?;
        let mut binding = DeviceBinding::new(device, role).default_axis(self.default_axis);
        binding.indices = self.indices.clone();
        binding.field_indices = self.field_indices.clone();
        Ok(binding)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanDescription {
    #[serde(default)]
    pub config: LayoutConfig,
    pub devices: Vec<DeviceSpec>,
    pub primary: BindingSpec,
    #[serde(default)]
    pub axes: Vec<BindingSpec>,
}

impl ScanDescription {
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

    /// Devices described by this scan.
    pub fn devices(&self) -> Vec<Device> {
        self.devices.iter().map(|d| d.to_device(&self.config)).collect()
    }

    /// Bind the devices in declaration order and build the layout.
    pub fn assemble(&self) -> Result<NxDataLayout, LoadError> {
        let devices = self.devices();
        let primary = self.primary.bind(&devices, Role::Primary)?;
        let axes = self
            .axes
            .iter()
            .map(|spec| spec.bind(&devices, Role::Axis))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            devices = devices.len(),
            axes = axes.len(),
            "assembling layout from scan description"
        );
        Ok(AxisAssembler::assemble(self.config.clone(), &primary, axes)?)
    }
}
