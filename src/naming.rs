//! Names under which device fields appear in the data group.

use crate::config::AxisLabel;
use crate::data::device::FieldProvider;
use crate::data::field::FieldDescriptor;

/// Name of `field` inside the data group.
///
/// A single-field device contributes its field under the device name; a
/// multi-field device contributes every field as `<device>_<field>`.
pub fn emitted_field_name(device: &dyn FieldProvider, field: &FieldDescriptor) -> String {
    if device.fields().len() == 1 {
        device.name().to_string()
    } else {
        format!("{}_{}", device.name(), field.name)
    }
}

/// Label written into a default-axis slot for the device's default field.
pub fn axis_label(device: &dyn FieldProvider, field: &FieldDescriptor, label: AxisLabel) -> String {
    match label {
        AxisLabel::DeviceName => device.name().to_string(),
        AxisLabel::Qualified => emitted_field_name(device, field),
    }
}
