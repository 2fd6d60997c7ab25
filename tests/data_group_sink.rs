use std::collections::BTreeMap;

use nxdata::*;

/// Records what a group assembler would write into an NXdata group.
#[derive(Default)]
struct RecordingGroup {
    strings: BTreeMap<String, String>,
    lists: BTreeMap<String, Vec<String>>,
    indices: BTreeMap<String, Vec<usize>>,
    links: Vec<(String, String)>,
}

impl DataGroupSink for RecordingGroup {
    type Error = String;

    fn set_string_attribute(&mut self, name: &str, value: &str) -> Result<(), String> {
        self.strings.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_string_list_attribute(&mut self, name: &str, values: &[String]) -> Result<(), String> {
        self.lists.insert(name.to_string(), values.to_vec());
        Ok(())
    }

    fn set_index_attribute(&mut self, name: &str, indices: &[usize]) -> Result<(), String> {
        self.indices.insert(name.to_string(), indices.to_vec());
        Ok(())
    }

    fn link_field(&mut self, name: &str, target: &str) -> Result<(), String> {
        if self.links.iter().any(|(n, _)| n == name) {
            return Err(format!("node {name} already exists"));
        }
        self.links.push((name.to_string(), target.to_string()));
        Ok(())
    }
}

/// A sink that refuses every link.
struct ReadOnlyGroup;

impl DataGroupSink for ReadOnlyGroup {
    type Error = &'static str;

    fn set_string_attribute(&mut self, _: &str, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_string_list_attribute(&mut self, _: &str, _: &[String]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_index_attribute(&mut self, _: &str, _: &[usize]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn link_field(&mut self, _: &str, _: &str) -> Result<(), Self::Error> {
        Err("group is read-only")
    }
}

fn shape(extents: &[usize]) -> Shape {
    Shape::new(extents.to_vec()).unwrap()
}

fn sample_layout() -> NxDataLayout {
    let det = Device::detector("det", shape(&[50, 5]));
    let x = Device::positioner("x", shape(&[50]));
    let time = Device::positioner("time", shape(&[50, 5]));
    AxisAssembler::assemble(
        LayoutConfig::default(),
        &DeviceBinding::primary(&det),
        [
            DeviceBinding::axis(&x).default_axis(Some(0)),
            DeviceBinding::axis(&time).indices([0, 1]),
        ],
    )
    .unwrap()
}

#[test]
fn materialize_writes_signal_axes_indices_and_links() {
    let layout = sample_layout();
    let mut group = RecordingGroup::default();
    layout.materialize(&mut group, &LayoutConfig::default()).unwrap();

    assert_eq!(group.strings.get("signal").map(String::as_str), Some("det"));
    assert_eq!(group.lists["axes"], vec!["x", "."]);
    assert_eq!(group.indices["det_indices"], vec![0, 1]);
    assert_eq!(group.indices["x_indices"], vec![0]);
    assert_eq!(group.indices["time_indices"], vec![0, 1]);
    assert_eq!(
        group.links,
        vec![
            ("det".to_string(), "/entry/instrument/det/data".to_string()),
            ("time".to_string(), "/entry/instrument/time/value".to_string()),
            ("x".to_string(), "/entry/instrument/x/value".to_string()),
        ]
    );
}

#[test]
fn placeholder_marker_comes_from_config() {
    let layout = sample_layout();
    let config = LayoutConfig {
        placeholder: "-".to_string(),
        ..LayoutConfig::default()
    };
    let mut group = RecordingGroup::default();
    layout.materialize(&mut group, &config).unwrap();
    assert_eq!(group.lists["axes"], vec!["x", "-"]);
}

#[test]
fn sink_errors_are_passed_through() {
    let layout = sample_layout();
    let err = layout
        .materialize(&mut ReadOnlyGroup, &LayoutConfig::default())
        .unwrap_err();
    assert_eq!(err, "group is read-only");
}

#[test]
fn attributes_match_materialized_group() {
    let layout = sample_layout();
    let config = LayoutConfig::default();
    let attrs = layout.attributes(&config);
    let mut group = RecordingGroup::default();
    layout.materialize(&mut group, &config).unwrap();

    assert_eq!(attrs.signal, group.strings["signal"]);
    assert_eq!(attrs.axes, group.lists["axes"]);
    assert_eq!(attrs.indices, group.indices);
    let links: BTreeMap<String, String> = group.links.into_iter().collect();
    assert_eq!(attrs.targets, links);
}

#[test]
fn device_name_label_links_the_named_axis() {
    let config = LayoutConfig {
        default_axis_label: AxisLabel::DeviceName,
        ..LayoutConfig::default()
    };
    let det = Device::detector("det", shape(&[50]));
    let motor = Device::new("motor", DeviceClass::Positioner)
        .with_field("rbv", shape(&[50]))
        .with_default_field("demand", shape(&[50]));
    let layout = AxisAssembler::assemble(
        config.clone(),
        &DeviceBinding::primary(&det),
        [DeviceBinding::axis(&motor).default_axis(Some(0)).indices([0])],
    )
    .unwrap();

    let mut group = RecordingGroup::default();
    layout.materialize(&mut group, &config).unwrap();
    assert_eq!(group.lists["axes"], vec!["motor"]);
    assert_eq!(group.indices["motor_indices"], vec![0]);
    assert!(group
        .links
        .contains(&("motor".to_string(), "/entry/instrument/motor/demand".to_string())));
}
