use nxdata::*;

#[test]
fn defaults_follow_nexus_conventions() {
    let config = LayoutConfig::default();
    assert_eq!(config.placeholder, ".");
    assert_eq!(config.instrument_root, "/entry/instrument");
    assert_eq!(config.default_axis_label, AxisLabel::Qualified);
}

#[test]
fn partial_json_keeps_remaining_defaults() {
    let config = LayoutConfig::from_json_str(r#"{ "default_axis_label": "device_name" }"#).unwrap();
    assert_eq!(config.default_axis_label, AxisLabel::DeviceName);
    assert_eq!(config.placeholder, DEFAULT_PLACEHOLDER);
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.yml");
    std::fs::write(&path, "placeholder: \"-\"\ninstrument_root: /entry1/instrument\n").unwrap();
    let config = LayoutConfig::from_path(&path).unwrap();
    assert_eq!(config.placeholder, "-");
    assert_eq!(config.instrument_root, "/entry1/instrument");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = LayoutConfig::from_path(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn device_classes_name_their_default_fields() {
    assert_eq!(DeviceClass::Detector.default_field_name(), "data");
    assert_eq!(DeviceClass::Positioner.default_field_name(), "value");
    assert_eq!(DeviceClass::Positioner.nx_class(), "NXpositioner");
}

#[test]
fn devices_derive_source_paths_from_their_root() {
    let shape = Shape::new(vec![10]).unwrap();
    let x = Device::positioner("x", shape.clone());
    assert_eq!(x.fields()[0].source_path, "/entry/instrument/x/value");

    let y = Device::new("y", DeviceClass::Positioner)
        .with_root("/entry/sample/")
        .with_default_field("value", shape);
    assert_eq!(y.fields()[0].source_path, "/entry/sample/y/value");
    assert_eq!(y.root(), "/entry/sample/");
    assert_eq!(y.class(), DeviceClass::Positioner);
    assert!(y.is_default_field(&y.fields()[0]));
}

#[test]
fn default_field_needs_exactly_one_flag() {
    let shape = Shape::new(vec![10]).unwrap();
    let single = Device::new("a", DeviceClass::Other).with_field("only", shape.clone());
    assert_eq!(single.default_field().map(|f| f.name.as_str()), Some("only"));

    let two_flags = Device::new("b", DeviceClass::Other)
        .with_default_field("p", shape.clone())
        .with_default_field("q", shape);
    assert!(two_flags.default_field().is_none());
}

#[test]
fn shapes_display_as_tuples() {
    let shape = Shape::new(vec![100, 512]).unwrap();
    assert_eq!(shape.to_string(), "(100, 512)");
    assert_eq!(shape.identity_indices(), vec![0, 1]);
}
