use nxdata::persistence::*;
use nxdata::*;

fn shape(extents: &[usize]) -> Shape {
    Shape::new(extents.to_vec()).unwrap()
}

fn sample_layout() -> NxDataLayout {
    let det = Device::detector("det", shape(&[100, 512, 1000]));
    let tof = Device::detector("tof", shape(&[1000]));
    let x = Device::positioner("x", shape(&[100, 512]));
    AxisAssembler::assemble(
        LayoutConfig::default(),
        &DeviceBinding::primary(&det),
        [
            DeviceBinding::axis(&tof).default_axis(Some(2)),
            DeviceBinding::axis(&x).default_axis(Some(0)).indices([0, 1]),
        ],
    )
    .unwrap()
}

#[test]
fn json_round_trip_preserves_layout() {
    let layout = sample_layout();
    let json = layout_to_json(&layout).unwrap();
    let restored = layout_from_json(&json).unwrap();
    assert_eq!(restored, layout);
}

#[test]
fn placeholder_is_not_a_string_in_storage() {
    let json = layout_to_json(&sample_layout()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["default_axes"][1], serde_json::json!("placeholder"));
    assert_eq!(value["default_axes"][0], serde_json::json!({ "axis": "x" }));
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.json");
    let layout = sample_layout();
    save_layout_to_path(&layout, &path).unwrap();
    assert_eq!(load_layout_from_path(&path).unwrap(), layout);
}

#[test]
fn loading_rejects_inconsistent_indices() {
    let json = r#"{
        "signal_name": "det",
        "default_axes": [{ "axis": "x" }],
        "fields": {
            "det": { "shape": [100], "indices": [0], "target_path": "/entry/instrument/det/data" },
            "x": { "shape": [99], "indices": [0], "target_path": "/entry/instrument/x/value" }
        }
    }"#;
    let err = layout_from_json(json).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Layout(LayoutError::ShapeMismatch { expected: 100, actual: 99, .. })
    ));
}

#[test]
fn loading_rejects_missing_signal() {
    let json = r#"{
        "signal_name": "det",
        "default_axes": ["placeholder"],
        "fields": {}
    }"#;
    let err = layout_from_json(json).unwrap_err();
    assert!(matches!(err, LoadError::Layout(LayoutError::PrimaryNotSet)));
}

#[test]
fn loading_rejects_zero_extent() {
    let json = r#"{
        "signal_name": "det",
        "default_axes": ["placeholder"],
        "fields": {
            "det": { "shape": [0], "indices": [0], "target_path": "/entry/instrument/det/data" }
        }
    }"#;
    assert!(matches!(layout_from_json(json), Err(LoadError::Json(_))));
}

#[test]
fn loading_rejects_axis_without_field() {
    let json = r#"{
        "signal_name": "det",
        "default_axes": [{ "axis": "ghost" }],
        "fields": {
            "det": { "shape": [100], "indices": [0], "target_path": "/entry/instrument/det/data" }
        }
    }"#;
    let err = layout_from_json(json).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Layout(LayoutError::MissingIndexMapping { field }) if field == "ghost"
    ));
}

#[test]
fn loading_rejects_axis_not_indexing_its_slot() {
    let json = r#"{
        "signal_name": "det",
        "default_axes": [{ "axis": "x" }, "placeholder"],
        "fields": {
            "det": { "shape": [10, 10], "indices": [0, 1], "target_path": "/entry/instrument/det/data" },
            "x": { "shape": [10], "indices": [1], "target_path": "/entry/instrument/x/value" }
        }
    }"#;
    let err = layout_from_json(json).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Layout(LayoutError::DefaultAxisNotIndexed { dimension: 0, .. })
    ));
}

#[test]
fn loading_rejects_reordered_signal_indices() {
    let json = r#"{
        "signal_name": "det",
        "default_axes": ["placeholder", "placeholder"],
        "fields": {
            "det": { "shape": [10, 10], "indices": [1, 0], "target_path": "/entry/instrument/det/data" }
        }
    }"#;
    let err = layout_from_json(json).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Layout(LayoutError::SignalIndicesNotIdentity { indices, .. }) if indices == vec![1, 0]
    ));
}
