//! Integration tests for reading and writing building descriptions

use riser_core::{
    ApartmentRow, Building, BuildingInput, Catalog, DesignParams, OutletKey, OutletRow, RiserError,
};
use tempfile::tempdir;

fn two_floor_input() -> BuildingInput {
    BuildingInput {
        params: DesignParams::new(2, 1),
        apartments: vec![
            ApartmentRow {
                floor: 2,
                apartment: 1,
                outlets: 1,
                tap_to_splitter_m: Some(5.0),
            },
            ApartmentRow {
                floor: 1,
                apartment: 1,
                outlets: 3,
                tap_to_splitter_m: Some(9.5),
            },
        ],
        outlets: vec![
            OutletRow {
                floor: 2,
                apartment: 1,
                outlet: 1,
                cable_m: 6.0,
            },
            OutletRow {
                floor: 1,
                apartment: 1,
                outlet: 1,
                cable_m: 7.0,
            },
            OutletRow {
                floor: 1,
                apartment: 1,
                outlet: 2,
                cable_m: 8.0,
            },
            OutletRow {
                floor: 1,
                apartment: 1,
                outlet: 3,
                cable_m: 9.0,
            },
        ],
        catalog: Catalog::reference(),
    }
}

#[test]
fn test_toml_file_round_trip() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("building.toml");
    let input = two_floor_input();

    input.to_path(&path).expect("write toml");
    let loaded = BuildingInput::from_path(&path).expect("read toml");
    assert_eq!(loaded, input);
}

#[test]
fn test_json_file_loads_into_building() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("building.json");
    two_floor_input().to_path(&path).expect("write json");

    let building = Building::from_path(&path).expect("valid building");
    assert_eq!(building.num_outlets(), 4);
    assert_eq!(building.outlets()[0], OutletKey::new(2, 1, 1));
    let cable = building
        .outlet_cable_m(OutletKey::new(1, 1, 3))
        .expect("cable present");
    assert!((cable - 9.0).abs() < 1e-12);
}

#[test]
fn test_handwritten_toml_uses_defaults() {
    let text = r#"
[params]
floors = 1
apartments_per_floor = 1
target_level_dbuv = 58.0

[[apartments]]
floor = 1
apartment = 1
outlets = 1
tap_to_splitter_m = 4.0

[[outlets]]
floor = 1
apartment = 1
outlet = 1
cable_m = 2.5

[[catalog.taps]]
id = "T2"
tap_loss_db = 12.0
through_loss_db = 2.0
outputs = 2

[[catalog.splitters]]
id = "S2"
insertion_loss_db = 4.0
outputs = 2
"#;
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("tiny.toml");
    std::fs::write(&path, text).expect("write");

    let building = Building::from_path(&path).expect("valid building");
    assert_eq!(building.params.target_level_dbuv, 58.0);
    assert_eq!(building.params.input_power_dbuv, 110.0);
    assert_eq!(building.catalog.taps.len(), 1);
}

#[test]
fn test_unknown_extension_is_config_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("building.yaml");
    let err = two_floor_input().to_path(&path).unwrap_err();
    assert!(matches!(err, RiserError::Config(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = BuildingInput::from_path("/nonexistent/riser/building.toml").unwrap_err();
    assert!(matches!(err, RiserError::Io(_)));
}

#[test]
fn test_malformed_json_is_parse_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"params\": ").expect("write");
    let err = BuildingInput::from_path(&path).unwrap_err();
    assert!(matches!(err, RiserError::Parse(_)));
}
