// Load place tables, merge, and write the registry in each output format.

use std::path::{Path, PathBuf};

use placemerge_io::{load_new, load_old, read_table, write_registry, IoError};
use placemerge_recon::config::{NewColumns, OldColumns};
use placemerge_recon::{MergeConfig, MergeInput, MergeResult};
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

const CONFIG: &str = r#"
name = "brighton"

[old]
file = "old_method.csv"
[old.columns]
name = "Company Name"
address = "Address"
latitude = "Latitude"
longitude = "Longitude"
external_id = "INFOUSA_ID"
category = "Description"

[new]
file = "new_method.csv"
[new.columns]
new_method = "New Method Y/N"
source_a = "MSD Y/N"
source_a_category = "MSD Category"
source_a_subcategory = "MSD Sub Category"
source_b = "Google Y/N"
source_b_id = "Google Place ID"
source_b_types = "Google Types"
source_c = "Yelp Y/N"
source_c_id = "Yelp ID"
source_c_types = "Yelp Types"
"#;

fn merged() -> MergeResult {
    let config = MergeConfig::from_toml(CONFIG).unwrap();
    let old = read_table(&fixture(&config.old.file), None).unwrap();
    let new = read_table(&fixture(&config.new.file), None).unwrap();
    let input = MergeInput {
        old: load_old(&old, &config.old.columns).unwrap(),
        new: load_new(&new, &config.new.columns).unwrap(),
    };
    placemerge_recon::run(&config, &input).unwrap()
}

#[test]
fn fixtures_merge_into_four_rows() {
    let result = merged();
    assert_eq!(result.summary.matched, 2);
    assert_eq!(result.summary.total, 4);

    let names: Vec<&str> = result.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["joes pizza", "Corner Cafe", "Shell Station", "Bike Shop"]);
    assert_eq!(result.records[0].old_method_id.as_deref(), Some("A1"));
    assert_eq!(result.records[1].source_a_category.as_deref(), Some("Food Service"));
}

#[test]
fn csv_registry_has_fixed_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.csv");
    write_registry(&merged(), &path).unwrap();

    let table = read_table(&path, None).unwrap();
    assert_eq!(table.headers.len(), 17);
    assert_eq!(table.headers[0], "name");
    assert_eq!(table.headers[4], "old_method");
    assert_eq!(table.len(), 4);

    let old_method = table.require("old_method").unwrap();
    let flags: Vec<&str> = (0..table.len()).map(|r| table.cell(r, old_method)).collect();
    assert_eq!(flags, vec!["yes", "yes", "yes", "no"]);
}

#[test]
fn xlsx_registry_reads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.xlsx");
    write_registry(&merged(), &path).unwrap();

    let table = read_table(&path, Some("registry")).unwrap();
    assert_eq!(table.len(), 4);
    let lat = table.require("latitude").unwrap();
    assert_eq!(table.number(0, lat).unwrap(), 42.35);
}

#[test]
fn json_registry_carries_summary() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.json");
    write_registry(&merged(), &path).unwrap();

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["meta"]["config_name"], "brighton");
    assert_eq!(doc["summary"]["matched"], 2);
    assert_eq!(doc["records"].as_array().unwrap().len(), 4);
}

#[test]
fn unsupported_output_extension() {
    let dir = tempdir().unwrap();
    let err = write_registry(&merged(), &dir.path().join("registry.shp")).unwrap_err();
    assert!(matches!(err, IoError::UnsupportedFormat { .. }));
}

#[test]
fn spreadsheet_output_is_xlsx_only() {
    let dir = tempdir().unwrap();
    for name in ["registry.xls", "registry.ods", "registry.xlsb"] {
        let path = dir.path().join(name);
        let err = write_registry(&merged(), &path).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFormat { .. }), "{name}");
        assert!(!path.exists(), "{name} should not be written");
    }
}

#[test]
fn default_columns_require_headers() {
    let old = read_table(&fixture("old_method.csv"), None).unwrap();
    let err = load_old(&old, &OldColumns::default()).unwrap_err();
    assert!(matches!(err, IoError::MissingColumn { .. }));

    // The new-method fixture uses the default place headers.
    let new = read_table(&fixture("new_method.csv"), None).unwrap();
    assert_eq!(load_new(&new, &NewColumns::default()).unwrap().len(), 3);
}
