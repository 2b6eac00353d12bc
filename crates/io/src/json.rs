// JSON export

use std::path::Path;

use placemerge_recon::MergeResult;
use serde_json::{Map, Value};

use crate::error::IoError;
use crate::table::Table;

fn write_json(value: &impl serde::Serialize, path: &Path) -> Result<(), IoError> {
    let write_err = |message: String| IoError::Write {
        path: path.to_path_buf(),
        message,
    };
    let json = serde_json::to_string_pretty(value).map_err(|e| write_err(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| write_err(e.to_string()))
}

/// Full result: meta, summary and every registry row.
pub fn export_result(result: &MergeResult, path: &Path) -> Result<(), IoError> {
    write_json(result, path)
}

/// Rows as an array of objects keyed by header.
pub fn table_to_json(table: &Table) -> Value {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let obj: Map<String, Value> = table
                .headers
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    let cell = row.get(i).cloned().unwrap_or_default();
                    (h.clone(), Value::String(cell))
                })
                .collect();
            Value::Object(obj)
        })
        .collect();
    Value::Array(rows)
}

pub fn export_table(table: &Table, path: &Path) -> Result<(), IoError> {
    write_json(&table_to_json(table), path)
}
