use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported file format: {path} (expected {expected})")]
    UnsupportedFormat { path: String, expected: &'static str },
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),
    #[error("{table}: missing column '{column}'")]
    MissingColumn { table: String, column: String },
    #[error("{table}, row {row}: cannot parse {column} '{value}'")]
    BadCoordinate {
        table: String,
        row: usize,
        column: String,
        value: String,
    },
    #[error("cannot write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
}
