use std::path::Path;

use crate::error::IoError;

/// Extensions accepted by [`read_table`].
pub const READ_EXTENSIONS: &str = ".csv, .tsv, .xlsx, .xlsm, .xls, .xlsb or .ods";

/// Extensions accepted by [`write_table`] and the registry writer.
pub const WRITE_EXTENSIONS: &str = ".csv, .tsv, .xlsx or .json";

/// A header row plus string cells, as read from any supported file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Label used in error messages (usually the file name).
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Row number in the source file (1-based, header = 1) of each row.
    /// Empty for tables built in memory, whose rows count from 2.
    pub source_rows: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Tsv,
    Spreadsheet,
    Json,
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

fn unsupported(path: &Path, expected: &'static str) -> IoError {
    IoError::UnsupportedFormat {
        path: path.display().to_string(),
        expected,
    }
}

impl TableFormat {
    /// Format of a file to read, from its extension.
    pub fn for_input(path: &Path) -> Result<Self, IoError> {
        match extension(path).as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(unsupported(path, READ_EXTENSIONS)),
        }
    }

    /// Format of a file to write. Spreadsheets are only written as .xlsx.
    pub fn for_output(path: &Path) -> Result<Self, IoError> {
        match extension(path).as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "xlsx" => Ok(Self::Spreadsheet),
            "json" => Ok(Self::Json),
            _ => Err(unsupported(path, WRITE_EXTENSIONS)),
        }
    }
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row read from line `source_row` of the file.
    pub fn push_row(&mut self, cells: Vec<String>, source_row: usize) {
        self.rows.push(cells);
        self.source_rows.push(source_row);
    }

    /// Source row number of `row`, for error messages.
    pub fn source_row(&self, row: usize) -> usize {
        self.source_rows.get(row).copied().unwrap_or(row + 2)
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a column that must exist.
    pub fn require(&self, name: &str) -> Result<usize, IoError> {
        self.column(name).ok_or_else(|| IoError::MissingColumn {
            table: self.name.clone(),
            column: name.into(),
        })
    }

    /// Cell text; short rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Keep rows whose `keep` entry is true.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        let kept = |i: usize| keep.get(i).copied().unwrap_or(false);
        let mut i = 0;
        self.rows.retain(|_| {
            i += 1;
            kept(i - 1)
        });
        let mut i = 0;
        self.source_rows.retain(|_| {
            i += 1;
            kept(i - 1)
        });
    }

    /// Parse a numeric cell, naming the source row on failure.
    pub fn number(&self, row: usize, col: usize) -> Result<f64, IoError> {
        let raw = self.cell(row, col).trim();
        raw.parse::<f64>().map_err(|_| IoError::BadCoordinate {
            table: self.name.clone(),
            row: self.source_row(row),
            column: self.headers.get(col).cloned().unwrap_or_default(),
            value: raw.into(),
        })
    }

    /// `(latitude, longitude)` per row. Blank cells yield `None`; anything
    /// else that fails to parse is an error.
    pub fn coordinates(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<Vec<Option<(f64, f64)>>, IoError> {
        let lat = self.require(latitude)?;
        let lon = self.require(longitude)?;
        (0..self.len())
            .map(|row| {
                if self.cell(row, lat).trim().is_empty() || self.cell(row, lon).trim().is_empty() {
                    return Ok(None);
                }
                Ok(Some((self.number(row, lat)?, self.number(row, lon)?)))
            })
            .collect()
    }
}

/// Read a table, detecting the format from the extension. `sheet` selects
/// a worksheet in spreadsheet files (first sheet when `None`).
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table, IoError> {
    let table = match TableFormat::for_input(path)? {
        TableFormat::Csv | TableFormat::Tsv => crate::csv::import(path)?,
        TableFormat::Spreadsheet => crate::xlsx::import(path, sheet)?,
        TableFormat::Json => return Err(unsupported(path, READ_EXTENSIONS)),
    };
    log::info!(
        "read {} rows x {} columns from {}",
        table.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Write a table in the format implied by the extension.
pub fn write_table(table: &Table, path: &Path) -> Result<(), IoError> {
    match TableFormat::for_output(path)? {
        TableFormat::Csv => crate::csv::export(table, path, b','),
        TableFormat::Tsv => crate::csv::export(table, path, b'\t'),
        TableFormat::Spreadsheet => crate::xlsx::export_table(table, path),
        TableFormat::Json => crate::json::export_table(table, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table {
            name: "places.csv".into(),
            headers: vec!["name".into(), "latitude".into(), "longitude".into()],
            rows: vec![
                vec!["A".into(), "42.35".into(), "-71.13".into()],
                vec!["B".into(), "".into(), "".into()],
                vec!["C".into()],
            ],
            source_rows: Vec::new(),
        }
    }

    #[test]
    fn detect_input_formats() {
        assert_eq!(TableFormat::for_input(Path::new("a.CSV")).unwrap(), TableFormat::Csv);
        assert_eq!(TableFormat::for_input(Path::new("a.ods")).unwrap(), TableFormat::Spreadsheet);
        let err = TableFormat::for_input(Path::new("a.json")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported file format: a.json (expected .csv, .tsv, .xlsx, .xlsm, .xls, .xlsb or .ods)"
        );
        assert!(matches!(
            TableFormat::for_input(Path::new("a.shp")),
            Err(IoError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn detect_output_formats() {
        assert_eq!(TableFormat::for_output(Path::new("a.xlsx")).unwrap(), TableFormat::Spreadsheet);
        assert_eq!(TableFormat::for_output(Path::new("a.json")).unwrap(), TableFormat::Json);
        for ext in ["xls", "xlsb", "ods", "xlsm"] {
            let path = format!("out.{ext}");
            let err = TableFormat::for_output(Path::new(&path)).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("unsupported file format: {path} (expected .csv, .tsv, .xlsx or .json)")
            );
        }
    }

    #[test]
    fn json_input_rejected_before_reading() {
        let err = read_table(Path::new("/nonexistent/places.json"), None).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFormat { .. }));
    }

    #[test]
    fn short_rows_read_empty() {
        let t = table();
        assert_eq!(t.cell(2, 1), "");
        assert_eq!(t.cell(9, 0), "");
    }

    #[test]
    fn coordinates_blank_is_none() {
        let coords = table().coordinates("latitude", "longitude").unwrap();
        assert_eq!(coords, vec![Some((42.35, -71.13)), None, None]);
    }

    #[test]
    fn bad_coordinate_names_row() {
        let mut t = table();
        t.rows[1][1] = "north".into();
        t.rows[1][2] = "-71".into();
        let err = t.coordinates("latitude", "longitude").unwrap_err();
        assert_eq!(err.to_string(), "places.csv, row 3: cannot parse latitude 'north'");
    }

    #[test]
    fn bad_coordinate_names_source_row() {
        let mut t = Table::new("places.csv", vec!["name".into(), "latitude".into()]);
        t.push_row(vec!["A".into(), "42.3".into()], 2);
        t.push_row(vec!["B".into(), "north".into()], 5);
        let err = t.number(1, 1).unwrap_err();
        assert_eq!(err.to_string(), "places.csv, row 5: cannot parse latitude 'north'");
    }

    #[test]
    fn missing_column() {
        let err = table().require("address").unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { .. }));
    }

    #[test]
    fn retain_rows_by_mask() {
        let mut t = table();
        t.retain_rows(&[true, false, true]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.cell(1, 0), "C");
    }

    #[test]
    fn retain_rows_keeps_source_rows_aligned() {
        let mut t = Table::new("places.csv", vec!["name".into()]);
        t.push_row(vec!["A".into()], 2);
        t.push_row(vec!["B".into()], 4);
        t.push_row(vec!["C".into()], 7);
        t.retain_rows(&[false, true, true]);
        assert_eq!(t.source_rows, vec![4, 7]);
        assert_eq!(t.source_row(1), 7);
    }
}
