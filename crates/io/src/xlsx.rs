// Excel / ODS import via calamine, export via rust_xlsxwriter

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use placemerge_recon::model::{MergedRecord, REGISTRY_COLUMNS};

use crate::error::IoError;
use crate::table::Table;

/// Import one worksheet as a table; the first row holds the headers.
/// `sheet` defaults to the first sheet in the workbook.
pub fn import(path: &Path, sheet: Option<&str>) -> Result<Table, IoError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| IoError::Spreadsheet(format!("cannot open {}: {e}", path.display())))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook.sheet_names().first().cloned().ok_or_else(|| {
            IoError::Spreadsheet(format!("{} contains no sheets", path.display()))
        })?,
    };

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        IoError::Spreadsheet(format!("cannot read sheet '{sheet_name}' of {}: {e}", path.display()))
    })?;

    // 1-based sheet row of the header; the used range may not start at A1.
    let header_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|r| r.iter().map(|c| cell_text(c).trim().to_string()).collect())
        .unwrap_or_default();

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut table = Table::new(format!("{name}[{sheet_name}]"), headers);

    for (i, row) in rows.enumerate() {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        table.push_row(cells, header_row + i + 1);
    }

    Ok(table)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Whole numbers (IDs, house numbers) without a trailing ".0"
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{e:?}"),
    }
}

fn write_err(path: &Path) -> impl Fn(XlsxError) -> IoError + '_ {
    move |e| IoError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

fn write_headers(worksheet: &mut Worksheet, headers: &[&str]) -> Result<(), XlsxError> {
    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    worksheet.set_freeze_panes(1, 0)?;
    Ok(())
}

/// Write the registry to a single "registry" worksheet. Coordinates are
/// written as numbers, everything else as text.
pub fn export_registry(records: &[MergedRecord], path: &Path) -> Result<(), IoError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("registry").map_err(write_err(path))?;
    write_headers(worksheet, &REGISTRY_COLUMNS).map_err(write_err(path))?;

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in record.to_row().into_iter().enumerate() {
            let col16 = col as u16;
            let written = match col {
                2 => worksheet.write_number(row, col16, record.latitude),
                3 => worksheet.write_number(row, col16, record.longitude),
                _ if value.is_empty() => continue,
                _ => worksheet.write_string(row, col16, value),
            };
            written.map_err(write_err(path))?;
        }
    }

    workbook.save(path).map_err(write_err(path))?;
    Ok(())
}

/// Write a plain table (e.g. a filtered place list) as text cells.
pub fn export_table(table: &Table, path: &Path) -> Result<(), IoError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let headers: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    write_headers(worksheet, &headers).map_err(write_err(path))?;

    for (i, row) in table.rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string((i + 1) as u32, col as u16, value)
                .map_err(write_err(path))?;
        }
    }

    workbook.save(path).map_err(write_err(path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use placemerge_recon::engine::old_only_record;
    use placemerge_recon::model::SourceRecord;
    use tempfile::tempdir;

    #[test]
    fn float_cells_drop_trailing_zero() {
        assert_eq!(cell_text(&Data::Float(12345.0)), "12345");
        assert_eq!(cell_text(&Data::Float(42.35)), "42.35");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn registry_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.xlsx");
        let record = old_only_record(&SourceRecord {
            external_id: Some("A1".into()),
            ..SourceRecord::new("Joe's Pizza", "123 Main St", 42.35, -71.13)
        });
        export_registry(&[record], &path).unwrap();

        let table = import(&path, None).unwrap();
        assert_eq!(table.headers.len(), REGISTRY_COLUMNS.len());
        assert_eq!(table.headers[0], "name");
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, 0), "Joe's Pizza");
        assert_eq!(table.cell(0, 2), "42.35");
        assert_eq!(table.cell(0, 4), "yes");
        assert_eq!(table.cell(0, 15), "A1");
    }

    #[test]
    fn table_round_trip_with_named_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("places.xlsx");
        let mut table = Table::new("t", vec!["name".into(), "address".into()]);
        table.rows.push(vec!["Corner Cafe".into(), "10 Main St".into()]);
        table.rows.push(vec![String::new(), String::new()]);
        table.rows.push(vec!["Bike Shop".into(), "4 Elm St".into()]);
        export_table(&table, &path).unwrap();

        let back = import(&path, Some("Sheet1")).unwrap();
        assert_eq!(back.headers, table.headers);
        assert_eq!(back.len(), 2);
        assert_eq!(back.cell(1, 0), "Bike Shop");
        // The blank sheet row is skipped but still counted.
        assert_eq!(back.source_rows, vec![2, 4]);
    }

    #[test]
    fn unknown_sheet_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("places.xlsx");
        export_table(&Table::new("t", vec!["name".into()]), &path).unwrap();
        assert!(matches!(
            import(&path, Some("Nope")),
            Err(IoError::Spreadsheet(_))
        ));
    }
}
