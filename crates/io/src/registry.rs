use std::path::Path;

use placemerge_recon::MergeResult;

use crate::error::IoError;
use crate::table::TableFormat;

/// Write the merged registry in the format implied by the extension.
/// JSON carries meta and summary alongside the rows; the tabular formats
/// carry only the rows.
pub fn write_registry(result: &MergeResult, path: &Path) -> Result<(), IoError> {
    match TableFormat::for_output(path)? {
        TableFormat::Csv => crate::csv::export_registry(&result.records, path),
        TableFormat::Tsv => {
            crate::csv::export(&crate::csv::registry_table(&result.records), path, b'\t')
        }
        TableFormat::Spreadsheet => crate::xlsx::export_registry(&result.records, path),
        TableFormat::Json => crate::json::export_result(result, path),
    }?;
    log::info!("wrote {} registry rows to {}", result.records.len(), path.display());
    Ok(())
}
