//! Column mapping from loaded tables into engine records.

use placemerge_recon::config::{NewColumns, OldColumns, PlaceColumns};
use placemerge_recon::model::{present_text, CatalogEntry, Listing, Provenance, SourceRecord};

use crate::error::IoError;
use crate::table::Table;

struct PlaceIdx {
    name: usize,
    address: usize,
    latitude: usize,
    longitude: usize,
}

fn place_idx(table: &Table, cols: &PlaceColumns) -> Result<PlaceIdx, IoError> {
    Ok(PlaceIdx {
        name: table.require(&cols.name)?,
        address: table.require(&cols.address)?,
        latitude: table.require(&cols.latitude)?,
        longitude: table.require(&cols.longitude)?,
    })
}

/// A mapped column must exist; an unmapped one is simply absent.
fn optional_idx(table: &Table, column: Option<&String>) -> Result<Option<usize>, IoError> {
    column.map(|c| table.require(c)).transpose()
}

fn text(table: &Table, row: usize, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| present_text(Some(table.cell(row, i))))
}

fn place(table: &Table, row: usize, idx: &PlaceIdx) -> Result<SourceRecord, IoError> {
    Ok(SourceRecord::new(
        table.cell(row, idx.name).trim(),
        table.cell(row, idx.address).trim(),
        table.number(row, idx.latitude)?,
        table.number(row, idx.longitude)?,
    ))
}

/// Yes/no cell: "Y", "yes", "true", "1" (any case) are yes.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "true" | "t" | "1"
    )
}

/// Old-method catalog rows. Fails fast on a missing column or a bad
/// coordinate.
pub fn load_old(table: &Table, cols: &OldColumns) -> Result<Vec<SourceRecord>, IoError> {
    let idx = place_idx(table, &cols.place)?;
    let external_id = optional_idx(table, cols.external_id.as_ref())?;
    let category = optional_idx(table, cols.category.as_ref())?;

    (0..table.len())
        .map(|row| {
            Ok(SourceRecord {
                external_id: text(table, row, external_id),
                category: text(table, row, category),
                ..place(table, row, &idx)?
            })
        })
        .collect()
}

/// New-method aggregate rows with per-upstream provenance.
///
/// An unmapped flag column is inferred: the new-method flag defaults to
/// yes, an upstream flag to "has any of its fields".
pub fn load_new(table: &Table, cols: &NewColumns) -> Result<Vec<SourceRecord>, IoError> {
    let idx = place_idx(table, &cols.place)?;
    let new_method = optional_idx(table, cols.new_method.as_ref())?;
    let a_flag = optional_idx(table, cols.source_a.as_ref())?;
    let a_category = optional_idx(table, cols.source_a_category.as_ref())?;
    let a_sub = optional_idx(table, cols.source_a_subcategory.as_ref())?;
    let b_flag = optional_idx(table, cols.source_b.as_ref())?;
    let b_id = optional_idx(table, cols.source_b_id.as_ref())?;
    let b_types = optional_idx(table, cols.source_b_types.as_ref())?;
    let c_flag = optional_idx(table, cols.source_c.as_ref())?;
    let c_id = optional_idx(table, cols.source_c_id.as_ref())?;
    let c_types = optional_idx(table, cols.source_c_types.as_ref())?;

    let flag = |row: usize, idx: Option<usize>, inferred: bool| match idx {
        Some(i) => parse_flag(table.cell(row, i)),
        None => inferred,
    };

    let listing = |row: usize, flag_idx: Option<usize>, id_idx: Option<usize>, types_idx: Option<usize>| {
        let id = text(table, row, id_idx);
        let types = text(table, row, types_idx);
        Listing {
            present: flag(row, flag_idx, id.is_some() || types.is_some()),
            id,
            types,
        }
    };

    (0..table.len())
        .map(|row| {
            let category = text(table, row, a_category);
            let sub_category = text(table, row, a_sub);
            let source_a = CatalogEntry {
                present: flag(row, a_flag, category.is_some() || sub_category.is_some()),
                category,
                sub_category,
            };
            Ok(SourceRecord {
                provenance: Provenance {
                    new_method: flag(row, new_method, true),
                    source_a,
                    source_b: listing(row, b_flag, b_id, b_types),
                    source_c: listing(row, c_flag, c_id, c_types),
                },
                ..place(table, row, &idx)?
            })
        })
        .collect()
}
