//! Type exclusion for new-method records.

use crate::model::SourceRecord;

/// Drop records whose Source-B types include any excluded type. Records
/// with no Source-B types are kept.
pub fn exclude_types(records: Vec<SourceRecord>, excluded: &[String]) -> Vec<SourceRecord> {
    if excluded.is_empty() {
        return records;
    }
    let before = records.len();
    let kept: Vec<SourceRecord> = records
        .into_iter()
        .filter(|r| {
            let hit = excluded.iter().find(|t| r.provenance.source_b.has_type(t));
            if let Some(kind) = hit {
                log::debug!("excluding '{}' (type {kind})", r.name);
            }
            hit.is_none()
        })
        .collect();
    log::info!(
        "type filter [{}]: kept {} of {} records",
        excluded.join(", "),
        kept.len(),
        before
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Listing;

    fn place(name: &str, types: Option<&str>) -> SourceRecord {
        let mut r = SourceRecord::new(name, "1 Main St", 42.35, -71.13);
        r.provenance.source_b = Listing {
            present: types.is_some(),
            id: None,
            types: types.map(str::to_string),
        };
        r
    }

    fn names(records: &[SourceRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn drops_any_excluded_type() {
        let records = vec![
            place("Station", Some("['transit_station', 'point_of_interest']")),
            place("Common", Some("park")),
            place("Cafe", Some("['cafe', 'food']")),
            place("Lot", Some("['parking']")),
            place("Shop", None),
        ];
        let kept = exclude_types(records, &["transit_station".into(), "park".into()]);
        assert_eq!(names(&kept), vec!["Cafe", "Lot", "Shop"]);
    }

    #[test]
    fn empty_list_keeps_everything() {
        let records = vec![place("Station", Some("transit_station"))];
        assert_eq!(exclude_types(records, &[]).len(), 1);
    }
}
