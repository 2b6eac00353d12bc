use log::info;

use crate::config::{MatchStrategy, MergeConfig, SourceAPolicy};
use crate::error::ReconError;
use crate::matcher::{match_greedy, match_optimal, MatchOptions};
use crate::model::{MergeInput, MergeMeta, MergeResult, MergedRecord, Presence, SourceRecord};
use crate::summary::compute_summary;

#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    pub strategy: MatchStrategy,
    pub matching: MatchOptions,
    pub source_a_policy: SourceAPolicy,
}

impl MergeOptions {
    pub fn from_config(config: &MergeConfig) -> Self {
        Self {
            strategy: config.strategy,
            matching: MatchOptions::from_config(config),
            source_a_policy: config.matching.source_a_on_match,
        }
    }
}

/// Registry rows plus how many of them came from matched pairs.
#[derive(Debug, Clone)]
pub struct MergeOutput {
    pub records: Vec<MergedRecord>,
    pub matched: usize,
}

/// Run one reconciliation per config. Returns the registry + summary.
pub fn run(config: &MergeConfig, input: &MergeInput) -> Result<MergeResult, ReconError> {
    let options = MergeOptions::from_config(config);
    info!(
        "merging {} old-method and {} new-method records ({} strategy)",
        input.old.len(),
        input.new.len(),
        options.strategy
    );

    let output = merge(&input.old, &input.new, &options);
    let summary = compute_summary(&output, input.old.len(), input.new.len())?;

    info!(
        "registry: {} records ({} matched, {} old-only, {} new-only)",
        summary.total, summary.matched, summary.old_only, summary.new_only
    );

    Ok(MergeResult {
        meta: MergeMeta {
            config_name: config.name.clone(),
            strategy: options.strategy,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        records: output.records,
    })
}

/// Pair the collections and assemble the registry.
///
/// Row order: matched pairs in old-index order, then unmatched old records,
/// then unmatched new records, each in input order.
pub fn merge(old: &[SourceRecord], new: &[SourceRecord], options: &MergeOptions) -> MergeOutput {
    let pairs = match options.strategy {
        MatchStrategy::Greedy => match_greedy(old, new, &options.matching),
        MatchStrategy::Optimal => match_optimal(old, new, &options.matching),
    };

    let mut old_claimed = vec![false; old.len()];
    let mut new_claimed = vec![false; new.len()];
    let mut records = Vec::with_capacity(old.len() + new.len() - pairs.len());

    for &(i, j) in &pairs {
        old_claimed[i] = true;
        new_claimed[j] = true;
        records.push(matched_record(&old[i], &new[j], options.source_a_policy));
    }

    records.extend(
        old.iter()
            .zip(&old_claimed)
            .filter(|(_, claimed)| !**claimed)
            .map(|(r, _)| old_only_record(r)),
    );
    records.extend(
        new.iter()
            .zip(&new_claimed)
            .filter(|(_, claimed)| !**claimed)
            .map(|(r, _)| new_only_record(r)),
    );

    MergeOutput {
        records,
        matched: pairs.len(),
    }
}

/// Geography, category and provenance come from the new-method record; the
/// old-method record contributes its identifier and category.
pub fn matched_record(old: &SourceRecord, new: &SourceRecord, policy: SourceAPolicy) -> MergedRecord {
    let p = &new.provenance;
    let source_a = match policy {
        SourceAPolicy::Forced => true,
        SourceAPolicy::Record => p.source_a.present || p.source_a.category.is_some(),
    };

    MergedRecord {
        name: new.name.clone(),
        address: new.address.clone(),
        latitude: new.latitude,
        longitude: new.longitude,
        old_method: Presence::Yes,
        source_a: source_a.into(),
        source_a_category: p.source_a.category.clone(),
        source_a_subcategory: p.source_a.sub_category.clone(),
        new_method: Presence::Yes,
        source_b: p.source_b.types.is_some().into(),
        source_b_id: p.source_b.id.clone(),
        source_b_types: p.source_b.types.clone(),
        source_c: p.source_c.types.is_some().into(),
        source_c_id: p.source_c.id.clone(),
        source_c_types: p.source_c.types.clone(),
        old_method_id: old.external_id.clone(),
        old_method_category: old.category.clone(),
    }
}

/// Unmatched old-method record: every other source absent.
pub fn old_only_record(old: &SourceRecord) -> MergedRecord {
    MergedRecord {
        name: old.name.clone(),
        address: old.address.clone(),
        latitude: old.latitude,
        longitude: old.longitude,
        old_method: Presence::Yes,
        source_a: Presence::No,
        source_a_category: None,
        source_a_subcategory: None,
        new_method: Presence::No,
        source_b: Presence::No,
        source_b_id: None,
        source_b_types: None,
        source_c: Presence::No,
        source_c_id: None,
        source_c_types: None,
        old_method_id: old.external_id.clone(),
        old_method_category: old.category.clone(),
    }
}

/// Unmatched new-method record: its own presence flags pass through as-is.
pub fn new_only_record(new: &SourceRecord) -> MergedRecord {
    let p = &new.provenance;
    MergedRecord {
        name: new.name.clone(),
        address: new.address.clone(),
        latitude: new.latitude,
        longitude: new.longitude,
        old_method: Presence::No,
        source_a: p.source_a.present.into(),
        source_a_category: p.source_a.category.clone(),
        source_a_subcategory: p.source_a.sub_category.clone(),
        new_method: p.new_method.into(),
        source_b: p.source_b.present.into(),
        source_b_id: p.source_b.id.clone(),
        source_b_types: p.source_b.types.clone(),
        source_c: p.source_c.present.into(),
        source_c_id: p.source_c.id.clone(),
        source_c_types: p.source_c.types.clone(),
        old_method_id: None,
        old_method_category: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CatalogEntry, Listing, Provenance};

    fn old_rec(name: &str, address: &str, id: &str) -> SourceRecord {
        SourceRecord {
            external_id: Some(id.into()),
            category: Some("Restaurant".into()),
            ..SourceRecord::new(name, address, 42.3501, -71.1301)
        }
    }

    fn new_rec(name: &str, address: &str) -> SourceRecord {
        SourceRecord {
            provenance: Provenance {
                new_method: true,
                source_a: CatalogEntry::default(),
                source_b: Listing {
                    present: true,
                    id: Some("ChIJ123".into()),
                    types: Some("restaurant, food".into()),
                },
                source_c: Listing {
                    present: true,
                    id: Some("yelp-9".into()),
                    types: None,
                },
            },
            ..SourceRecord::new(name, address, 42.35, -71.13)
        }
    }

    #[test]
    fn matched_record_takes_new_geography_and_old_id() {
        let old = vec![old_rec("Joe's Pizza", "123 Main Street", "A1")];
        let new = vec![new_rec("joes pizza", "123 Main St")];
        let out = merge(&old, &new, &MergeOptions::default());

        assert_eq!(out.matched, 1);
        assert_eq!(out.records.len(), 1);
        let r = &out.records[0];
        assert_eq!(r.name, "joes pizza");
        assert_eq!(r.address, "123 Main St");
        assert_eq!(r.latitude, 42.35);
        assert_eq!(r.old_method, Presence::Yes);
        assert_eq!(r.new_method, Presence::Yes);
        assert_eq!(r.old_method_id.as_deref(), Some("A1"));
        assert_eq!(r.old_method_category.as_deref(), Some("Restaurant"));
        assert_eq!(r.source_b, Presence::Yes);
        assert_eq!(r.source_b_id.as_deref(), Some("ChIJ123"));
        // Source-C listed but without types: derived flag is "no".
        assert_eq!(r.source_c, Presence::No);
        assert_eq!(r.source_c_id.as_deref(), Some("yelp-9"));
    }

    #[test]
    fn source_a_policy() {
        let old = old_rec("Joe's Pizza", "123 Main Street", "A1");
        let mut new = new_rec("joes pizza", "123 Main St");

        assert_eq!(matched_record(&old, &new, SourceAPolicy::Record).source_a, Presence::No);
        assert_eq!(matched_record(&old, &new, SourceAPolicy::Forced).source_a, Presence::Yes);

        new.provenance.source_a.category = Some("Food Service".into());
        assert_eq!(matched_record(&old, &new, SourceAPolicy::Record).source_a, Presence::Yes);
    }

    #[test]
    fn unmatched_records_pass_through() {
        let old = vec![old_rec("Shell", "1 Cambridge St", "A7")];
        let mut only_b = new_rec("Bagel Co", "9 Harvard Ave");
        only_b.provenance.new_method = false;
        let new = vec![only_b];

        let out = merge(&old, &new, &MergeOptions::default());
        assert_eq!(out.matched, 0);
        assert_eq!(out.records.len(), 2);

        let o = &out.records[0];
        assert_eq!(o.name, "Shell");
        assert_eq!(o.old_method, Presence::Yes);
        assert_eq!(o.new_method, Presence::No);
        assert_eq!(o.source_b, Presence::No);
        assert!(o.source_b_id.is_none());
        assert_eq!(o.old_method_id.as_deref(), Some("A7"));

        let n = &out.records[1];
        assert_eq!(n.name, "Bagel Co");
        assert_eq!(n.old_method, Presence::No);
        // Own flags unchanged, not reset.
        assert_eq!(n.new_method, Presence::No);
        assert_eq!(n.source_b, Presence::Yes);
        assert_eq!(n.source_c, Presence::Yes);
        assert!(n.old_method_id.is_none());
    }

    #[test]
    fn registry_order_matched_then_old_then_new() {
        let old = vec![
            old_rec("Old Only", "1 Elm St", "A1"),
            old_rec("Corner Cafe", "10 Main St", "A2"),
        ];
        let new = vec![
            new_rec("New Only", "5 Oak St"),
            new_rec("Corner Cafe", "10 Main St"),
        ];
        let out = merge(&old, &new, &MergeOptions::default());
        let names: Vec<&str> = out.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Corner Cafe", "Old Only", "New Only"]);
    }

    #[test]
    fn empty_inputs() {
        let out = merge(&[], &[], &MergeOptions::default());
        assert!(out.records.is_empty());
        assert_eq!(out.matched, 0);
    }
}
