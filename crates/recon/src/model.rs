use serde::{Deserialize, Serialize};

use crate::config::MatchStrategy;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Upstream catalog that contributes a category and sub-category (Source-A).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub present: bool,
    pub category: Option<String>,
    pub sub_category: Option<String>,
}

/// Upstream listing that contributes an identifier and types (Source-B, Source-C).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub present: bool,
    pub id: Option<String>,
    pub types: Option<String>,
}

impl Listing {
    /// True when `kind` is one of this listing's type entries.
    pub fn has_type(&self, kind: &str) -> bool {
        self.types
            .as_deref()
            .is_some_and(|types| type_entries(types).any(|t| t == kind))
    }
}

/// Split a types cell into entries. Accepts a plain comma list
/// ("cafe, food") or a list literal ("['cafe', 'food']").
pub fn type_entries(types: &str) -> impl Iterator<Item = &str> {
    types
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|t| t.trim().trim_matches(|c: char| c == '\'' || c == '"').trim())
        .filter(|t| !t.is_empty())
}

/// Per-upstream-source provenance carried by new-method records.
/// Old-method records leave it at its default (nothing present).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub new_method: bool,
    pub source_a: CatalogEntry,
    pub source_b: Listing,
    pub source_c: Listing,
}

/// One place record from either collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub external_id: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl SourceRecord {
    pub fn new(name: impl Into<String>, address: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            latitude,
            longitude,
            external_id: None,
            category: None,
            provenance: Provenance::default(),
        }
    }
}

/// The two collections reconciled in one run.
#[derive(Debug, Clone, Default)]
pub struct MergeInput {
    pub old: Vec<SourceRecord>,
    pub new: Vec<SourceRecord>,
}

/// Fold an empty or whitespace-only cell into an absent value.
pub fn present_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Yes,
    No,
}

impl Presence {
    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for Presence {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl std::fmt::Display for Presence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "yes"),
            Self::No => write!(f, "no"),
        }
    }
}

/// One row of the merged registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRecord {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub old_method: Presence,
    pub source_a: Presence,
    pub source_a_category: Option<String>,
    pub source_a_subcategory: Option<String>,
    pub new_method: Presence,
    pub source_b: Presence,
    pub source_b_id: Option<String>,
    pub source_b_types: Option<String>,
    pub source_c: Presence,
    pub source_c_id: Option<String>,
    pub source_c_types: Option<String>,
    pub old_method_id: Option<String>,
    pub old_method_category: Option<String>,
}

/// Output column names, in registry order.
pub const REGISTRY_COLUMNS: [&str; 17] = [
    "name",
    "address",
    "latitude",
    "longitude",
    "old_method",
    "source_a",
    "source_a_category",
    "source_a_subcategory",
    "new_method",
    "source_b",
    "source_b_id",
    "source_b_types",
    "source_c",
    "source_c_id",
    "source_c_types",
    "old_method_id",
    "old_method_category",
];

impl MergedRecord {
    /// Cells in `REGISTRY_COLUMNS` order; absent values become empty strings.
    pub fn to_row(&self) -> Vec<String> {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        vec![
            self.name.clone(),
            self.address.clone(),
            self.latitude.to_string(),
            self.longitude.to_string(),
            self.old_method.to_string(),
            self.source_a.to_string(),
            text(&self.source_a_category),
            text(&self.source_a_subcategory),
            self.new_method.to_string(),
            self.source_b.to_string(),
            text(&self.source_b_id),
            text(&self.source_b_types),
            self.source_c.to_string(),
            text(&self.source_c_id),
            text(&self.source_c_types),
            text(&self.old_method_id),
            text(&self.old_method_category),
        ]
    }

    /// Number of originating collections (old-method, new-method) flagged.
    pub fn side_count(&self) -> usize {
        [self.old_method, self.new_method]
            .iter()
            .filter(|p| p.is_yes())
            .count()
    }
}

// ---------------------------------------------------------------------------
// Summary + Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub old_records: usize,
    pub new_records: usize,
    pub matched: usize,
    pub old_only: usize,
    pub new_only: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeMeta {
    pub config_name: String,
    pub strategy: MatchStrategy,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeResult {
    pub meta: MergeMeta,
    pub summary: MergeSummary,
    pub records: Vec<MergedRecord>,
}
