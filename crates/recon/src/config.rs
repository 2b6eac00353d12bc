use serde::{Deserialize, Serialize};

use crate::address::{DEFAULT_HOUSE_NUMBER_TOLERANCE, DEFAULT_NEIGHBORHOODS};
use crate::error::ReconError;

/// Default name-similarity threshold (scores must be strictly greater).
pub const DEFAULT_NAME_THRESHOLD: f64 = 0.6;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    pub name: String,
    #[serde(default)]
    pub strategy: MatchStrategy,
    pub old: OldSourceConfig,
    pub new: NewSourceConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub filter: Option<FilterConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Strategy + policies
// ---------------------------------------------------------------------------

/// How candidate pairs are committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// First acceptable candidate in input order wins.
    #[default]
    Greedy,
    /// Maximum-cardinality, maximum-weight assignment over all pairs.
    Optimal,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Greedy => write!(f, "greedy"),
            Self::Optimal => write!(f, "optimal"),
        }
    }
}

/// Source-A presence on a matched record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceAPolicy {
    /// Taken from the new-method record's own Source-A data.
    #[default]
    Record,
    /// Always "yes" on a match (legacy registries).
    Forced,
}

// ---------------------------------------------------------------------------
// Sources + column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct OldSourceConfig {
    pub file: String,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub columns: OldColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSourceConfig {
    pub file: String,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub columns: NewColumns,
}

/// Header names shared by both collections.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceColumns {
    #[serde(default = "default_name_col")]
    pub name: String,
    #[serde(default = "default_address_col")]
    pub address: String,
    #[serde(default = "default_latitude_col")]
    pub latitude: String,
    #[serde(default = "default_longitude_col")]
    pub longitude: String,
}

impl Default for PlaceColumns {
    fn default() -> Self {
        Self {
            name: default_name_col(),
            address: default_address_col(),
            latitude: default_latitude_col(),
            longitude: default_longitude_col(),
        }
    }
}

fn default_name_col() -> String {
    "name".into()
}
fn default_address_col() -> String {
    "address".into()
}
fn default_latitude_col() -> String {
    "latitude".into()
}
fn default_longitude_col() -> String {
    "longitude".into()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OldColumns {
    #[serde(flatten)]
    pub place: PlaceColumns,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// New-method headers. Every provenance column is optional; an unmapped
/// column leaves the field absent on every record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewColumns {
    #[serde(flatten)]
    pub place: PlaceColumns,
    #[serde(default)]
    pub new_method: Option<String>,
    #[serde(default)]
    pub source_a: Option<String>,
    #[serde(default)]
    pub source_a_category: Option<String>,
    #[serde(default)]
    pub source_a_subcategory: Option<String>,
    #[serde(default)]
    pub source_b: Option<String>,
    #[serde(default)]
    pub source_b_id: Option<String>,
    #[serde(default)]
    pub source_b_types: Option<String>,
    #[serde(default)]
    pub source_c: Option<String>,
    #[serde(default)]
    pub source_c_id: Option<String>,
    #[serde(default)]
    pub source_c_types: Option<String>,
}

// ---------------------------------------------------------------------------
// Matching + normalization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_name_threshold")]
    pub name_threshold: f64,
    #[serde(default = "default_house_number_tolerance")]
    pub house_number_tolerance: u64,
    #[serde(default)]
    pub source_a_on_match: SourceAPolicy,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            name_threshold: default_name_threshold(),
            house_number_tolerance: default_house_number_tolerance(),
            source_a_on_match: SourceAPolicy::default(),
        }
    }
}

fn default_name_threshold() -> f64 {
    DEFAULT_NAME_THRESHOLD
}

fn default_house_number_tolerance() -> u64 {
    DEFAULT_HOUSE_NUMBER_TOLERANCE
}

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizeConfig {
    #[serde(default = "default_neighborhoods")]
    pub neighborhoods: Vec<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            neighborhoods: default_neighborhoods(),
        }
    }
}

fn default_neighborhoods() -> Vec<String> {
    DEFAULT_NEIGHBORHOODS.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Filter + Output
// ---------------------------------------------------------------------------

/// Pre-filters applied before merging. The geographic ones apply to both
/// collections; `exclude_types` only to new-method records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub radius: Option<RadiusFilterConfig>,
    /// GeoJSON file holding the boundary polygon(s).
    #[serde(default)]
    pub boundary: Option<String>,
    /// Drop new-method records whose Source-B types include any of these
    /// (e.g. "transit_station", "park").
    #[serde(default)]
    pub exclude_types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RadiusFilterConfig {
    /// Table of reference points with latitude/longitude columns.
    pub points: String,
    pub meters: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Registry file; the extension picks csv, json or xlsx.
    #[serde(default)]
    pub file: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MergeConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: MergeConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let threshold = self.matching.name_threshold;
        if !(0.0..=2.0).contains(&threshold) {
            return Err(ReconError::ConfigValidation(format!(
                "matching.name_threshold must be within [0, 2], got {threshold}"
            )));
        }

        if self.matching.house_number_tolerance == 0 {
            return Err(ReconError::ConfigValidation(
                "matching.house_number_tolerance must be at least 1".into(),
            ));
        }

        for (side, file) in [("old", &self.old.file), ("new", &self.new.file)] {
            if file.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!("{side}.file is empty")));
            }
        }

        check_place_columns("old", &self.old.columns.place)?;
        check_place_columns("new", &self.new.columns.place)?;

        let optional = [
            ("old.columns.external_id", &self.old.columns.external_id),
            ("old.columns.category", &self.old.columns.category),
            ("new.columns.new_method", &self.new.columns.new_method),
            ("new.columns.source_a", &self.new.columns.source_a),
            ("new.columns.source_a_category", &self.new.columns.source_a_category),
            ("new.columns.source_a_subcategory", &self.new.columns.source_a_subcategory),
            ("new.columns.source_b", &self.new.columns.source_b),
            ("new.columns.source_b_id", &self.new.columns.source_b_id),
            ("new.columns.source_b_types", &self.new.columns.source_b_types),
            ("new.columns.source_c", &self.new.columns.source_c),
            ("new.columns.source_c_id", &self.new.columns.source_c_id),
            ("new.columns.source_c_types", &self.new.columns.source_c_types),
        ];
        for (key, value) in optional {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!("{key} is empty")));
            }
        }

        if let Some(ref filter) = self.filter {
            if let Some(ref radius) = filter.radius {
                if !radius.meters.is_finite() || radius.meters < 0.0 {
                    return Err(ReconError::ConfigValidation(format!(
                        "filter.radius.meters must be a non-negative number, got {}",
                        radius.meters
                    )));
                }
            }
            if filter.exclude_types.iter().any(|t| t.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(
                    "filter.exclude_types contains an empty entry".into(),
                ));
            }
        }

        Ok(())
    }
}

fn check_place_columns(side: &str, cols: &PlaceColumns) -> Result<(), ReconError> {
    let named = [
        ("name", &cols.name),
        ("address", &cols.address),
        ("latitude", &cols.latitude),
        ("longitude", &cols.longitude),
    ];
    for (key, value) in named {
        if value.trim().is_empty() {
            return Err(ReconError::ConfigValidation(format!(
                "{side}.columns.{key} is empty"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
