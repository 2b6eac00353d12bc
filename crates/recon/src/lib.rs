//! `placemerge-recon` - entity resolution and merge engine for place registries.
//!
//! Pure engine crate: receives pre-loaded records, returns the merged,
//! provenance-tagged registry. No CLI or IO dependencies.

pub mod address;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod model;
pub mod name;
pub mod number;
pub mod score;
pub mod summary;

pub use config::{MatchStrategy, MergeConfig, SourceAPolicy};
pub use engine::{merge, run, MergeOptions, MergeOutput};
pub use error::ReconError;
pub use filter::exclude_types;
pub use model::{MergeInput, MergeResult, MergedRecord, Presence, SourceRecord};
pub use score::{MatchScore, NameScore, NumberScore};
