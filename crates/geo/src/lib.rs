//! `placemerge-geo` - spatial pre-filters applied to place collections
//! before they reach the merge engine.
//!
//! Coordinates are WGS84 degrees. Distances use a spherical Earth.

pub mod boundary;
pub mod distance;
pub mod error;

pub use boundary::{within_boundary, Boundary};
pub use distance::{haversine_m, nearest_m, within_radius, EARTH_RADIUS_M};
pub use error::GeoError;

use placemerge_recon::SourceRecord;

/// Anything with a position.
pub trait Located {
    fn latitude(&self) -> f64;
    fn longitude(&self) -> f64;
}

/// A bare coordinate, for table rows and reference points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<(f64, f64)> for Point {
    /// `(latitude, longitude)`
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

impl Located for Point {
    fn latitude(&self) -> f64 {
        self.latitude
    }
    fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl Located for SourceRecord {
    fn latitude(&self) -> f64 {
        self.latitude
    }
    fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl<T: Located> Located for &T {
    fn latitude(&self) -> f64 {
        (**self).latitude()
    }
    fn longitude(&self) -> f64 {
        (**self).longitude()
    }
}
