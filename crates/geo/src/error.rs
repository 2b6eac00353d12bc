use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("boundary is not valid JSON: {0}")]
    Json(String),

    #[error("boundary geometry: {0}")]
    Geometry(String),

    #[error("boundary contains no polygons")]
    Empty,
}
