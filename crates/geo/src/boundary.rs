use serde_json::Value;

use crate::error::GeoError;
use crate::Located;

/// `(longitude, latitude)`, GeoJSON axis order.
type Ring = Vec<(f64, f64)>;

/// Union of polygons read from GeoJSON. Each polygon is an outer ring
/// followed by its holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    polygons: Vec<Vec<Ring>>,
}

impl Boundary {
    /// Accepts a Polygon, MultiPolygon, Feature, FeatureCollection or
    /// GeometryCollection. Any other geometry is an error.
    pub fn from_geojson(input: &str) -> Result<Self, GeoError> {
        let doc: Value = serde_json::from_str(input).map_err(|e| GeoError::Json(e.to_string()))?;
        let mut polygons = Vec::new();
        collect(&doc, &mut polygons)?;
        if polygons.is_empty() {
            return Err(GeoError::Empty);
        }
        log::debug!("boundary: {} polygons", polygons.len());
        Ok(Self { polygons })
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Even-odd containment against every ring of each polygon, so a point
    /// inside a hole is outside. Points exactly on an edge may go either way.
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        self.polygons.iter().any(|rings| {
            rings
                .iter()
                .filter(|ring| crosses_odd(ring, longitude, latitude))
                .count()
                % 2
                == 1
        })
    }

    pub fn contains_point(&self, item: &impl Located) -> bool {
        self.contains(item.longitude(), item.latitude())
    }
}

/// Keep records inside the boundary.
pub fn within_boundary<T: Located>(records: Vec<T>, boundary: &Boundary) -> Vec<T> {
    let before = records.len();
    let kept: Vec<T> = records
        .into_iter()
        .filter(|r| boundary.contains_point(r))
        .collect();
    log::info!("boundary filter: kept {} of {} records", kept.len(), before);
    kept
}

fn crosses_odd(ring: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for (i, &(xi, yi)) in ring.iter().enumerate() {
        let (xj, yj) = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn collect(node: &Value, out: &mut Vec<Vec<Ring>>) -> Result<(), GeoError> {
    let kind = node
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| GeoError::Geometry("object without a \"type\"".into()))?;

    match kind {
        "FeatureCollection" => {
            for feature in array(node, "features")? {
                collect(feature, out)?;
            }
        }
        "Feature" => match node.get("geometry") {
            Some(Value::Null) | None => log::warn!("boundary: skipping feature without geometry"),
            Some(geometry) => collect(geometry, out)?,
        },
        "GeometryCollection" => {
            for geometry in array(node, "geometries")? {
                collect(geometry, out)?;
            }
        }
        "Polygon" => out.push(polygon(coordinates(node)?)?),
        "MultiPolygon" => {
            for p in as_array(coordinates(node)?, "MultiPolygon")? {
                out.push(polygon(p)?);
            }
        }
        other => {
            return Err(GeoError::Geometry(format!(
                "unsupported geometry type '{other}'"
            )))
        }
    }
    Ok(())
}

fn array<'a>(node: &'a Value, key: &str) -> Result<&'a Vec<Value>, GeoError> {
    node.get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| GeoError::Geometry(format!("missing \"{key}\" array")))
}

fn coordinates(node: &Value) -> Result<&Value, GeoError> {
    node.get("coordinates")
        .ok_or_else(|| GeoError::Geometry("missing \"coordinates\"".into()))
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, GeoError> {
    value
        .as_array()
        .ok_or_else(|| GeoError::Geometry(format!("{what} coordinates must be an array")))
}

fn polygon(value: &Value) -> Result<Vec<Ring>, GeoError> {
    let rings = as_array(value, "Polygon")?
        .iter()
        .map(ring)
        .collect::<Result<Vec<_>, _>>()?;
    if rings.is_empty() {
        return Err(GeoError::Geometry("polygon without rings".into()));
    }
    Ok(rings)
}

fn ring(value: &Value) -> Result<Ring, GeoError> {
    let positions = as_array(value, "ring")?;
    if positions.len() < 4 {
        return Err(GeoError::Geometry(format!(
            "ring needs at least 4 positions, got {}",
            positions.len()
        )));
    }
    positions
        .iter()
        .map(|p| match p.as_array().map(Vec::as_slice) {
            Some([lon, lat, ..]) => match (lon.as_f64(), lat.as_f64()) {
                (Some(lon), Some(lat)) => Ok((lon, lat)),
                _ => Err(GeoError::Geometry(format!("non-numeric position {p}"))),
            },
            _ => Err(GeoError::Geometry(format!("bad position {p}"))),
        })
        .collect()
}
