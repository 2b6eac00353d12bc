//! `placemerge filter` - standalone pre-filters for place tables.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use placemerge_geo::{within_boundary, within_radius, Boundary, Located, Point};
use placemerge_io::{read_table, write_table, Table};
use placemerge_recon::model::type_entries;

use crate::CliError;

#[derive(Subcommand)]
pub enum FilterCommands {
    /// Keep places within a distance of any point of interest
    #[command(after_help = "\
Examples:
  placemerge filter radius --places places.csv --points stations.csv --meters 500
  placemerge filter radius --places places.xlsx --points poi.csv --meters 250 -o near.xlsx")]
    Radius {
        /// Place table (.csv, .tsv or spreadsheet)
        #[arg(long)]
        places: PathBuf,

        /// Reference points table
        #[arg(long)]
        points: PathBuf,

        /// Radius in meters (inclusive)
        #[arg(long)]
        meters: f64,

        /// Output table; defaults to <places>-filter-<points>-<R>m.csv beside the places file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Sheet name for spreadsheet inputs
        #[arg(long)]
        sheet: Option<String>,

        /// Latitude column header in both tables
        #[arg(long, default_value = "latitude")]
        latitude: String,

        /// Longitude column header in both tables
        #[arg(long, default_value = "longitude")]
        longitude: String,
    },

    /// Keep places inside a GeoJSON boundary
    #[command(after_help = "\
Examples:
  placemerge filter within --places places.csv --boundary allston.geojson")]
    Within {
        /// Place table (.csv, .tsv or spreadsheet)
        #[arg(long)]
        places: PathBuf,

        /// GeoJSON Polygon, MultiPolygon, Feature or FeatureCollection
        #[arg(long)]
        boundary: PathBuf,

        /// Output table; defaults to <places>-within-<boundary>.csv beside the places file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Sheet name for spreadsheet inputs
        #[arg(long)]
        sheet: Option<String>,

        /// Latitude column header
        #[arg(long, default_value = "latitude")]
        latitude: String,

        /// Longitude column header
        #[arg(long, default_value = "longitude")]
        longitude: String,
    },

    /// Drop places whose types column lists an excluded type
    #[command(after_help = "\
Examples:
  placemerge filter types --places google.csv --column types --exclude transit_station --exclude park")]
    Types {
        /// Place table (.csv, .tsv or spreadsheet)
        #[arg(long)]
        places: PathBuf,

        /// Column holding the types, as \"a, b\" or ['a', 'b']
        #[arg(long, default_value = "types")]
        column: String,

        /// Type to exclude (repeatable)
        #[arg(long, required = true)]
        exclude: Vec<String>,

        /// Output table; defaults to <places>-exclude-<types>.csv beside the places file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Sheet name for spreadsheet inputs
        #[arg(long)]
        sheet: Option<String>,
    },
}

pub fn cmd_filter(cmd: FilterCommands) -> Result<(), CliError> {
    match cmd {
        FilterCommands::Radius {
            places,
            points,
            meters,
            output,
            sheet,
            latitude,
            longitude,
        } => {
            if !meters.is_finite() || meters < 0.0 {
                return Err(CliError::usage(format!(
                    "--meters must be a non-negative number, got {meters}"
                )));
            }
            let reference = load_points(&points, &latitude, &longitude)?;
            let output = output.unwrap_or_else(|| {
                sibling(&places, &format!("filter-{}-{meters}m", stem(&points)))
            });
            filter_table(&places, sheet.as_deref(), &latitude, &longitude, &output, |rows| {
                within_radius(rows, &reference, meters)
            })
        }
        FilterCommands::Within {
            places,
            boundary,
            output,
            sheet,
            latitude,
            longitude,
        } => {
            let shape = load_boundary(&boundary)?;
            let output = output
                .unwrap_or_else(|| sibling(&places, &format!("within-{}", stem(&boundary))));
            filter_table(&places, sheet.as_deref(), &latitude, &longitude, &output, |rows| {
                within_boundary(rows, &shape)
            })
        }
        FilterCommands::Types {
            places,
            column,
            exclude,
            output,
            sheet,
        } => {
            if exclude.iter().any(|t| t.trim().is_empty()) {
                return Err(CliError::usage("--exclude must not be empty"));
            }
            let output = output
                .unwrap_or_else(|| sibling(&places, &format!("exclude-{}", exclude.join("-"))));
            let table = read_table(&places, sheet.as_deref())?;
            let col = table.require(&column)?;
            let mask: Vec<bool> = (0..table.len())
                .map(|row| {
                    !type_entries(table.cell(row, col)).any(|t| exclude.iter().any(|x| x == t))
                })
                .collect();
            write_filtered(table, &mask, &output)
        }
    }
}

/// A table row with a position.
struct Row {
    index: usize,
    point: Point,
}

impl Located for Row {
    fn latitude(&self) -> f64 {
        self.point.latitude
    }
    fn longitude(&self) -> f64 {
        self.point.longitude
    }
}

fn filter_table(
    places: &Path,
    sheet: Option<&str>,
    latitude: &str,
    longitude: &str,
    output: &Path,
    keep: impl FnOnce(Vec<Row>) -> Vec<Row>,
) -> Result<(), CliError> {
    let table = read_table(places, sheet)?;
    let rows = located_rows(&table, latitude, longitude)?;

    let mut mask = vec![false; table.len()];
    for row in keep(rows) {
        mask[row.index] = true;
    }
    write_filtered(table, &mask, output)
}

fn write_filtered(mut table: Table, mask: &[bool], output: &Path) -> Result<(), CliError> {
    let before = table.len();
    table.retain_rows(mask);

    write_table(&table, output).map_err(|e| CliError::output(e.to_string()))?;
    eprintln!(
        "kept {} of {} places, wrote {}",
        table.len(),
        before,
        output.display()
    );
    Ok(())
}

/// Rows with both coordinates; blank ones are dropped with a warning.
fn located_rows(table: &Table, latitude: &str, longitude: &str) -> Result<Vec<Row>, CliError> {
    let coordinates = table.coordinates(latitude, longitude)?;
    let mut rows = Vec::with_capacity(coordinates.len());
    for (index, coordinate) in coordinates.into_iter().enumerate() {
        match coordinate {
            Some(c) => rows.push(Row {
                index,
                point: Point::from(c),
            }),
            None => log::warn!(
                "{}, row {}: no coordinates, dropped",
                table.name,
                table.source_row(index)
            ),
        }
    }
    Ok(rows)
}

/// Reference points from a table with latitude/longitude columns.
pub fn load_points(path: &Path, latitude: &str, longitude: &str) -> Result<Vec<Point>, CliError> {
    let table = read_table(path, None)?;
    let points: Vec<Point> = located_rows(&table, latitude, longitude)?
        .into_iter()
        .map(|row| row.point)
        .collect();
    if points.is_empty() {
        log::warn!("{}: no reference points, radius filter keeps nothing", path.display());
    }
    Ok(points)
}

pub fn load_boundary(path: &Path) -> Result<Boundary, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::input(format!("cannot read boundary {}: {e}", path.display())))?;
    Boundary::from_geojson(&text)
        .map_err(|e| CliError::geo(format!("{}: {e}", path.display())))
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `<dir>/<stem>-<suffix>.csv` beside `path`.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    path.with_file_name(format!("{}-{suffix}.csv", stem(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_names() {
        let places = Path::new("/data/brighton_places.xlsx");
        assert_eq!(
            sibling(places, &format!("filter-{}-{}m", stem(Path::new("poi.csv")), 500.0)),
            PathBuf::from("/data/brighton_places-filter-poi-500m.csv")
        );
        assert_eq!(
            sibling(places, "within-allston"),
            PathBuf::from("/data/brighton_places-within-allston.csv")
        );
    }

    #[test]
    fn blank_coordinates_are_dropped() {
        let table = Table {
            name: "places.csv".into(),
            headers: vec!["name".into(), "latitude".into(), "longitude".into()],
            rows: vec![
                vec!["A".into(), "42.35".into(), "-71.13".into()],
                vec!["B".into(), "".into(), "".into()],
            ],
            source_rows: Vec::new(),
        };
        let rows = located_rows(&table, "latitude", "longitude").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[0].point, Point::new(42.35, -71.13));
    }
}
