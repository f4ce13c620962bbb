use crate::coord::{OsgbCoordinate, Wgs84Coordinate};
use crate::core::constants::MAX_PRECISION;
use crate::error::GridRefError;
use crate::geom::{parse_point, point_to_geojson, point_to_wkt};
use csv::StringRecord;
use geo_types::Point;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

/// Default number of rows converted per parallel batch.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Resolved column indices of the location source.
enum SourceIndices {
    GridRef(usize),
    Geometry(usize),
    Coordinates { x_idx: usize, y_idx: usize },
}

/// Coordinate reference system of X/Y or geometry input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Crs {
    /// WGS84 (EPSG:4326) - longitude/latitude coordinates
    #[default]
    Wgs84,
    /// British National Grid (EPSG:27700) - easting/northing coordinates
    Bng,
}

/// Output format for the WGS84 point geometry column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POINT(-0.1 51.5)")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

/// Specifies how to extract location data from CSV rows.
#[derive(Debug, Clone)]
pub enum LocationSource {
    /// A single column holding grid references such as "TQ 3003 8038"
    GridRefColumn(String),
    /// A single column containing a WKT or GeoJSON point
    GeometryColumn(String),
    /// Separate X and Y coordinate columns (e.g., Easting/Northing or Lon/Lat)
    CoordinateColumns { x_column: String, y_column: String },
}

/// Configuration for CSV location conversion.
#[derive(Debug, Clone)]
pub struct CsvGridConfig {
    pub source: LocationSource,
    pub exclude_columns: Vec<String>,
    pub crs: Crs,
    /// Digits per axis in the output grid reference (0-5).
    pub precision: u8,
    pub include_geometry: Option<GeometryFormat>,
    /// Rows read and converted at a time; bounds memory on large files.
    pub chunk_size: usize,
}

impl CsvGridConfig {
    /// Create config for a CSV with a grid reference column.
    ///
    /// # Example
    /// ```
    /// use osgb_gridref::CsvGridConfig;
    ///
    /// let config = CsvGridConfig::new("GridRef");
    /// assert_eq!(config.precision, 5);
    /// ```
    pub fn new(grid_ref_column: impl Into<String>) -> Self {
        Self::with_source(LocationSource::GridRefColumn(grid_ref_column.into()))
    }

    /// Create config for a CSV with separate X/Y coordinate columns.
    ///
    /// # Example
    /// ```
    /// use osgb_gridref::{CsvGridConfig, Crs};
    ///
    /// // For BNG coordinates (Easting/Northing)
    /// let config = CsvGridConfig::from_coords("Easting", "Northing").crs(Crs::Bng);
    ///
    /// // For WGS84 coordinates (Longitude/Latitude)
    /// let config = CsvGridConfig::from_coords("Longitude", "Latitude").crs(Crs::Wgs84);
    /// ```
    pub fn from_coords(x_column: impl Into<String>, y_column: impl Into<String>) -> Self {
        Self::with_source(LocationSource::CoordinateColumns {
            x_column: x_column.into(),
            y_column: y_column.into(),
        })
    }

    /// Create config for a CSV with a WKT or GeoJSON point column.
    pub fn from_geometry(geometry_column: impl Into<String>) -> Self {
        Self::with_source(LocationSource::GeometryColumn(geometry_column.into()))
    }

    fn with_source(source: LocationSource) -> Self {
        Self {
            source,
            exclude_columns: Vec::new(),
            crs: Crs::default(),
            precision: MAX_PRECISION,
            include_geometry: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    pub fn crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }

    pub fn precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    pub fn chunk_size(mut self, rows: usize) -> Self {
        self.chunk_size = rows;
        self
    }

    /// Include the WGS84 point geometry in output.
    pub fn with_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_geometry = Some(format);
        self
    }
}

/// Counts from one conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CsvSummary {
    pub rows: usize,
    pub converted: usize,
    pub failed: usize,
}

pub trait CsvToGrid {
    fn to_grid_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvGridConfig,
    ) -> Result<CsvSummary, GridRefError>;
}

impl<P: AsRef<Path>> CsvToGrid for P {
    fn to_grid_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvGridConfig,
    ) -> Result<CsvSummary, GridRefError> {
        csv_to_grid_csv(self, output_path, config)
    }
}

struct Located {
    grid_ref: String,
    osgb: OsgbCoordinate,
    wgs84: Wgs84Coordinate,
}

fn field<'r>(record: &'r StringRecord, idx: usize, name: &str) -> Result<&'r str, GridRefError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| GridRefError::CsvError(format!("Missing {} column at index {}", name, idx)))
}

fn locate_point(
    pt: Point<f64>,
    crs: Crs,
) -> Result<(OsgbCoordinate, Wgs84Coordinate), GridRefError> {
    match crs {
        Crs::Bng => {
            let osgb = OsgbCoordinate::new(pt.x(), pt.y());
            Ok((osgb, osgb.to_wgs84()?))
        }
        Crs::Wgs84 => {
            let wgs84 = Wgs84Coordinate::new(pt.y(), pt.x());
            Ok((wgs84.to_osgb()?, wgs84))
        }
    }
}

fn locate(
    record: &StringRecord,
    source: &SourceIndices,
    config: &CsvGridConfig,
) -> Result<Located, GridRefError> {
    let (osgb, wgs84) = match source {
        SourceIndices::GridRef(idx) => {
            let text = field(record, *idx, "grid reference")?;
            let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
            let osgb = OsgbCoordinate::parse_grid_ref(&cleaned)?;
            (osgb, osgb.to_wgs84()?)
        }
        SourceIndices::Geometry(idx) => {
            let pt = parse_point(field(record, *idx, "geometry")?)?;
            locate_point(pt, config.crs)?
        }
        SourceIndices::Coordinates { x_idx, y_idx } => {
            let x_str = field(record, *x_idx, "X")?;
            let y_str = field(record, *y_idx, "Y")?;
            let x: f64 = x_str
                .parse()
                .map_err(|_| GridRefError::CsvError(format!("Invalid X coordinate: '{}'", x_str)))?;
            let y: f64 = y_str
                .parse()
                .map_err(|_| GridRefError::CsvError(format!("Invalid Y coordinate: '{}'", y_str)))?;
            locate_point(Point::new(x, y), config.crs)?
        }
    };

    Ok(Located {
        grid_ref: osgb.grid_ref(config.precision)?,
        osgb,
        wgs84,
    })
}

fn located_row(loc: Located, geometry: Option<GeometryFormat>) -> Vec<String> {
    let mut row = vec![
        "OK".to_string(),
        loc.grid_ref,
        loc.osgb.easting.to_string(),
        loc.osgb.northing.to_string(),
        format!("{:.6}", loc.wgs84.latitude),
        format!("{:.6}", loc.wgs84.longitude),
    ];
    if let Some(format) = geometry {
        let pt = Point::from(loc.wgs84);
        row.push(match format {
            GeometryFormat::Wkt => point_to_wkt(&pt),
            GeometryFormat::GeoJson => point_to_geojson(&pt),
        });
    }
    row
}

fn failed_row(error: &GridRefError, geometry: Option<GeometryFormat>) -> Vec<String> {
    let mut row = vec![error.to_string()];
    row.extend(std::iter::repeat_n(String::new(), 5));
    if geometry.is_some() {
        row.push(String::new());
    }
    row
}

fn column_index(headers: &StringRecord, name: &str, role: &str) -> Result<usize, GridRefError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| GridRefError::CsvError(format!("{} column '{}' not found", role, name)))
}

/// Converts a CSV file with grid references, coordinate columns or point
/// geometries to a CSV with grid reference, easting/northing and WGS84 columns.
///
/// Rows that cannot be located are kept: their `status` column carries the
/// error and the location columns are left empty. Successful rows have
/// status `OK`.
///
/// Input is read in chunks of [`CsvGridConfig::chunk_size`] rows; each chunk
/// is converted in parallel and written before the next is read.
///
/// # Example with a grid reference column
///
/// ```no_run
/// use osgb_gridref::{csv_to_grid_csv, CsvGridConfig, GeometryFormat};
///
/// let config = CsvGridConfig::new("GridRef")
///     .precision(3)
///     .with_geometry(GeometryFormat::Wkt);
///
/// csv_to_grid_csv("sites.csv", "output.csv", &config).unwrap();
/// ```
///
/// # Example with coordinate columns
///
/// ```no_run
/// use osgb_gridref::{csv_to_grid_csv, CsvGridConfig, Crs};
///
/// let config = CsvGridConfig::from_coords("Easting", "Northing").crs(Crs::Bng);
///
/// csv_to_grid_csv("bus_stops.csv", "output.csv", &config).unwrap();
/// ```
pub fn csv_to_grid_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvGridConfig,
) -> Result<CsvSummary, GridRefError> {
    if config.precision > MAX_PRECISION {
        return Err(GridRefError::InvalidPrecision(config.precision));
    }

    let file = File::open(csv_path).map_err(|e| GridRefError::IoError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| GridRefError::CsvError(e.to_string()))?
        .clone();

    let mut exclude_indices = HashSet::new();
    let source_indices = match &config.source {
        LocationSource::GridRefColumn(col) => {
            let idx = column_index(&headers, col, "Grid reference")?;
            exclude_indices.insert(idx);
            SourceIndices::GridRef(idx)
        }
        LocationSource::GeometryColumn(col) => {
            let idx = column_index(&headers, col, "Geometry")?;
            exclude_indices.insert(idx);
            SourceIndices::Geometry(idx)
        }
        LocationSource::CoordinateColumns { x_column, y_column } => {
            let x_idx = column_index(&headers, x_column, "X")?;
            let y_idx = column_index(&headers, y_column, "Y")?;
            exclude_indices.insert(x_idx);
            exclude_indices.insert(y_idx);
            SourceIndices::Coordinates { x_idx, y_idx }
        }
    };

    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name) {
            exclude_indices.insert(idx);
        }
    }

    let out_file = File::create(output_path).map_err(|e| GridRefError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec![
        "status",
        "grid_ref",
        "easting",
        "northing",
        "latitude",
        "longitude",
    ];
    if config.include_geometry.is_some() {
        header_row.push("geometry");
    }
    for (i, h) in headers.iter().enumerate() {
        if !exclude_indices.contains(&i) {
            header_row.push(h);
        }
    }
    writer
        .write_record(&header_row)
        .map_err(|e| GridRefError::CsvError(e.to_string()))?;

    let chunk_size = config.chunk_size.max(1);
    let mut summary = CsvSummary::default();
    let mut records = reader.records();
    let mut chunk: Vec<StringRecord> = Vec::with_capacity(chunk_size);

    loop {
        chunk.clear();
        for record in records.by_ref().take(chunk_size) {
            chunk.push(record.map_err(|e| GridRefError::CsvError(e.to_string()))?);
        }
        if chunk.is_empty() {
            break;
        }

        let located: Vec<Result<Located, GridRefError>> = chunk
            .par_iter()
            .map(|record| locate(record, &source_indices, config))
            .collect();

        for (record, result) in chunk.iter().zip(located) {
            summary.rows += 1;
            let mut row = match result {
                Ok(loc) => {
                    summary.converted += 1;
                    located_row(loc, config.include_geometry)
                }
                Err(e) => {
                    summary.failed += 1;
                    log::debug!("row {}: {}", summary.rows, e);
                    failed_row(&e, config.include_geometry)
                }
            };

            for (i, value) in record.iter().enumerate() {
                if !exclude_indices.contains(&i) {
                    row.push(value.to_string());
                }
            }
            writer
                .write_record(&row)
                .map_err(|e| GridRefError::CsvError(e.to_string()))?;
        }
        log::debug!("wrote {} rows", summary.rows);
    }

    writer
        .flush()
        .map_err(|e| GridRefError::IoError(e.to_string()))?;

    log::info!(
        "converted {} of {} rows ({} failed)",
        summary.converted,
        summary.rows,
        summary.failed
    );
    Ok(summary)
}
