pub mod batch;
pub mod csv;

pub use batch::{GridToWgs84, Wgs84ToGrid, validate_grid_refs};
pub use csv::{
    CsvGridConfig, CsvSummary, CsvToGrid, Crs, DEFAULT_CHUNK_SIZE, GeometryFormat, LocationSource,
    csv_to_grid_csv,
};
