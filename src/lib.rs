//! # osgb-gridref
//!
//! Conversion between Ordnance Survey National Grid references and WGS84
//! latitude/longitude, plus validation of user-entered locations.
//!
//! ### 1. `OsgbCoordinate` - National Grid positions
//!
//! ```
//! use osgb_gridref::OsgbCoordinate;
//!
//! # fn main() -> Result<(), osgb_gridref::GridRefError> {
//! let osgb = OsgbCoordinate::parse_grid_ref("TQ 30030 80380")?;
//! assert_eq!(osgb.easting, 530030.0);
//!
//! let wgs84 = osgb.to_wgs84()?;
//! assert!((wgs84.latitude - 51.5074).abs() < 0.001);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `Wgs84Coordinate` - GPS positions
//!
//! ```
//! use osgb_gridref::Wgs84Coordinate;
//!
//! # fn main() -> Result<(), osgb_gridref::GridRefError> {
//! let osgb = Wgs84Coordinate::new(51.5074, -0.1278).to_osgb()?;
//! assert_eq!(osgb.grid_ref(4)?, "TQ 3002 8038");
//!
//! let nyc = Wgs84Coordinate::new(40.7128, -74.0060);
//! assert!(nyc.to_osgb().is_err());
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. Validators
//!
//! Validators take the raw text a user typed and never fail; they report
//! messages and, on success, the WGS84 position.
//!
//! ```
//! use osgb_gridref::validate_os_grid_reference_number;
//!
//! let result = validate_os_grid_reference_number("TQ 3003 8038");
//! assert!(result.valid);
//! assert!(result.position.is_some());
//! ```
//!
//! ### 4. `CsvToGrid` - CSV File Conversion
//!
//! ```no_run
//! use osgb_gridref::{CsvGridConfig, CsvToGrid, GeometryFormat};
//!
//! let config = CsvGridConfig::new("GridRef")
//!     .exclude(vec!["Notes".into()])
//!     .with_geometry(GeometryFormat::Wkt);
//!
//! "sites.csv".to_grid_csv("output.csv", &config).unwrap();
//! ```

pub mod coord;
pub mod core;
pub mod error;
pub mod geom;
pub mod io;
pub mod validate;

pub use coord::{Coordinate, OsgbCoordinate, Wgs84Coordinate, bng_to_wgs84, wgs84_to_bng};
pub use core::{
    AIRY_1830, BoundingBox, Ellipsoid, GREAT_BRITAIN, GRID_PREFIXES, HelmertParams, IRELAND,
    NATIONAL_GRID, OSGB36_TO_WGS84, Projection, WGS84, WGS84_TO_OSGB36, shift_datum,
};
pub use error::GridRefError;
pub use geom::{parse_point, point_to_geojson, point_to_wkt};
pub use io::{
    Crs, CsvGridConfig, CsvSummary, CsvToGrid, GeometryFormat, GridToWgs84, LocationSource,
    Wgs84ToGrid, csv_to_grid_csv, validate_grid_refs,
};
pub use validate::{
    DegreesDecimalMinutes, DegreesMinutesSeconds, FieldError, FormValidation, LocationForm,
    LocationMethod, Validation, validate_decimal_degrees, validate_degrees_decimal_minutes,
    validate_degrees_minutes_seconds, validate_easting_northing, validate_form,
    validate_national_grid_field_number, validate_os_grid_ref, validate_os_grid_reference_number,
};

pub use geo_types;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use geo_types::point;

    #[test]
    fn test_grid_ref_to_latlon_london() -> Result<(), GridRefError> {
        let wgs84 = OsgbCoordinate::parse_grid_ref("TQ 30030 80380")?.to_wgs84()?;

        assert_abs_diff_eq!(wgs84.latitude, 51.5074, epsilon = 0.001);
        assert_abs_diff_eq!(wgs84.longitude, -0.1278, epsilon = 0.001);
        Ok(())
    }

    #[test]
    fn test_latlon_to_grid_ref_london() -> Result<(), GridRefError> {
        let osgb = Wgs84Coordinate::new(51.5074, -0.1278).to_osgb()?;

        assert_abs_diff_eq!(osgb.easting, 530029.0, epsilon = 1.0);
        assert_abs_diff_eq!(osgb.northing, 180380.0, epsilon = 1.0);
        assert!(osgb.grid_ref(5)?.starts_with("TQ "));
        Ok(())
    }

    #[test]
    fn test_outside_great_britain() {
        let result = Wgs84Coordinate::new(40.7128, -74.0060).to_osgb();
        assert_eq!(result, Err(GridRefError::OutsideGreatBritain));

        let result = validate_decimal_degrees("40.7128", "-74.0060");
        assert!(!result.valid);
        assert_eq!(result.first_error(), Some("Coordinates must be within Great Britain"));
    }

    #[test]
    fn test_grid_ref_round_trip() -> Result<(), GridRefError> {
        for (e, n) in [(530030.0, 180380.0), (216667.0, 771285.0), (383640.0, 398260.0)] {
            let back = OsgbCoordinate::new(e, n).to_wgs84()?.to_osgb()?;
            assert_eq!(back, OsgbCoordinate::new(e, n));
        }
        Ok(())
    }

    #[test]
    fn test_degrees_minutes_seconds_form() {
        let result = validate_degrees_minutes_seconds(&DegreesMinutesSeconds {
            lat_degrees: "51",
            lat_minutes: "30",
            lat_seconds: "26.64",
            lat_direction: "N",
            lon_degrees: "0",
            lon_minutes: "7",
            lon_seconds: "40.08",
            lon_direction: "W",
        });

        assert!(result.valid);
        let position = result.position.unwrap();
        assert_abs_diff_eq!(position.latitude, 51.5074, epsilon = 1e-9);
        assert_abs_diff_eq!(position.longitude, -0.1278, epsilon = 1e-9);
    }

    #[test]
    fn test_point_helpers() -> Result<(), GridRefError> {
        let bng = wgs84_to_bng(&point! { x: -2.248, y: 53.481 })?;
        assert!(bng.x() > 380000.0 && bng.x() < 390000.0);

        let wgs = bng_to_wgs84(&bng)?;
        assert_abs_diff_eq!(wgs.x(), -2.248, epsilon = 1e-4);
        assert_abs_diff_eq!(wgs.y(), 53.481, epsilon = 1e-4);
        Ok(())
    }
}
