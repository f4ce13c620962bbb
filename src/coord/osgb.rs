use crate::coord::wgs84::Wgs84Coordinate;
use crate::core::constants::{
    AIRY_1830, GRID_SQUARE_SIZE, MAX_PRECISION, NATIONAL_GRID, OSGB36_TO_WGS84, WGS84,
};
use crate::core::datum::shift_datum;
use crate::core::grid::{point_to_bands, prefix_at, prefix_origin};
use crate::core::projection::{en_to_lat, en_to_long};
use crate::error::GridRefError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

/// One pattern per digit count, tried from 5 (1 m) down to 1 (10 km).
static GRID_REF_PATTERNS: LazyLock<Vec<(u8, Regex)>> = LazyLock::new(|| {
    (1..=MAX_PRECISION)
        .rev()
        .map(|p| {
            let pattern = format!(r"^([A-Za-z]{{2}})\s*([0-9]{{{p}}})\s*([0-9]{{{p}}})$");
            let re = Regex::new(&pattern).expect("grid reference pattern is valid");
            (p, re)
        })
        .collect()
});

/// A position on the British National Grid, in metres from the false origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OsgbCoordinate {
    pub easting: f64,
    pub northing: f64,
}

impl OsgbCoordinate {
    pub fn new(easting: f64, northing: f64) -> Self {
        Self { easting, northing }
    }

    /// Whether the point lies inside one of the 91 lettered 100 km squares.
    pub fn is_on_grid(&self) -> bool {
        point_to_bands(self.easting, self.northing).is_some()
    }

    /// Formats the point as a grid reference with `precision` digits per axis.
    ///
    /// Precision is clamped to 0-5. Digits are truncated, so the reference
    /// names the square containing the point. Precision 0 yields only the
    /// two-letter square.
    ///
    /// # Example
    /// ```
    /// use osgb_gridref::OsgbCoordinate;
    ///
    /// # fn main() -> Result<(), osgb_gridref::GridRefError> {
    /// let point = OsgbCoordinate::new(530034.0, 180381.0);
    /// assert_eq!(point.grid_ref(4)?, "TQ 3003 8038");
    /// assert_eq!(point.grid_ref(0)?, "TQ");
    /// # Ok(())
    /// # }
    /// ```
    pub fn grid_ref(&self, precision: u8) -> Result<String, GridRefError> {
        let precision = precision.min(MAX_PRECISION);
        let (col, row) =
            point_to_bands(self.easting, self.northing).ok_or(GridRefError::OutsideGrid {
                easting: self.easting,
                northing: self.northing,
            })?;
        let prefix = prefix_at(col, row).ok_or(GridRefError::OutsideGrid {
            easting: self.easting,
            northing: self.northing,
        })?;

        if precision == 0 {
            return Ok(prefix.to_string());
        }

        let div = 10_u32.pow(u32::from(MAX_PRECISION - precision)) as f64;
        let e = ((self.easting % GRID_SQUARE_SIZE) / div).floor() as u32;
        let n = ((self.northing % GRID_SQUARE_SIZE) / div).floor() as u32;
        let width = usize::from(precision);

        Ok(format!("{prefix} {e:0width$} {n:0width$}"))
    }

    /// Parses a grid reference such as `"TQ 3003 8038"` or `"TQ30038038"`.
    ///
    /// Accepts two letters followed by two equal-length groups of 1-5 digits,
    /// optionally separated by whitespace. Shorter groups are scaled up to
    /// metres, so `"TQ 30 80"` is the south-west corner of its 1 km square.
    pub fn parse_grid_ref(text: &str) -> Result<Self, GridRefError> {
        for (precision, pattern) in GRID_REF_PATTERNS.iter() {
            let Some(caps) = pattern.captures(text) else {
                continue;
            };

            let mult = 10_u32.pow(u32::from(MAX_PRECISION - precision)) as f64;
            let digits = |i: usize| -> Result<f64, GridRefError> {
                caps[i]
                    .parse::<u32>()
                    .map(|v| v as f64 * mult)
                    .map_err(|_| GridRefError::InvalidGridRef(text.to_string()))
            };
            let grid_east = digits(2)?;
            let grid_north = digits(3)?;

            let Some((origin_e, origin_n)) = prefix_origin(&caps[1]) else {
                log::debug!("unknown grid square '{}' in '{}'", &caps[1], text);
                return Err(GridRefError::InvalidGridRef(text.to_string()));
            };

            let coord = Self::new(origin_e + grid_east, origin_n + grid_north);
            log::debug!(
                "parsed '{}' at precision {} as ({}, {})",
                text,
                precision,
                coord.easting,
                coord.northing
            );
            return Ok(coord);
        }

        Err(GridRefError::InvalidGridRef(text.to_string()))
    }

    /// Converts to a WGS84 latitude/longitude.
    ///
    /// Inverse projection on Airy 1830, then the OSGB36 -> WGS84 Helmert
    /// shift. Accurate to a few metres; it is not an OSTN15 transformation.
    pub fn to_wgs84(&self) -> Result<Wgs84Coordinate, GridRefError> {
        let lat = en_to_lat(self.easting, self.northing, &AIRY_1830, &NATIONAL_GRID)?;
        let lon = en_to_long(self.easting, self.northing, &AIRY_1830, &NATIONAL_GRID)?;
        let (latitude, longitude) = shift_datum(lat, lon, &AIRY_1830, &OSGB36_TO_WGS84, &WGS84)?;
        Ok(Wgs84Coordinate::new(latitude, longitude))
    }
}

impl FromStr for OsgbCoordinate {
    type Err = GridRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_grid_ref(s)
    }
}
