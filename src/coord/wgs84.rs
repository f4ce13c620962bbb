use crate::coord::osgb::OsgbCoordinate;
use crate::core::constants::{
    AIRY_1830, GREAT_BRITAIN, IRELAND, NATIONAL_GRID, WGS84, WGS84_TO_OSGB36,
};
use crate::core::datum::shift_datum;
use crate::core::projection::{lat_long_to_east, lat_long_to_north};
use crate::error::GridRefError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static DEGREES_MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([NSns])\s*([0-9]+)[°\s]+([0-9]+\.[0-9]+)\s+([WEwe])\s*([0-9]+)[°\s]+([0-9]+\.[0-9]+)",
    )
    .expect("degrees/minutes pattern is valid")
});

/// A WGS84 latitude/longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wgs84Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Wgs84Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parses free text such as `"N 51° 30.444 W 0° 7.668"`.
    ///
    /// The pattern may appear anywhere in the text. `S` and `W` negate.
    pub fn parse_string(text: &str) -> Result<Self, GridRefError> {
        let invalid = || GridRefError::InvalidLatLon(text.to_string());
        let caps = DEGREES_MINUTES.captures(text).ok_or_else(invalid)?;

        let number = |i: usize| caps[i].parse::<f64>().map_err(|_| invalid());
        let sign = |i: usize, negative: &str| {
            if caps[i].eq_ignore_ascii_case(negative) {
                -1.0
            } else {
                1.0
            }
        };

        Ok(Self::new(
            sign(1, "s") * (number(2)? + number(3)? / 60.0),
            sign(4, "w") * (number(5)? + number(6)? / 60.0),
        ))
    }

    /// Coarse bounding-box test, not a coastline test. Boundaries are excluded.
    pub fn is_great_britain(&self) -> bool {
        GREAT_BRITAIN.contains(self.latitude, self.longitude)
    }

    pub fn is_ireland(&self) -> bool {
        IRELAND.contains(self.latitude, self.longitude)
    }

    /// Converts to a National Grid easting/northing, rounded to the metre.
    ///
    /// Fails with [`GridRefError::OutsideGreatBritain`] for points outside
    /// the Great Britain bounding box.
    pub fn to_osgb(&self) -> Result<OsgbCoordinate, GridRefError> {
        if !self.is_great_britain() {
            return Err(GridRefError::OutsideGreatBritain);
        }

        let (lat, lon) = shift_datum(
            self.latitude,
            self.longitude,
            &WGS84,
            &WGS84_TO_OSGB36,
            &AIRY_1830,
        )?;
        let easting = lat_long_to_east(lat, lon, &AIRY_1830, &NATIONAL_GRID);
        let northing = lat_long_to_north(lat, lon, &AIRY_1830, &NATIONAL_GRID);

        Ok(OsgbCoordinate::new(easting.round(), northing.round()))
    }
}

impl FromStr for Wgs84Coordinate {
    type Err = GridRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_string(s)
    }
}

/// Formats as hemisphere, whole degrees and minutes to three decimals, the
/// form accepted by [`Wgs84Coordinate::parse_string`].
impl fmt::Display for Wgs84Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn split(value: f64) -> (u64, f64) {
            let thousandths = (value.abs() * 60_000.0).round() as u64;
            (thousandths / 60_000, (thousandths % 60_000) as f64 / 1000.0)
        }

        let (lat_deg, lat_min) = split(self.latitude);
        let (lon_deg, lon_min) = split(self.longitude);
        let ns = if self.latitude < 0.0 { 'S' } else { 'N' };
        let we = if self.longitude < 0.0 { 'W' } else { 'E' };

        write!(f, "{ns} {lat_deg}° {lat_min:.3} {we} {lon_deg}° {lon_min:.3}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_string() -> Result<(), GridRefError> {
        let coord = Wgs84Coordinate::parse_string("N 51° 30.444 W 0° 7.668")?;
        assert_abs_diff_eq!(coord.latitude, 51.5074, epsilon = 1e-9);
        assert_abs_diff_eq!(coord.longitude, -0.1278, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_parse_string_without_degree_sign() -> Result<(), GridRefError> {
        let coord: Wgs84Coordinate = "s 33 52.0 e 151 12.5".parse()?;
        assert!(coord.latitude < -33.8);
        assert!(coord.longitude > 151.2);
        Ok(())
    }

    #[test]
    fn test_parse_string_rejects_decimal_degrees() {
        assert!(matches!(
            Wgs84Coordinate::parse_string("51.5074, -0.1278"),
            Err(GridRefError::InvalidLatLon(_))
        ));
    }

    #[test]
    fn test_parse_string_requires_ascii_hemisphere() {
        assert!(matches!(
            Wgs84Coordinate::parse_string("\u{17f} 33 52.0 E 151 12.5"),
            Err(GridRefError::InvalidLatLon(_))
        ));
    }

    #[test]
    fn test_display_parses_back() -> Result<(), GridRefError> {
        let coord = Wgs84Coordinate::new(56.79687, -5.00368);
        let text = coord.to_string();
        assert_eq!(text, "N 56° 47.812 W 5° 0.221");

        let back = Wgs84Coordinate::parse_string(&text)?;
        assert_abs_diff_eq!(back.latitude, coord.latitude, epsilon = 1e-4);
        assert_abs_diff_eq!(back.longitude, coord.longitude, epsilon = 1e-4);
        Ok(())
    }

    #[test]
    fn test_great_britain_box() {
        assert!(Wgs84Coordinate::new(51.5074, -0.1278).is_great_britain());
        assert!(!Wgs84Coordinate::new(40.7128, -74.0060).is_great_britain());
        assert!(!Wgs84Coordinate::new(49.0, -2.0).is_great_britain());
        assert!(!Wgs84Coordinate::new(62.0, -2.0).is_great_britain());
    }

    #[test]
    fn test_ireland_box() {
        assert!(Wgs84Coordinate::new(53.3498, -6.2603).is_ireland());
        assert!(!Wgs84Coordinate::new(51.5074, -0.1278).is_ireland());
    }

    #[test]
    fn test_to_osgb_london() -> Result<(), GridRefError> {
        let osgb = Wgs84Coordinate::new(51.5074, -0.1278).to_osgb()?;
        assert_eq!(osgb.easting, 530029.0);
        assert_eq!(osgb.northing, 180380.0);
        assert_eq!(osgb.grid_ref(4)?, "TQ 3002 8038");
        Ok(())
    }

    #[test]
    fn test_to_osgb_outside_gb() {
        let result = Wgs84Coordinate::new(40.7128, -74.0060).to_osgb();
        assert_eq!(result, Err(GridRefError::OutsideGreatBritain));
    }

    #[test]
    fn test_round_trip_across_the_grid() -> Result<(), GridRefError> {
        let mut checked = 0;
        for col in 0..140 {
            for row in 0..260 {
                let e = 2500.0 + 5000.0 * f64::from(col);
                let n = 2500.0 + 5000.0 * f64::from(row);
                let wgs84 = OsgbCoordinate::new(e, n).to_wgs84()?;
                if !wgs84.is_great_britain() {
                    continue;
                }

                let back = wgs84.to_osgb()?;
                assert!((back.easting - e).abs() <= 1.0, "easting {e} -> {}", back.easting);
                assert!((back.northing - n).abs() <= 1.0, "northing {n} -> {}", back.northing);
                checked += 1;
            }
        }
        assert!(checked > 30000, "only {checked} points inside Great Britain");
        Ok(())
    }
}
