//! Field-level location validation.
//!
//! Every rule is a pure function over the raw form strings. Rules stop at the
//! first failing check and report exactly one message; a fresh [`Validation`]
//! is returned per call so rules can run concurrently.

use crate::coord::{OsgbCoordinate, Wgs84Coordinate};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const BOTH_LAT_LON_REQUIRED: &str = "Both latitude and longitude are required";
pub const LAT_LON_NOT_NUMBERS: &str = "Latitude and longitude must be valid numbers";
pub const LATITUDE_RANGE: &str = "Latitude must be between -90 and 90 degrees";
pub const LONGITUDE_RANGE: &str = "Longitude must be between -180 and 180 degrees";
pub const OUTSIDE_GREAT_BRITAIN: &str = "Coordinates must be within Great Britain";

pub const ALL_FIELDS_REQUIRED: &str = "All coordinate fields are required";
pub const ALL_VALUES_NOT_NUMBERS: &str = "All coordinate values must be valid numbers";
pub const LATITUDE_DEGREES_RANGE: &str = "Latitude degrees must be between 0 and 90";
pub const LONGITUDE_DEGREES_RANGE: &str = "Longitude degrees must be between 0 and 180";
pub const LATITUDE_DECIMAL_MINUTES_RANGE: &str = "Latitude minutes must be between 0 and 59.999";
pub const LONGITUDE_DECIMAL_MINUTES_RANGE: &str =
    "Longitude minutes must be between 0 and 59.999";
pub const LATITUDE_MINUTES_RANGE: &str = "Latitude minutes must be between 0 and 59";
pub const LONGITUDE_MINUTES_RANGE: &str = "Longitude minutes must be between 0 and 59";
pub const LATITUDE_SECONDS_RANGE: &str = "Latitude seconds must be between 0 and 59.999";
pub const LONGITUDE_SECONDS_RANGE: &str = "Longitude seconds must be between 0 and 59.999";

pub const GRID_FIELDS_REQUIRED: &str = "All grid reference fields are required";
pub const EASTING_NORTHING_NOT_NUMBERS: &str = "Easting and northing must be valid numbers";
pub const EASTING_RANGE: &str = "Easting must be between 0 and 99999";
pub const NORTHING_RANGE: &str = "Northing must be between 0 and 99999";
pub const GRID_SQUARE_FORMAT: &str = "Grid square must be two letters (e.g., TQ, SW)";
pub const GRID_REF_FORMAT: &str = "Invalid grid reference format";
pub const GRID_REF_OUTSIDE_GREAT_BRITAIN: &str = "Grid reference must be within Great Britain";

pub const GRID_REF_REQUIRED: &str = "Enter an OS grid reference";
pub const GRID_REF_INVALID: &str = "Enter a valid OS grid reference (for example, TQ 3003 8038)";
pub const EASTING_NORTHING_REQUIRED: &str = "Enter easting and northing";
pub const FIELD_NUMBER_REQUIRED: &str = "Enter the National Grid field number";

static GRID_SQUARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}$").expect("grid square pattern is valid"));

/// Outcome of one validation call.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Validation {
    pub valid: bool,
    /// Messages in the order the rules failed; the first is shown to users.
    pub errors: Vec<String>,
    /// The validated position, when the rule resolves one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Wgs84Coordinate>,
}

impl Validation {
    fn passed(position: Option<Wgs84Coordinate>) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            position,
        }
    }

    fn failed(message: &str) -> Self {
        Self {
            valid: false,
            errors: vec![message.to_string()],
            position: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

impl From<Result<Option<Wgs84Coordinate>, &'static str>> for Validation {
    fn from(result: Result<Option<Wgs84Coordinate>, &'static str>) -> Self {
        match result {
            Ok(position) => Validation::passed(position),
            Err(message) => {
                log::debug!("validation failed: {}", message);
                Validation::failed(message)
            }
        }
    }
}

type Check<T> = Result<T, &'static str>;

fn present(field: &str) -> bool {
    !field.trim().is_empty()
}

fn parse_float(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_int(field: &str) -> Option<i64> {
    field.trim().parse::<i64>().ok()
}

fn ensure(condition: bool, message: &'static str) -> Check<()> {
    if condition { Ok(()) } else { Err(message) }
}

/// `-1.0` when `direction` is the negative hemisphere letter, else `1.0`.
fn hemisphere_sign(direction: &str, negative: &str) -> f64 {
    if direction.trim().eq_ignore_ascii_case(negative) {
        -1.0
    } else {
        1.0
    }
}

fn check_decimal_degrees(lat: f64, lon: f64) -> Check<Option<Wgs84Coordinate>> {
    ensure((-90.0..=90.0).contains(&lat), LATITUDE_RANGE)?;
    ensure((-180.0..=180.0).contains(&lon), LONGITUDE_RANGE)?;

    let position = Wgs84Coordinate::new(lat, lon);
    ensure(position.is_great_britain(), OUTSIDE_GREAT_BRITAIN)?;
    Ok(Some(position))
}

/// Validates a decimal-degrees pair such as `("51.5074", "-0.1278")`.
pub fn validate_decimal_degrees(lat: &str, lon: &str) -> Validation {
    let check = || -> Check<Option<Wgs84Coordinate>> {
        ensure(present(lat) && present(lon), BOTH_LAT_LON_REQUIRED)?;
        let (Some(lat), Some(lon)) = (parse_float(lat), parse_float(lon)) else {
            return Err(LAT_LON_NOT_NUMBERS);
        };
        check_decimal_degrees(lat, lon)
    };
    check().into()
}

/// Degrees and decimal minutes, with `N`/`S` and `E`/`W` direction fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreesDecimalMinutes<'a> {
    pub lat_degrees: &'a str,
    pub lat_minutes: &'a str,
    pub lat_direction: &'a str,
    pub lon_degrees: &'a str,
    pub lon_minutes: &'a str,
    pub lon_direction: &'a str,
}

pub fn validate_degrees_decimal_minutes(input: &DegreesDecimalMinutes<'_>) -> Validation {
    let check = || -> Check<Option<Wgs84Coordinate>> {
        let fields = [
            input.lat_degrees,
            input.lat_minutes,
            input.lat_direction,
            input.lon_degrees,
            input.lon_minutes,
            input.lon_direction,
        ];
        ensure(fields.iter().all(|f| present(f)), ALL_FIELDS_REQUIRED)?;

        let (Some(lat_deg), Some(lat_min), Some(lon_deg), Some(lon_min)) = (
            parse_int(input.lat_degrees),
            parse_float(input.lat_minutes),
            parse_int(input.lon_degrees),
            parse_float(input.lon_minutes),
        ) else {
            return Err(ALL_VALUES_NOT_NUMBERS);
        };

        ensure((0..=90).contains(&lat_deg), LATITUDE_DEGREES_RANGE)?;
        ensure((0.0..60.0).contains(&lat_min), LATITUDE_DECIMAL_MINUTES_RANGE)?;
        ensure((0..=180).contains(&lon_deg), LONGITUDE_DEGREES_RANGE)?;
        ensure((0.0..60.0).contains(&lon_min), LONGITUDE_DECIMAL_MINUTES_RANGE)?;

        let lat = hemisphere_sign(input.lat_direction, "S") * (lat_deg as f64 + lat_min / 60.0);
        let lon = hemisphere_sign(input.lon_direction, "W") * (lon_deg as f64 + lon_min / 60.0);
        check_decimal_degrees(lat, lon)
    };
    check().into()
}

/// Whole degrees, whole minutes and decimal seconds, with direction fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreesMinutesSeconds<'a> {
    pub lat_degrees: &'a str,
    pub lat_minutes: &'a str,
    pub lat_seconds: &'a str,
    pub lat_direction: &'a str,
    pub lon_degrees: &'a str,
    pub lon_minutes: &'a str,
    pub lon_seconds: &'a str,
    pub lon_direction: &'a str,
}

pub fn validate_degrees_minutes_seconds(input: &DegreesMinutesSeconds<'_>) -> Validation {
    let check = || -> Check<Option<Wgs84Coordinate>> {
        let fields = [
            input.lat_degrees,
            input.lat_minutes,
            input.lat_seconds,
            input.lat_direction,
            input.lon_degrees,
            input.lon_minutes,
            input.lon_seconds,
            input.lon_direction,
        ];
        ensure(fields.iter().all(|f| present(f)), ALL_FIELDS_REQUIRED)?;

        let (
            Some(lat_deg),
            Some(lat_min),
            Some(lat_sec),
            Some(lon_deg),
            Some(lon_min),
            Some(lon_sec),
        ) = (
            parse_int(input.lat_degrees),
            parse_int(input.lat_minutes),
            parse_float(input.lat_seconds),
            parse_int(input.lon_degrees),
            parse_int(input.lon_minutes),
            parse_float(input.lon_seconds),
        ) else {
            return Err(ALL_VALUES_NOT_NUMBERS);
        };

        ensure((0..=90).contains(&lat_deg), LATITUDE_DEGREES_RANGE)?;
        ensure((0..60).contains(&lat_min), LATITUDE_MINUTES_RANGE)?;
        ensure((0.0..60.0).contains(&lat_sec), LATITUDE_SECONDS_RANGE)?;
        ensure((0..=180).contains(&lon_deg), LONGITUDE_DEGREES_RANGE)?;
        ensure((0..60).contains(&lon_min), LONGITUDE_MINUTES_RANGE)?;
        ensure((0.0..60.0).contains(&lon_sec), LONGITUDE_SECONDS_RANGE)?;

        let lat = hemisphere_sign(input.lat_direction, "S")
            * (lat_deg as f64 + lat_min as f64 / 60.0 + lat_sec / 3600.0);
        let lon = hemisphere_sign(input.lon_direction, "W")
            * (lon_deg as f64 + lon_min as f64 / 60.0 + lon_sec / 3600.0);
        check_decimal_degrees(lat, lon)
    };
    check().into()
}

fn grid_position(osgb: &OsgbCoordinate) -> Check<Wgs84Coordinate> {
    let position = osgb
        .to_wgs84()
        .map_err(|_| GRID_REF_OUTSIDE_GREAT_BRITAIN)?;
    ensure(position.is_great_britain(), GRID_REF_OUTSIDE_GREAT_BRITAIN)?;
    Ok(position)
}

fn check_easting_northing(easting: &str, northing: &str) -> Check<()> {
    let (Some(e), Some(n)) = (parse_int(easting), parse_int(northing)) else {
        return Err(EASTING_NORTHING_NOT_NUMBERS);
    };
    ensure((0..=99999).contains(&e), EASTING_RANGE)?;
    ensure((0..=99999).contains(&n), NORTHING_RANGE)
}

/// Validates a grid reference entered as square letters plus easting and
/// northing digits, e.g. `("TQ", "30038", "80380")`.
///
/// Both digit fields must have the same length: they are read as one grid
/// reference at that precision.
pub fn validate_os_grid_ref(square: &str, easting: &str, northing: &str) -> Validation {
    let check = || -> Check<Option<Wgs84Coordinate>> {
        ensure(
            present(square) && present(easting) && present(northing),
            GRID_FIELDS_REQUIRED,
        )?;
        check_easting_northing(easting, northing)?;
        ensure(GRID_SQUARE.is_match(square.trim()), GRID_SQUARE_FORMAT)?;

        let text = format!(
            "{} {} {}",
            square.trim().to_ascii_uppercase(),
            easting.trim(),
            northing.trim()
        );
        let osgb = OsgbCoordinate::parse_grid_ref(&text).map_err(|_| GRID_REF_FORMAT)?;
        grid_position(&osgb).map(Some)
    };
    check().into()
}

/// Validates a single-field grid reference such as `"TQ 3003 8038"` or
/// `"TQ30038038"`. Runs of whitespace are collapsed before parsing.
pub fn validate_os_grid_reference_number(text: &str) -> Validation {
    let check = || -> Check<Option<Wgs84Coordinate>> {
        ensure(present(text), GRID_REF_REQUIRED)?;

        let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let osgb = OsgbCoordinate::parse_grid_ref(&cleaned).map_err(|_| GRID_REF_INVALID)?;
        grid_position(&osgb).map(Some)
    };
    check().into()
}

/// Range-only check of in-square easting and northing digits.
///
/// No grid square is supplied, so there is no position and no Great Britain
/// check; the form supplies the square from context.
pub fn validate_easting_northing(easting: &str, northing: &str) -> Validation {
    let check = || -> Check<Option<Wgs84Coordinate>> {
        ensure(present(easting) && present(northing), EASTING_NORTHING_REQUIRED)?;
        check_easting_northing(easting, northing)?;
        Ok(None)
    };
    check().into()
}

/// The field number is free text; only presence is checked.
pub fn validate_national_grid_field_number(value: &str) -> Validation {
    ensure(present(value), FIELD_NUMBER_REQUIRED)
        .map(|()| None::<Wgs84Coordinate>)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn dms<'a>(lat: [&'a str; 4], lon: [&'a str; 4]) -> DegreesMinutesSeconds<'a> {
        DegreesMinutesSeconds {
            lat_degrees: lat[0],
            lat_minutes: lat[1],
            lat_seconds: lat[2],
            lat_direction: lat[3],
            lon_degrees: lon[0],
            lon_minutes: lon[1],
            lon_seconds: lon[2],
            lon_direction: lon[3],
        }
    }

    fn ddm<'a>(lat: [&'a str; 3], lon: [&'a str; 3]) -> DegreesDecimalMinutes<'a> {
        DegreesDecimalMinutes {
            lat_degrees: lat[0],
            lat_minutes: lat[1],
            lat_direction: lat[2],
            lon_degrees: lon[0],
            lon_minutes: lon[1],
            lon_direction: lon[2],
        }
    }

    #[test]
    fn test_decimal_degrees_london() {
        let result = validate_decimal_degrees("51.5074", "-0.1278");
        assert!(result.is_valid());
        assert!(result.errors.is_empty());
        assert_eq!(result.position, Some(Wgs84Coordinate::new(51.5074, -0.1278)));
    }

    #[test]
    fn test_decimal_degrees_new_york() {
        let result = validate_decimal_degrees("40.7128", "-74.0060");
        assert!(!result.is_valid());
        assert_eq!(result.errors, vec![OUTSIDE_GREAT_BRITAIN.to_string()]);
    }

    #[test]
    fn test_decimal_degrees_rule_order() {
        assert_eq!(
            validate_decimal_degrees("", "-0.1").first_error(),
            Some(BOTH_LAT_LON_REQUIRED)
        );
        assert_eq!(
            validate_decimal_degrees("abc", "-0.1").first_error(),
            Some(LAT_LON_NOT_NUMBERS)
        );
        assert_eq!(
            validate_decimal_degrees("91", "500").first_error(),
            Some(LATITUDE_RANGE)
        );
        assert_eq!(
            validate_decimal_degrees("51", "-180.5").first_error(),
            Some(LONGITUDE_RANGE)
        );
    }

    #[test]
    fn test_range_bounds_are_inclusive_but_gb_box_is_not() {
        // Poles and antimeridian pass the range check and fail only on GB.
        for (lat, lon) in [("90", "0"), ("-90", "0"), ("55", "180"), ("55", "-180")] {
            assert_eq!(
                validate_decimal_degrees(lat, lon).errors,
                vec![OUTSIDE_GREAT_BRITAIN.to_string()]
            );
        }
        assert_eq!(
            validate_decimal_degrees("49.0000", "-2.0").first_error(),
            Some(OUTSIDE_GREAT_BRITAIN)
        );
    }

    #[test]
    fn test_non_finite_is_not_a_number() {
        assert_eq!(
            validate_decimal_degrees("NaN", "inf").first_error(),
            Some(LAT_LON_NOT_NUMBERS)
        );
    }

    #[test]
    fn test_degrees_decimal_minutes() {
        let input = ddm(["51", "30.444", "N"], ["0", "7.668", "W"]);
        let result = validate_degrees_decimal_minutes(&input);
        assert!(result.is_valid());
        let position = result.position.unwrap();
        assert_abs_diff_eq!(position.latitude, 51.5074, epsilon = 1e-9);
        assert_abs_diff_eq!(position.longitude, -0.1278, epsilon = 1e-9);
    }

    #[test]
    fn test_degrees_decimal_minutes_failures() {
        let cases = [
            (ddm(["51", "", "N"], ["0", "7.6", "W"]), ALL_FIELDS_REQUIRED),
            (ddm(["51.5", "30", "N"], ["0", "7.6", "W"]), ALL_VALUES_NOT_NUMBERS),
            (ddm(["91", "30", "N"], ["0", "7.6", "W"]), LATITUDE_DEGREES_RANGE),
            (ddm(["51", "60", "N"], ["0", "7.6", "W"]), LATITUDE_DECIMAL_MINUTES_RANGE),
            (ddm(["51", "30", "N"], ["181", "7.6", "W"]), LONGITUDE_DEGREES_RANGE),
            (ddm(["51", "30", "N"], ["0", "-1", "W"]), LONGITUDE_DECIMAL_MINUTES_RANGE),
            (ddm(["51", "30", "S"], ["0", "7.6", "W"]), OUTSIDE_GREAT_BRITAIN),
        ];
        for (input, expected) in cases {
            assert_eq!(validate_degrees_decimal_minutes(&input).first_error(), Some(expected));
        }
    }

    #[test]
    fn test_degrees_minutes_seconds() {
        let input = dms(["56", "47", "48.8", "N"], ["5", "0", "13.2", "w"]);
        let result = validate_degrees_minutes_seconds(&input);
        assert!(result.is_valid());
        let position = result.position.unwrap();
        assert!(position.longitude < 0.0);
    }

    #[test]
    fn test_degrees_minutes_seconds_latitude_minutes() {
        let result =
            validate_degrees_minutes_seconds(&dms(["51", "61", "0", "N"], ["0", "7", "40", "W"]));
        assert!(!result.is_valid());
        assert_eq!(result.errors, vec![LATITUDE_MINUTES_RANGE.to_string()]);
    }

    #[test]
    fn test_degrees_minutes_seconds_failures() {
        let cases = [
            (dms(["51", "30", "", "N"], ["0", "7", "40", "W"]), ALL_FIELDS_REQUIRED),
            (dms(["51", "30.5", "1", "N"], ["0", "7", "40", "W"]), ALL_VALUES_NOT_NUMBERS),
            (dms(["51", "30", "60", "N"], ["0", "7", "40", "W"]), LATITUDE_SECONDS_RANGE),
            (dms(["51", "30", "1", "N"], ["0", "60", "40", "W"]), LONGITUDE_MINUTES_RANGE),
            (dms(["51", "30", "1", "N"], ["0", "7", "60.0", "W"]), LONGITUDE_SECONDS_RANGE),
            (dms(["51", "30", "1", "N"], ["74", "0", "0", "W"]), OUTSIDE_GREAT_BRITAIN),
        ];
        for (input, expected) in cases {
            assert_eq!(validate_degrees_minutes_seconds(&input).first_error(), Some(expected));
        }
    }

    #[test]
    fn test_os_grid_ref() {
        let result = validate_os_grid_ref("tq", "30038", "80380");
        assert!(result.is_valid());
        assert!(result.position.is_some());
    }

    #[test]
    fn test_os_grid_ref_failures() {
        let cases = [
            (("", "30038", "80380"), GRID_FIELDS_REQUIRED),
            (("TQ", "3x", "80380"), EASTING_NORTHING_NOT_NUMBERS),
            (("TQ", "100000", "80380"), EASTING_RANGE),
            (("TQ", "30038", "-1"), NORTHING_RANGE),
            (("T1", "30038", "80380"), GRID_SQUARE_FORMAT),
            (("ZZ", "30038", "80380"), GRID_REF_FORMAT),
            (("TQ", "300", "80380"), GRID_REF_FORMAT),
            (("JM", "99999", "99999"), GRID_REF_OUTSIDE_GREAT_BRITAIN),
        ];
        for ((square, e, n), expected) in cases {
            assert_eq!(validate_os_grid_ref(square, e, n).first_error(), Some(expected));
        }
    }

    #[test]
    fn test_grid_square_must_be_ascii_letters() {
        let result = validate_os_grid_ref("\u{17f}q", "30038", "80380");
        assert!(!result.is_valid());
        assert_eq!(result.first_error(), Some(GRID_SQUARE_FORMAT));
        assert_eq!(result.position, None);

        assert_eq!(
            validate_os_grid_ref("T\u{212a}", "30038", "80380").first_error(),
            Some(GRID_SQUARE_FORMAT)
        );
        assert_eq!(
            validate_os_grid_reference_number("\u{17f}Q 3003 8038").first_error(),
            Some(GRID_REF_INVALID)
        );
    }

    #[test]
    fn test_os_grid_reference_number() {
        for text in ["TQ 3003 8038", "TQ30038038", "  tq  3003\t8038 ", "NN 166 712"] {
            assert!(validate_os_grid_reference_number(text).is_valid(), "{text}");
        }
    }

    #[test]
    fn test_os_grid_reference_number_failures() {
        assert_eq!(
            validate_os_grid_reference_number("   ").first_error(),
            Some(GRID_REF_REQUIRED)
        );
        assert_eq!(
            validate_os_grid_reference_number("ZZ 99999 99999").errors,
            vec![GRID_REF_INVALID.to_string()]
        );
        assert_eq!(
            validate_os_grid_reference_number("JW 50000 50000").first_error(),
            Some(GRID_REF_OUTSIDE_GREAT_BRITAIN)
        );
    }

    #[test]
    fn test_easting_northing_is_range_only() {
        let result = validate_easting_northing("30038", "80380");
        assert!(result.is_valid());
        assert_eq!(result.position, None);

        assert_eq!(
            validate_easting_northing("", "1").first_error(),
            Some(EASTING_NORTHING_REQUIRED)
        );
        assert_eq!(
            validate_easting_northing("1e3", "1").first_error(),
            Some(EASTING_NORTHING_NOT_NUMBERS)
        );
        assert_eq!(
            validate_easting_northing("1", "100000").first_error(),
            Some(NORTHING_RANGE)
        );
    }

    #[test]
    fn test_national_grid_field_number() {
        assert!(validate_national_grid_field_number("SU1234 5678").is_valid());
        assert_eq!(
            validate_national_grid_field_number(" ").first_error(),
            Some(FIELD_NUMBER_REQUIRED)
        );
    }

    #[test]
    fn test_each_call_has_its_own_errors() {
        let bad = validate_decimal_degrees("", "");
        let good = validate_decimal_degrees("51.5", "-0.1");
        assert_eq!(bad.errors.len(), 1);
        assert!(good.errors.is_empty());
    }
}
