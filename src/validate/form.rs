//! Whole-form validation for a location question.
//!
//! A location form offers several alternative ways of giving a position. Any
//! subset may be filled in; each provided method is validated on its own and
//! every failing method contributes its first message.

use crate::validate::rules::{
    DegreesDecimalMinutes, DegreesMinutesSeconds, Validation, validate_decimal_degrees,
    validate_degrees_decimal_minutes, validate_degrees_minutes_seconds,
    validate_easting_northing, validate_national_grid_field_number, validate_os_grid_ref,
    validate_os_grid_reference_number,
};
use serde::{Deserialize, Serialize};

pub const NO_LOCATION_METHOD: &str = "Please provide at least one location method";
pub const MAP_AREA_REQUIRED: &str = "Please draw an area on the map";
pub const TEXT_LOCATION_TOO_SHORT: &str =
    "Please provide a detailed location description (at least 10 characters)";

/// Minimum trimmed length of a free-text location description.
pub const MIN_TEXT_LOCATION_CHARS: usize = 10;

fn filled(field: &str) -> bool {
    !field.trim().is_empty()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecimalDegreesFields {
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecimalMinutesFields {
    pub lat_degrees: String,
    pub lat_minutes: String,
    pub lat_direction: String,
    pub lon_degrees: String,
    pub lon_minutes: String,
    pub lon_direction: String,
}

impl DecimalMinutesFields {
    pub fn as_input(&self) -> DegreesDecimalMinutes<'_> {
        DegreesDecimalMinutes {
            lat_degrees: &self.lat_degrees,
            lat_minutes: &self.lat_minutes,
            lat_direction: &self.lat_direction,
            lon_degrees: &self.lon_degrees,
            lon_minutes: &self.lon_minutes,
            lon_direction: &self.lon_direction,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsFields {
    pub lat_degrees: String,
    pub lat_minutes: String,
    pub lat_seconds: String,
    pub lat_direction: String,
    pub lon_degrees: String,
    pub lon_minutes: String,
    pub lon_seconds: String,
    pub lon_direction: String,
}

impl DmsFields {
    pub fn as_input(&self) -> DegreesMinutesSeconds<'_> {
        DegreesMinutesSeconds {
            lat_degrees: &self.lat_degrees,
            lat_minutes: &self.lat_minutes,
            lat_seconds: &self.lat_seconds,
            lat_direction: &self.lat_direction,
            lon_degrees: &self.lon_degrees,
            lon_minutes: &self.lon_minutes,
            lon_seconds: &self.lon_seconds,
            lon_direction: &self.lon_direction,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsGridFields {
    pub square: String,
    pub easting: String,
    pub northing: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EastingNorthingFields {
    pub easting: String,
    pub northing: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapFields {
    pub latitude: String,
    pub longitude: String,
    pub radius: String,
}

/// Raw values of every location input on the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationForm {
    pub decimal_degrees: DecimalDegreesFields,
    pub decimal_minutes: DecimalMinutesFields,
    pub degrees_minutes_seconds: DmsFields,
    pub os_grid: OsGridFields,
    pub grid_reference_number: String,
    pub easting_northing: EastingNorthingFields,
    pub field_number: String,
    pub map: MapFields,
    pub text_location: String,
}

/// The alternative ways a location can be entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMethod {
    DecimalDegrees,
    DecimalMinutes,
    DegreesMinutesSeconds,
    OsGrid,
    GridReferenceNumber,
    EastingNorthing,
    FieldNumber,
    Map,
    TextLocation,
}

impl LocationForm {
    /// Methods the user has started filling in, in form order.
    pub fn provided_methods(&self) -> Vec<LocationMethod> {
        let dd = &self.decimal_degrees;
        let ddm = &self.decimal_minutes;
        let dms = &self.degrees_minutes_seconds;
        let grid = &self.os_grid;
        let en = &self.easting_northing;
        let map = &self.map;

        [
            (
                LocationMethod::DecimalDegrees,
                filled(&dd.latitude) && filled(&dd.longitude),
            ),
            (
                LocationMethod::DecimalMinutes,
                filled(&ddm.lat_degrees) && filled(&ddm.lon_degrees),
            ),
            (
                LocationMethod::DegreesMinutesSeconds,
                filled(&dms.lat_degrees) && filled(&dms.lon_degrees),
            ),
            (
                LocationMethod::OsGrid,
                filled(&grid.square) && filled(&grid.easting) && filled(&grid.northing),
            ),
            (
                LocationMethod::GridReferenceNumber,
                filled(&self.grid_reference_number),
            ),
            (
                LocationMethod::EastingNorthing,
                filled(&en.easting) && filled(&en.northing),
            ),
            (LocationMethod::FieldNumber, filled(&self.field_number)),
            (
                LocationMethod::Map,
                filled(&map.latitude) && filled(&map.longitude) && filled(&map.radius),
            ),
            (LocationMethod::TextLocation, filled(&self.text_location)),
        ]
        .into_iter()
        .filter_map(|(method, provided)| provided.then_some(method))
        .collect()
    }

    /// Runs the validation rule for one method.
    pub fn validate_method(&self, method: LocationMethod) -> Validation {
        match method {
            LocationMethod::DecimalDegrees => validate_decimal_degrees(
                &self.decimal_degrees.latitude,
                &self.decimal_degrees.longitude,
            ),
            LocationMethod::DecimalMinutes => {
                validate_degrees_decimal_minutes(&self.decimal_minutes.as_input())
            }
            LocationMethod::DegreesMinutesSeconds => {
                validate_degrees_minutes_seconds(&self.degrees_minutes_seconds.as_input())
            }
            LocationMethod::OsGrid => validate_os_grid_ref(
                &self.os_grid.square,
                &self.os_grid.easting,
                &self.os_grid.northing,
            ),
            LocationMethod::GridReferenceNumber => {
                validate_os_grid_reference_number(&self.grid_reference_number)
            }
            LocationMethod::EastingNorthing => validate_easting_northing(
                &self.easting_northing.easting,
                &self.easting_northing.northing,
            ),
            LocationMethod::FieldNumber => validate_national_grid_field_number(&self.field_number),
            LocationMethod::Map => validate_map(&self.map),
            LocationMethod::TextLocation => validate_text_location(&self.text_location),
        }
    }
}

fn validate_map(map: &MapFields) -> Validation {
    let drawn = filled(&map.latitude) && filled(&map.longitude) && filled(&map.radius);
    Validation {
        valid: drawn,
        errors: if drawn {
            Vec::new()
        } else {
            vec![MAP_AREA_REQUIRED.to_string()]
        },
        position: None,
    }
}

fn validate_text_location(text: &str) -> Validation {
    let detailed = text.trim().chars().count() >= MIN_TEXT_LOCATION_CHARS;
    Validation {
        valid: detailed,
        errors: if detailed {
            Vec::new()
        } else {
            vec![TEXT_LOCATION_TOO_SHORT.to_string()]
        },
        position: None,
    }
}

/// A message attached to the method that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// `None` for form-level messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<LocationMethod>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FormValidation {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl FormValidation {
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}

/// Validates every provided location method on the form.
pub fn validate_form(form: &LocationForm) -> FormValidation {
    let methods = form.provided_methods();
    if methods.is_empty() {
        return FormValidation {
            valid: false,
            errors: vec![FieldError {
                method: None,
                message: NO_LOCATION_METHOD.to_string(),
            }],
        };
    }

    let errors: Vec<FieldError> = methods
        .into_iter()
        .filter_map(|method| {
            let result = form.validate_method(method);
            let message = result.first_error()?.to_string();
            Some(FieldError {
                method: Some(method),
                message,
            })
        })
        .collect();

    log::debug!("location form validated with {} error(s)", errors.len());
    FormValidation {
        valid: errors.is_empty(),
        errors,
    }
}
