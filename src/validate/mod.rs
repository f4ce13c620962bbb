pub mod form;
pub mod rules;

pub use form::{FieldError, FormValidation, LocationForm, LocationMethod, validate_form};
pub use rules::{
    DegreesDecimalMinutes, DegreesMinutesSeconds, Validation, validate_decimal_degrees,
    validate_degrees_decimal_minutes, validate_degrees_minutes_seconds,
    validate_easting_northing, validate_national_grid_field_number, validate_os_grid_ref,
    validate_os_grid_reference_number,
};
