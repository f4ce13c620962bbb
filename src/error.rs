/// Error type for osgb-gridref operations.
#[derive(Debug, Clone, PartialEq)]
pub enum GridRefError {
    /// The text is not a grid reference with a known 100 km square.
    InvalidGridRef(String),
    /// The text is not a hemisphere-prefixed degrees/minutes position.
    InvalidLatLon(String),
    /// The position lies outside the Great Britain bounding box.
    OutsideGreatBritain,
    /// The easting/northing falls outside the 700 km x 1300 km grid.
    OutsideGrid { easting: f64, northing: f64 },
    /// An iterative solver hit its iteration cap before converging.
    NonConvergence {
        routine: &'static str,
        iterations: usize,
    },
    /// Grid reference precision outside 0-5.
    InvalidPrecision(u8),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    GeometryParseError(String),
    /// File I/O error.
    IoError(String),
    /// CSV parsing or writing error.
    CsvError(String),
    /// JSON (de)serialization error.
    JsonError(String),
}

impl std::fmt::Display for GridRefError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridRefError::InvalidGridRef(s) => write!(f, "Invalid grid reference: '{}'", s),
            GridRefError::InvalidLatLon(s) => write!(f, "Invalid latitude/longitude: '{}'", s),
            GridRefError::OutsideGreatBritain => write!(f, "Coordinate not within Great Britain"),
            GridRefError::OutsideGrid { easting, northing } => write!(
                f,
                "Coordinate ({}, {}) is outside the National Grid",
                easting, northing
            ),
            GridRefError::NonConvergence {
                routine,
                iterations,
            } => write!(
                f,
                "{} did not converge after {} iterations",
                routine, iterations
            ),
            GridRefError::InvalidPrecision(p) => {
                write!(f, "Invalid grid reference precision: {}", p)
            }
            GridRefError::GeometryParseError(msg) => write!(f, "Geometry parse error: {}", msg),
            GridRefError::IoError(msg) => write!(f, "IO error: {}", msg),
            GridRefError::CsvError(msg) => write!(f, "CSV error: {}", msg),
            GridRefError::JsonError(msg) => write!(f, "JSON error: {}", msg),
        }
    }
}

impl std::error::Error for GridRefError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_gb_message() {
        assert_eq!(
            GridRefError::OutsideGreatBritain.to_string(),
            "Coordinate not within Great Britain"
        );
    }

    #[test]
    fn test_non_convergence_message() {
        let err = GridRefError::NonConvergence {
            routine: "initial_lat",
            iterations: 20,
        };
        assert_eq!(err.to_string(), "initial_lat did not converge after 20 iterations");
    }
}
