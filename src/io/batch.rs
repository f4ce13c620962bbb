use crate::coord::{OsgbCoordinate, Wgs84Coordinate};
use crate::error::GridRefError;
use crate::validate::{Validation, validate_os_grid_reference_number};
use rayon::prelude::*;

/// Parallel conversion of grid coordinates to WGS84.
///
/// Implemented for `[OsgbCoordinate]` and `Vec<OsgbCoordinate>`. Output order
/// matches input order.
pub trait GridToWgs84 {
    fn to_wgs84_all(&self) -> Vec<Result<Wgs84Coordinate, GridRefError>>;
}

impl GridToWgs84 for [OsgbCoordinate] {
    fn to_wgs84_all(&self) -> Vec<Result<Wgs84Coordinate, GridRefError>> {
        self.par_iter().map(OsgbCoordinate::to_wgs84).collect()
    }
}

/// Parallel conversion of WGS84 positions to the National Grid.
pub trait Wgs84ToGrid {
    fn to_osgb_all(&self) -> Vec<Result<OsgbCoordinate, GridRefError>>;
}

impl Wgs84ToGrid for [Wgs84Coordinate] {
    fn to_osgb_all(&self) -> Vec<Result<OsgbCoordinate, GridRefError>> {
        self.par_iter().map(Wgs84Coordinate::to_osgb).collect()
    }
}

/// Validates many single-field grid references in parallel.
pub fn validate_grid_refs<S: AsRef<str> + Sync>(refs: &[S]) -> Vec<Validation> {
    refs.par_iter()
        .map(|r| validate_os_grid_reference_number(r.as_ref()))
        .collect()
}
