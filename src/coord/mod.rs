mod osgb;
mod wgs84;

pub use osgb::OsgbCoordinate;
pub use wgs84::Wgs84Coordinate;

use crate::error::GridRefError;
use geo_types::Point;

/// Trait for types that can provide x/y coordinates.
///
/// Implemented for `(f64, f64)` tuples, `geo_types::Point<f64>` and the two
/// coordinate models. `x` is longitude or easting, `y` is latitude or northing.
pub trait Coordinate {
    /// Returns the x-coordinate (easting or longitude).
    fn x(&self) -> f64;
    /// Returns the y-coordinate (northing or latitude).
    fn y(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 {
        Point::x(*self)
    }
    fn y(&self) -> f64 {
        Point::y(*self)
    }
}

impl Coordinate for OsgbCoordinate {
    fn x(&self) -> f64 {
        self.easting
    }
    fn y(&self) -> f64 {
        self.northing
    }
}

impl Coordinate for Wgs84Coordinate {
    fn x(&self) -> f64 {
        self.longitude
    }
    fn y(&self) -> f64 {
        self.latitude
    }
}

impl From<OsgbCoordinate> for Point<f64> {
    fn from(c: OsgbCoordinate) -> Self {
        Point::new(c.easting, c.northing)
    }
}

impl From<Wgs84Coordinate> for Point<f64> {
    fn from(c: Wgs84Coordinate) -> Self {
        Point::new(c.longitude, c.latitude)
    }
}

/// Converts a WGS84 `(lon, lat)` to a BNG `(easting, northing)` point.
pub fn wgs84_to_bng<C: Coordinate>(coord: &C) -> Result<Point<f64>, GridRefError> {
    let osgb = Wgs84Coordinate::new(coord.y(), coord.x()).to_osgb()?;
    Ok(osgb.into())
}

/// Converts a BNG `(easting, northing)` to a WGS84 `(lon, lat)` point.
pub fn bng_to_wgs84<C: Coordinate>(coord: &C) -> Result<Point<f64>, GridRefError> {
    let wgs84 = OsgbCoordinate::new(coord.x(), coord.y()).to_wgs84()?;
    Ok(wgs84.into())
}
