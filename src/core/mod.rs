pub mod constants;
pub mod datum;
pub mod grid;
pub mod projection;

pub use constants::{
    AIRY_1830, BoundingBox, Ellipsoid, GREAT_BRITAIN, HelmertParams, IRELAND, NATIONAL_GRID,
    OSGB36_TO_WGS84, Projection, WGS84, WGS84_TO_OSGB36,
};
pub use datum::shift_datum;
pub use grid::{GRID_PREFIXES, point_to_bands, prefix_at, prefix_bands, prefix_origin};
pub use projection::{en_to_lat, en_to_long, lat_long_to_east, lat_long_to_north, marc};
