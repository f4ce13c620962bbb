mod parse;

pub use parse::{parse_point, point_to_geojson, point_to_wkt};
