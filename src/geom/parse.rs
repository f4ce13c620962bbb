use crate::error::GridRefError;
use geo_types::{Geometry, Point};
use geojson::GeoJson;
use std::str::FromStr;
use wkt::{ToWkt, Wkt};

/// Parses a point from a geometry string, auto-detecting WKT or GeoJSON.
///
/// GeoJSON is detected by a leading `{`, everything else is tried as WKT.
/// Only `Point` geometries (or GeoJSON features holding one) are accepted.
pub fn parse_point(s: &str) -> Result<Point<f64>, GridRefError> {
    let trimmed = s.trim();
    let geom = if trimmed.starts_with('{') {
        parse_geojson(trimmed)?
    } else {
        parse_wkt(trimmed)?
    };

    match geom {
        Geometry::Point(pt) => Ok(pt),
        _ => Err(GridRefError::GeometryParseError(
            "Only point geometries carry a single location".to_string(),
        )),
    }
}

fn parse_geojson(s: &str) -> Result<Geometry<f64>, GridRefError> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| GridRefError::GeometryParseError(e.to_string()))?;

    match geojson {
        GeoJson::Geometry(geom) => {
            Geometry::try_from(geom).map_err(|e| GridRefError::GeometryParseError(e.to_string()))
        }
        GeoJson::Feature(feat) => feat
            .geometry
            .ok_or_else(|| GridRefError::GeometryParseError("Feature has no geometry".to_string()))
            .and_then(|g| {
                Geometry::try_from(g).map_err(|e| GridRefError::GeometryParseError(e.to_string()))
            }),
        GeoJson::FeatureCollection(_) => Err(GridRefError::GeometryParseError(
            "FeatureCollection not supported, use individual geometries".to_string(),
        )),
    }
}

fn parse_wkt(s: &str) -> Result<Geometry<f64>, GridRefError> {
    let wkt: Wkt<f64> =
        Wkt::from_str(s).map_err(|e| GridRefError::GeometryParseError(e.to_string()))?;

    wkt.try_into().map_err(|_| {
        GridRefError::GeometryParseError("Failed to convert WKT to geometry".to_string())
    })
}

pub fn point_to_wkt(point: &Point<f64>) -> String {
    point.wkt_string()
}

pub fn point_to_geojson(point: &Point<f64>) -> String {
    geojson::Geometry::from(point).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geojson_point() -> Result<(), GridRefError> {
        let pt = parse_point(r#"{"type":"Point","coordinates":[-0.1,51.5]}"#)?;
        assert!((pt.x() - (-0.1)).abs() < 0.001);
        assert!((pt.y() - 51.5).abs() < 0.001);
        Ok(())
    }

    #[test]
    fn test_parse_geojson_feature() -> Result<(), GridRefError> {
        let json = r#"{"type":"Feature","properties":{},
            "geometry":{"type":"Point","coordinates":[530030,180380]}}"#;
        let pt = parse_point(json)?;
        assert_eq!(pt.x(), 530030.0);
        Ok(())
    }

    #[test]
    fn test_parse_wkt_point() -> Result<(), GridRefError> {
        let pt = parse_point("POINT(-0.1 51.5)")?;
        assert!((pt.x() - (-0.1)).abs() < 0.001);
        assert!((pt.y() - 51.5).abs() < 0.001);
        Ok(())
    }

    #[test]
    fn test_parse_rejects_linestring() {
        let result = parse_point("LINESTRING(-0.1 51.5, -0.2 51.6)");
        assert!(matches!(result, Err(GridRefError::GeometryParseError(_))));
    }

    #[test]
    fn test_point_output_parses_back() -> Result<(), GridRefError> {
        let pt = Point::new(-0.12778, 51.5074);
        assert_eq!(parse_point(&point_to_wkt(&pt))?, pt);
        assert_eq!(parse_point(&point_to_geojson(&pt))?, pt);
        Ok(())
    }
}
