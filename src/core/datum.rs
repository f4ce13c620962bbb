//! Geodetic <-> Cartesian conversion and the Helmert datum shift.

use crate::core::constants::{
    Ellipsoid, HelmertParams, MAX_XYZ_ITERATIONS, XYZ_LATITUDE_TOLERANCE,
};
use crate::error::GridRefError;

fn prime_vertical_radius(phi: f64, ellipsoid: &Ellipsoid) -> f64 {
    ellipsoid.a / (1.0 - ellipsoid.e2() * phi.sin().powi(2)).sqrt()
}

/// Cartesian X from latitude, longitude (degrees) and ellipsoidal height.
pub fn lat_long_h_to_x(phi: f64, lam: f64, h: f64, ellipsoid: &Ellipsoid) -> f64 {
    let phi = phi.to_radians();
    let lam = lam.to_radians();
    (prime_vertical_radius(phi, ellipsoid) + h) * phi.cos() * lam.cos()
}

/// Cartesian Y from latitude, longitude (degrees) and ellipsoidal height.
pub fn lat_long_h_to_y(phi: f64, lam: f64, h: f64, ellipsoid: &Ellipsoid) -> f64 {
    let phi = phi.to_radians();
    let lam = lam.to_radians();
    (prime_vertical_radius(phi, ellipsoid) + h) * phi.cos() * lam.sin()
}

/// Cartesian Z from latitude (degrees) and ellipsoidal height.
pub fn lat_h_to_z(phi: f64, h: f64, ellipsoid: &Ellipsoid) -> f64 {
    let phi = phi.to_radians();
    let v = prime_vertical_radius(phi, ellipsoid);
    (v * (1.0 - ellipsoid.e2()) + h) * phi.sin()
}

/// Geodetic latitude in degrees of a Cartesian point.
///
/// Fixed-point iteration from the spherical estimate; stops once successive
/// latitudes agree to [`XYZ_LATITUDE_TOLERANCE`] radians and fails after
/// [`MAX_XYZ_ITERATIONS`] steps.
pub fn xyz_to_lat(x: f64, y: f64, z: f64, ellipsoid: &Ellipsoid) -> Result<f64, GridRefError> {
    let root_xy = (x.powi(2) + y.powi(2)).sqrt();
    let e2 = ellipsoid.e2();

    let mut phi1 = z.atan2(root_xy * (1.0 - e2));
    let step = |phi: f64| {
        (z + e2 * prime_vertical_radius(phi, ellipsoid) * phi.sin()).atan2(root_xy)
    };
    let mut phi2 = step(phi1);

    for _ in 0..MAX_XYZ_ITERATIONS {
        if (phi1 - phi2).abs() <= XYZ_LATITUDE_TOLERANCE {
            return Ok(phi2.to_degrees());
        }
        phi1 = phi2;
        phi2 = step(phi1);
    }

    log::warn!("xyz_to_lat did not converge for ({}, {}, {})", x, y, z);
    Err(GridRefError::NonConvergence {
        routine: "xyz_to_lat",
        iterations: MAX_XYZ_ITERATIONS,
    })
}

/// Geodetic longitude in degrees of a Cartesian point.
pub fn xyz_to_long(x: f64, y: f64) -> f64 {
    y.atan2(x).to_degrees()
}

fn arcsec_to_rad(arcsec: f64) -> f64 {
    (arcsec / 3600.0).to_radians()
}

// Small-angle linearisation; only valid for rotations of a few arc-seconds.

pub fn helmert_x(x: f64, y: f64, z: f64, p: &HelmertParams) -> f64 {
    let sfactor = p.s * 0.000001;
    x + x * sfactor - y * arcsec_to_rad(p.rz) + z * arcsec_to_rad(p.ry) + p.tx
}

pub fn helmert_y(x: f64, y: f64, z: f64, p: &HelmertParams) -> f64 {
    let sfactor = p.s * 0.000001;
    x * arcsec_to_rad(p.rz) + y + y * sfactor - z * arcsec_to_rad(p.rx) + p.ty
}

pub fn helmert_z(x: f64, y: f64, z: f64, p: &HelmertParams) -> f64 {
    let sfactor = p.s * 0.000001;
    -x * arcsec_to_rad(p.ry) + y * arcsec_to_rad(p.rx) + z + z * sfactor + p.tz
}

/// Moves a geodetic position (degrees, height 0) from one datum to another.
///
/// Returns `(latitude, longitude)` in degrees on `to`.
pub fn shift_datum(
    latitude: f64,
    longitude: f64,
    from: &Ellipsoid,
    params: &HelmertParams,
    to: &Ellipsoid,
) -> Result<(f64, f64), GridRefError> {
    let height = 0.0;
    let x1 = lat_long_h_to_x(latitude, longitude, height, from);
    let y1 = lat_long_h_to_y(latitude, longitude, height, from);
    let z1 = lat_h_to_z(latitude, height, from);

    let x2 = helmert_x(x1, y1, z1, params);
    let y2 = helmert_y(x1, y1, z1, params);
    let z2 = helmert_z(x1, y1, z1, params);

    Ok((xyz_to_lat(x2, y2, z2, to)?, xyz_to_long(x2, y2)))
}
