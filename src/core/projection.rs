//! Transverse Mercator projection on an arbitrary ellipsoid.
//!
//! Latitudes and longitudes are in degrees at the public boundary and in
//! radians inside. Eastings and northings are in metres.

use crate::core::constants::{
    Ellipsoid, FOOT_POINT_TOLERANCE, MAX_FOOT_POINT_ITERATIONS, Projection,
};
use crate::error::GridRefError;

/// Scaled axes and derived constants shared by every series below.
struct Scaled {
    af0: f64,
    bf0: f64,
    e2: f64,
    n: f64,
}

impl Scaled {
    fn new(ellipsoid: &Ellipsoid, f0: f64) -> Self {
        let af0 = ellipsoid.a * f0;
        let bf0 = ellipsoid.b * f0;
        Self {
            af0,
            bf0,
            e2: (af0.powi(2) - bf0.powi(2)) / af0.powi(2),
            n: (af0 - bf0) / (af0 + bf0),
        }
    }

    /// Radii of curvature `(nu, rho, eta2)` at latitude `phi`.
    fn curvature(&self, phi: f64) -> (f64, f64, f64) {
        let sin2 = phi.sin().powi(2);
        let nu = self.af0 / (1.0 - self.e2 * sin2).sqrt();
        let rho = (nu * (1.0 - self.e2)) / (1.0 - self.e2 * sin2);
        let eta2 = nu / rho - 1.0;
        (nu, rho, eta2)
    }
}

/// Meridional arc length from `phi0` to `phi` (radians), scaled by `bf0`.
pub fn marc(bf0: f64, n: f64, phi0: f64, phi: f64) -> f64 {
    let n2 = n.powi(2);
    let n3 = n.powi(3);
    let dphi = phi - phi0;
    let sphi = phi + phi0;

    bf0 * ((1.0 + n + (5.0 / 4.0) * n2 + (5.0 / 4.0) * n3) * dphi
        - (3.0 * n + 3.0 * n2 + (21.0 / 8.0) * n3) * dphi.sin() * sphi.cos()
        + ((15.0 / 8.0) * n2 + (15.0 / 8.0) * n3) * (2.0 * dphi).sin() * (2.0 * sphi).cos()
        - (35.0 / 24.0) * n3 * (3.0 * dphi).sin() * (3.0 * sphi).cos())
}

/// Foot-point latitude (radians) for `north`.
///
/// Refines the latitude until the meridional arc matches the northing to
/// within [`FOOT_POINT_TOLERANCE`] metres, giving up after
/// [`MAX_FOOT_POINT_ITERATIONS`] refinements.
pub fn initial_lat(
    north: f64,
    n0: f64,
    af0: f64,
    phi0: f64,
    n: f64,
    bf0: f64,
) -> Result<f64, GridRefError> {
    let mut phi = (north - n0) / af0 + phi0;
    let mut m = marc(bf0, n, phi0, phi);

    for iteration in 0..MAX_FOOT_POINT_ITERATIONS {
        let residual = north - n0 - m;
        log::trace!("initial_lat iteration {}: residual {:e} m", iteration, residual);
        if residual.abs() <= FOOT_POINT_TOLERANCE {
            return Ok(phi);
        }
        phi += residual / af0;
        m = marc(bf0, n, phi0, phi);
    }

    if (north - n0 - m).abs() <= FOOT_POINT_TOLERANCE {
        return Ok(phi);
    }

    log::warn!("foot-point latitude for northing {} did not converge", north);
    Err(GridRefError::NonConvergence {
        routine: "initial_lat",
        iterations: MAX_FOOT_POINT_ITERATIONS,
    })
}

/// Inverse projection: easting/northing to latitude in degrees.
pub fn en_to_lat(
    east: f64,
    north: f64,
    ellipsoid: &Ellipsoid,
    proj: &Projection,
) -> Result<f64, GridRefError> {
    let k = Scaled::new(ellipsoid, proj.f0);
    let et = east - proj.e0;

    let phid = initial_lat(north, proj.n0, k.af0, proj.phi0.to_radians(), k.n, k.bf0)?;
    let (nu, rho, eta2) = k.curvature(phid);
    let t = phid.tan();

    let vii = t / (2.0 * rho * nu);
    let viii = (t / (24.0 * rho * nu.powi(3)))
        * (5.0 + 3.0 * t.powi(2) + eta2 - 9.0 * eta2 * t.powi(2));
    let ix = (t / (720.0 * rho * nu.powi(5))) * (61.0 + 90.0 * t.powi(2) + 45.0 * t.powi(4));

    Ok((phid - et.powi(2) * vii + et.powi(4) * viii - et.powi(6) * ix).to_degrees())
}

/// Inverse projection: easting/northing to longitude in degrees.
pub fn en_to_long(
    east: f64,
    north: f64,
    ellipsoid: &Ellipsoid,
    proj: &Projection,
) -> Result<f64, GridRefError> {
    let k = Scaled::new(ellipsoid, proj.f0);
    let et = east - proj.e0;

    let phid = initial_lat(north, proj.n0, k.af0, proj.phi0.to_radians(), k.n, k.bf0)?;
    let (nu, rho, _) = k.curvature(phid);
    let sec = phid.cos().recip();
    let t2 = phid.tan().powi(2);

    let x = sec / nu;
    let xi = (sec / (6.0 * nu.powi(3))) * (nu / rho + 2.0 * t2);
    let xii = (sec / (120.0 * nu.powi(5))) * (5.0 + 28.0 * t2 + 24.0 * t2.powi(2));
    let xiia = (sec / (5040.0 * nu.powi(7)))
        * (61.0 + 662.0 * t2 + 1320.0 * t2.powi(2) + 720.0 * t2.powi(3));

    Ok((proj.lam0.to_radians() + et * x - et.powi(3) * xi + et.powi(5) * xii
        - et.powi(7) * xiia)
        .to_degrees())
}

/// Forward projection: latitude/longitude in degrees to easting.
pub fn lat_long_to_east(phi: f64, lam: f64, ellipsoid: &Ellipsoid, proj: &Projection) -> f64 {
    let k = Scaled::new(ellipsoid, proj.f0);
    let phi = phi.to_radians();
    let p = lam.to_radians() - proj.lam0.to_radians();

    let (nu, rho, eta2) = k.curvature(phi);
    let c = phi.cos();
    let t2 = phi.tan().powi(2);

    let iv = nu * c;
    let v = (nu / 6.0) * c.powi(3) * (nu / rho - t2);
    let vi = (nu / 120.0)
        * c.powi(5)
        * (5.0 - 18.0 * t2 + t2.powi(2) + 14.0 * eta2 - 58.0 * t2 * eta2);

    proj.e0 + p * iv + p.powi(3) * v + p.powi(5) * vi
}

/// Forward projection: latitude/longitude in degrees to northing.
pub fn lat_long_to_north(phi: f64, lam: f64, ellipsoid: &Ellipsoid, proj: &Projection) -> f64 {
    let k = Scaled::new(ellipsoid, proj.f0);
    let phi = phi.to_radians();
    let p = lam.to_radians() - proj.lam0.to_radians();

    let (nu, _, eta2) = k.curvature(phi);
    let s = phi.sin();
    let c = phi.cos();
    let t2 = phi.tan().powi(2);
    let m = marc(k.bf0, k.n, proj.phi0.to_radians(), phi);

    let i = m + proj.n0;
    let ii = (nu / 2.0) * s * c;
    let iii = (nu / 24.0) * s * c.powi(3) * (5.0 - t2 + 9.0 * eta2);
    let iiia = (nu / 720.0) * s * c.powi(5) * (61.0 - 58.0 * t2 + t2.powi(2));

    i + p.powi(2) * ii + p.powi(4) * iii + p.powi(6) * iiia
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{AIRY_1830, NATIONAL_GRID};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_true_origin_projects_to_false_origin() {
        let e = lat_long_to_east(49.0, -2.0, &AIRY_1830, &NATIONAL_GRID);
        let n = lat_long_to_north(49.0, -2.0, &AIRY_1830, &NATIONAL_GRID);
        assert_abs_diff_eq!(e, 400000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(n, -100000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_marc_is_zero_at_origin() {
        let phi0 = 49.0_f64.to_radians();
        assert_eq!(marc(6_000_000.0, 0.0017, phi0, phi0), 0.0);
    }

    #[test]
    fn test_ordnance_survey_worked_example() -> Result<(), GridRefError> {
        // OS "A guide to coordinate systems in Great Britain", annex C.
        let lat = 52.0 + 39.0 / 60.0 + 27.2531 / 3600.0;
        let lon = 1.0 + 43.0 / 60.0 + 4.5177 / 3600.0;

        let e = lat_long_to_east(lat, lon, &AIRY_1830, &NATIONAL_GRID);
        let n = lat_long_to_north(lat, lon, &AIRY_1830, &NATIONAL_GRID);
        assert_abs_diff_eq!(e, 651409.903, epsilon = 0.01);
        assert_abs_diff_eq!(n, 313177.270, epsilon = 0.01);

        let back_lat = en_to_lat(e, n, &AIRY_1830, &NATIONAL_GRID)?;
        let back_lon = en_to_long(e, n, &AIRY_1830, &NATIONAL_GRID)?;
        assert_abs_diff_eq!(back_lat, lat, epsilon = 1e-7);
        assert_abs_diff_eq!(back_lon, lon, epsilon = 1e-7);
        Ok(())
    }

    #[test]
    fn test_initial_lat_converges_on_central_meridian() -> Result<(), GridRefError> {
        let k = Scaled::new(&AIRY_1830, NATIONAL_GRID.f0);
        let phi0 = NATIONAL_GRID.phi0.to_radians();
        let phi = initial_lat(500000.0, NATIONAL_GRID.n0, k.af0, phi0, k.n, k.bf0)?;
        let m = marc(k.bf0, k.n, phi0, phi);
        assert!((500000.0 - NATIONAL_GRID.n0 - m).abs() <= FOOT_POINT_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_initial_lat_fails_closed_on_nan() {
        let k = Scaled::new(&AIRY_1830, NATIONAL_GRID.f0);
        let phi0 = NATIONAL_GRID.phi0.to_radians();
        let result = initial_lat(f64::NAN, NATIONAL_GRID.n0, k.af0, phi0, k.n, k.bf0);
        assert!(matches!(
            result,
            Err(GridRefError::NonConvergence {
                routine: "initial_lat",
                ..
            })
        ));
    }
}
