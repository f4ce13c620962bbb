/// Semi-major and semi-minor axes of a reference ellipsoid, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub a: f64,
    pub b: f64,
}

impl Ellipsoid {
    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        (self.a.powi(2) - self.b.powi(2)) / self.a.powi(2)
    }
}

/// Airy 1830, the ellipsoid of the OSGB36 datum.
pub const AIRY_1830: Ellipsoid = Ellipsoid {
    a: 6377563.396,
    b: 6356256.91,
};

/// WGS84 (GRS80 approximation).
pub const WGS84: Ellipsoid = Ellipsoid {
    a: 6378137.0,
    b: 6356752.313,
};

/// Seven-parameter Helmert similarity transform.
///
/// Translations in metres, rotations in arc-seconds, scale in parts per million.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelmertParams {
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    pub s: f64,
}

impl HelmertParams {
    /// The reverse shift: every parameter negated.
    pub const fn inverse(&self) -> Self {
        Self {
            tx: -self.tx,
            ty: -self.ty,
            tz: -self.tz,
            rx: -self.rx,
            ry: -self.ry,
            rz: -self.rz,
            s: -self.s,
        }
    }
}

/// OSGB36 -> WGS84.
pub const OSGB36_TO_WGS84: HelmertParams = HelmertParams {
    tx: 446.448,
    ty: -125.157,
    tz: 542.06,
    rx: 0.1502,
    ry: 0.247,
    rz: 0.8421,
    s: -20.4894,
};

/// WGS84 -> OSGB36.
pub const WGS84_TO_OSGB36: HelmertParams = OSGB36_TO_WGS84.inverse();

/// Transverse Mercator projection parameters. Angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub e0: f64,
    pub n0: f64,
    pub f0: f64,
    pub phi0: f64,
    pub lam0: f64,
}

/// The British National Grid projection on Airy 1830.
pub const NATIONAL_GRID: Projection = Projection {
    e0: 400000.0,
    n0: -100000.0,
    f0: 0.9996012717,
    phi0: 49.0,
    lam0: -2.0,
};

/// Side of one grid square in metres.
pub const GRID_SQUARE_SIZE: f64 = 100000.0;

/// Grid references carry at most five digits per axis (1 m).
pub const MAX_PRECISION: u8 = 5;

/// Northing residual (metres) at which the foot-point latitude is accepted.
pub const FOOT_POINT_TOLERANCE: f64 = 0.00001;

/// Latitude change (radians) at which the Cartesian latitude solve stops.
pub const XYZ_LATITUDE_TOLERANCE: f64 = 0.000000001;

/// Iteration cap for the foot-point latitude.
pub const MAX_FOOT_POINT_ITERATIONS: usize = 20;

/// Iteration cap for Cartesian to geodetic latitude.
pub const MAX_XYZ_ITERATIONS: usize = 50;

/// Open latitude/longitude bounds `(min_lat, max_lat, min_lon, max_lon)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Strict containment; points on the boundary are outside.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude > self.min_lat
            && latitude < self.max_lat
            && longitude > self.min_lon
            && longitude < self.max_lon
    }
}

pub const GREAT_BRITAIN: BoundingBox = BoundingBox {
    min_lat: 49.0,
    max_lat: 62.0,
    min_lon: -9.5,
    max_lon: 2.3,
};

pub const IRELAND: BoundingBox = BoundingBox {
    min_lat: 51.2,
    max_lat: 55.73,
    min_lon: -12.2,
    max_lon: -4.8,
};
