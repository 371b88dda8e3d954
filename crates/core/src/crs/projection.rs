//! Pure-Rust point reprojection
//!
//! Covers the CRS family the flood pipeline actually meets: geographic
//! WGS84 (EPSG:4326), Web Mercator (EPSG:3857) and UTM zones
//! (EPSG:326xx/327xx). UTM uses the classic transverse-Mercator series
//! (Snyder 1987), accurate to centimetres inside a zone, which is far below
//! the cell size of any elevation grid this system works with.

use crate::crs::Crs;
use crate::error::{Error, Result};

/// WGS84 semi-major axis (m)
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// UTM scale factor at the central meridian
const UTM_K0: f64 = 0.9996;
/// UTM false easting (m)
const UTM_FALSE_EASTING: f64 = 500_000.0;
/// UTM false northing for the southern hemisphere (m)
const UTM_FALSE_NORTHING: f64 = 10_000_000.0;

/// Web Mercator sphere radius (m)
const MERCATOR_R: f64 = WGS84_A;
/// Latitude bound of the Web Mercator square
const MERCATOR_MAX_LAT: f64 = 85.051_128_779;

/// Highest latitude at which UTM coordinates are defined here
const UTM_MAX_LAT: f64 = 84.5;

/// A projection the workspace can evaluate without external libraries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    /// Geographic longitude/latitude in degrees (EPSG:4326)
    Geographic,
    /// Spherical Web Mercator (EPSG:3857)
    WebMercator,
    /// UTM zone on the WGS84 ellipsoid
    Utm { zone: u8, north: bool },
}

impl ProjectionKind {
    /// Resolve a CRS into an evaluatable projection.
    ///
    /// Anything outside the supported family is a `MissingCrs` error; the
    /// caller decides whether a fallback is acceptable.
    pub fn for_crs(crs: &Crs) -> Result<Self> {
        match crs.epsg() {
            Some(4326) => Ok(Self::Geographic),
            Some(3857) | Some(900_913) => Ok(Self::WebMercator),
            Some(code @ 32601..=32660) => Ok(Self::Utm {
                zone: (code - 32600) as u8,
                north: true,
            }),
            Some(code @ 32701..=32760) => Ok(Self::Utm {
                zone: (code - 32700) as u8,
                north: false,
            }),
            _ => Err(Error::MissingCrs(crs.identifier())),
        }
    }

    /// Project geographic (lon, lat) degrees into this projection's plane
    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)> {
        check_finite(lon)?;
        check_finite(lat)?;

        match self {
            Self::Geographic => Ok((lon, lat)),
            Self::WebMercator => {
                let lat = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT);
                let x = MERCATOR_R * lon.to_radians();
                let y = MERCATOR_R * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0)
                    .tan()
                    .ln();
                Ok((x, y))
            }
            Self::Utm { zone, north } => utm_forward(lon, lat, *zone, *north),
        }
    }

    /// Unproject plane coordinates back to geographic (lon, lat) degrees
    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        check_finite(x)?;
        check_finite(y)?;

        match self {
            Self::Geographic => Ok((x, y)),
            Self::WebMercator => {
                let lon = (x / MERCATOR_R).to_degrees();
                let lat = (2.0 * (y / MERCATOR_R).exp().atan() - std::f64::consts::FRAC_PI_2)
                    .to_degrees();
                Ok((lon, lat))
            }
            Self::Utm { zone, north } => utm_inverse(x, y, *zone, *north),
        }
    }

    /// Central meridian in degrees, if the projection has one
    pub fn central_meridian(&self) -> Option<f64> {
        match self {
            Self::Utm { zone, .. } => Some(f64::from(*zone) * 6.0 - 183.0),
            _ => None,
        }
    }
}

/// Reproject a single coordinate pair between two resolvable projections
pub fn reproject_xy(from: &ProjectionKind, to: &ProjectionKind, x: f64, y: f64) -> Result<(f64, f64)> {
    if from == to {
        check_finite(x)?;
        check_finite(y)?;
        return Ok((x, y));
    }
    let (lon, lat) = from.inverse(x, y)?;
    to.forward(lon, lat)
}

fn check_finite(value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFiniteInput {
            name: "coordinate",
            value,
        })
    }
}

/// Meridian arc length from the equator to latitude `lat_rad`
fn meridian_arc(lat_rad: f64) -> f64 {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    WGS84_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat_rad
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat_rad).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat_rad).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * lat_rad).sin())
}

fn utm_forward(lon: f64, lat: f64, zone: u8, north: bool) -> Result<(f64, f64)> {
    if lat.abs() > UTM_MAX_LAT {
        return Err(Error::InvalidGeometry(format!(
            "latitude {lat} outside UTM validity range"
        )));
    }

    let e2 = WGS84_F * (2.0 - WGS84_F);
    let ep2 = e2 / (1.0 - e2);
    let lon0 = (f64::from(zone) * 6.0 - 183.0).to_radians();

    let phi = lat.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = sin_phi / cos_phi;

    let n = WGS84_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let a = cos_phi * (lon.to_radians() - lon0);

    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a2 * a2;
    let a5 = a4 * a;
    let a6 = a4 * a2;

    let x = UTM_K0
        * n
        * (a
            + (1.0 - t + c) * a3 / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0)
        + UTM_FALSE_EASTING;

    let mut y = UTM_K0
        * (meridian_arc(phi)
            + n * tan_phi
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

    if !north {
        y += UTM_FALSE_NORTHING;
    }

    Ok((x, y))
}

fn utm_inverse(x: f64, y: f64, zone: u8, north: bool) -> Result<(f64, f64)> {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let ep2 = e2 / (1.0 - e2);
    let lon0 = (f64::from(zone) * 6.0 - 183.0).to_radians();

    let x = x - UTM_FALSE_EASTING;
    let y = if north { y } else { y - UTM_FALSE_NORTHING };

    // Footpoint latitude from the rectified arc
    let m = y / UTM_K0;
    let mu = m / (WGS84_A * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

    let sqrt_1me2 = (1.0 - e2).sqrt();
    let e1 = (1.0 - sqrt_1me2) / (1.0 + sqrt_1me2);
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_2 * e1_2;

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let tan_phi1 = sin_phi1 / cos_phi1;

    let c1 = ep2 * cos_phi1 * cos_phi1;
    let t1 = tan_phi1 * tan_phi1;
    let denom = 1.0 - e2 * sin_phi1 * sin_phi1;
    let n1 = WGS84_A / denom.sqrt();
    let r1 = WGS84_A * (1.0 - e2) / (denom * denom.sqrt());
    let d = x / (n1 * UTM_K0);

    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d2 * d2;
    let d5 = d4 * d;
    let d6 = d4 * d2;

    let phi = phi1
        - (n1 * tan_phi1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d6
                    / 720.0);

    let lambda = lon0
        + (d
            - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d5
                / 120.0)
            / cos_phi1;

    Ok((lambda.to_degrees(), phi.to_degrees()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resolve_supported_crs() {
        assert_eq!(
            ProjectionKind::for_crs(&Crs::wgs84()).unwrap(),
            ProjectionKind::Geographic
        );
        assert_eq!(
            ProjectionKind::for_crs(&Crs::web_mercator()).unwrap(),
            ProjectionKind::WebMercator
        );
        assert_eq!(
            ProjectionKind::for_crs(&Crs::utm(17, true)).unwrap(),
            ProjectionKind::Utm {
                zone: 17,
                north: true
            }
        );
        assert_eq!(
            ProjectionKind::for_crs(&Crs::utm(56, false)).unwrap(),
            ProjectionKind::Utm {
                zone: 56,
                north: false
            }
        );
    }

    #[test]
    fn test_unsupported_crs_is_missing() {
        let state_plane = Crs::from_epsg(2263);
        assert!(matches!(
            ProjectionKind::for_crs(&state_plane),
            Err(Error::MissingCrs(_))
        ));
    }

    #[test]
    fn test_web_mercator_roundtrip() {
        let wm = ProjectionKind::WebMercator;
        let (x, y) = wm.forward(-80.19, 25.76).unwrap();
        let (lon, lat) = wm.inverse(x, y).unwrap();

        assert_relative_eq!(lon, -80.19, epsilon = 1e-9);
        assert_relative_eq!(lat, 25.76, epsilon = 1e-9);
    }

    #[test]
    fn test_web_mercator_origin_and_clamp() {
        let wm = ProjectionKind::WebMercator;
        let (x, y) = wm.forward(0.0, 0.0).unwrap();
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6);

        let (_, y_pole) = wm.forward(0.0, 90.0).unwrap();
        let (_, y_max) = wm.forward(0.0, MERCATOR_MAX_LAT).unwrap();
        assert_relative_eq!(y_pole, y_max, epsilon = 1e-6);
    }

    #[test]
    fn test_utm_central_meridian_maps_to_false_easting() {
        // On the central meridian of zone 31 (3E) at the equator the UTM
        // coordinate is exactly the false easting, northing zero.
        let utm = ProjectionKind::Utm {
            zone: 31,
            north: true,
        };
        let (x, y) = utm.forward(3.0, 0.0).unwrap();
        assert_relative_eq!(x, 500_000.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_utm_known_point() {
        // 116E, 40N in zone 50 (central meridian 117E): about 85 km west of
        // the central meridian, about 4428 km of scaled meridian arc north.
        let utm = ProjectionKind::Utm {
            zone: 50,
            north: true,
        };
        let (x, y) = utm.forward(116.0, 40.0).unwrap();
        assert!(x > 405_000.0 && x < 425_000.0, "easting {x}");
        assert!(y > 4_420_000.0 && y < 4_435_000.0, "northing {y}");
    }

    #[test]
    fn test_utm_roundtrip() {
        let utm = ProjectionKind::Utm {
            zone: 17,
            north: true,
        };
        let (x, y) = utm.forward(-80.19, 25.76).unwrap();
        let (lon, lat) = utm.inverse(x, y).unwrap();

        assert_relative_eq!(lon, -80.19, epsilon = 1e-7);
        assert_relative_eq!(lat, 25.76, epsilon = 1e-7);
    }

    #[test]
    fn test_utm_southern_hemisphere() {
        let utm = ProjectionKind::Utm {
            zone: 56,
            north: false,
        };
        let (_, y) = utm.forward(151.2, -33.9).unwrap();
        // South of the equator northings stay positive via the false northing
        assert!(y > 0.0 && y < UTM_FALSE_NORTHING);

        let (lon, lat) = utm.inverse(utm.forward(151.2, -33.9).unwrap().0, y).unwrap();
        assert_relative_eq!(lon, 151.2, epsilon = 1e-7);
        assert_relative_eq!(lat, -33.9, epsilon = 1e-7);
    }

    #[test]
    fn test_reproject_identity() {
        let (x, y) = reproject_xy(
            &ProjectionKind::Geographic,
            &ProjectionKind::Geographic,
            -80.19,
            25.76,
        )
        .unwrap();
        assert_eq!((x, y), (-80.19, 25.76));
    }

    #[test]
    fn test_reproject_mercator_to_utm() {
        let wm = ProjectionKind::WebMercator;
        let utm = ProjectionKind::Utm {
            zone: 17,
            north: true,
        };

        let (mx, my) = wm.forward(-80.19, 25.76).unwrap();
        let (ux, uy) = reproject_xy(&wm, &utm, mx, my).unwrap();
        let (dx, dy) = utm.forward(-80.19, 25.76).unwrap();

        assert_relative_eq!(ux, dx, epsilon = 1e-4);
        assert_relative_eq!(uy, dy, epsilon = 1e-4);
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let result = ProjectionKind::Geographic.forward(f64::NAN, 0.0);
        assert!(matches!(result, Err(Error::NonFiniteInput { .. })));
    }

    #[test]
    fn test_utm_polar_latitude_rejected() {
        let utm = ProjectionKind::Utm {
            zone: 31,
            north: true,
        };
        assert!(matches!(
            utm.forward(3.0, 89.0),
            Err(Error::InvalidGeometry(_))
        ));
    }
}
