//! Coordinate Reference System handling

pub mod projection;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use projection::{reproject_xy, ProjectionKind};

/// Coordinate Reference System identifier.
///
/// A CRS is mandatory on every grid and feature collection in this
/// workspace; cross-collection operations reproject explicitly instead of
/// assuming matching coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crs {
    /// EPSG code if known
    epsg: Option<u32>,
    /// WKT representation
    wkt: Option<String>,
    /// PROJ string
    proj: Option<String>,
}

impl Crs {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            epsg: Some(code),
            wkt: None,
            proj: None,
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        let wkt = wkt.into();
        Self {
            epsg: parse_epsg(&wkt),
            wkt: Some(wkt),
            proj: None,
        }
    }

    /// Create a CRS from a PROJ string
    pub fn from_proj(proj: impl Into<String>) -> Self {
        let proj = proj.into();
        Self {
            epsg: parse_epsg(&proj),
            wkt: None,
            proj: Some(proj),
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Web Mercator (EPSG:3857)
    pub fn web_mercator() -> Self {
        Self::from_epsg(3857)
    }

    /// UTM zone CRS (EPSG:326xx north / 327xx south)
    pub fn utm(zone: u8, north: bool) -> Self {
        let code = if north {
            32600 + u32::from(zone)
        } else {
            32700 + u32::from(zone)
        };
        Self::from_epsg(code)
    }

    /// UTM zone containing the given geographic coordinate.
    ///
    /// This is the "locally appropriate" projected CRS used to measure
    /// distances near a point of interest.
    pub fn auto_utm(lon: f64, lat: f64) -> Self {
        let zone = (((lon + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u8;
        Self::utm(zone, lat >= 0.0)
    }

    /// EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// WKT representation if available
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// PROJ string if available
    pub fn proj(&self) -> Option<&str> {
        self.proj.as_deref()
    }

    /// Whether two CRS identify the same reference system
    pub fn is_equivalent(&self, other: &Crs) -> bool {
        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.wkt, &other.wkt) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.proj, &other.proj) {
            return a == b;
        }
        false
    }

    /// Whether coordinates in this CRS are angular (degrees)
    pub fn is_geographic(&self) -> bool {
        if let Some(code) = self.epsg {
            return matches!(code, 4326 | 4269 | 4267);
        }
        let text = self.wkt.as_deref().or(self.proj.as_deref()).unwrap_or("");
        let lower = text.to_lowercase();
        lower.contains("geogcs") || lower.contains("longlat") || lower.contains("geographic")
    }

    /// Whether coordinates in this CRS are linear map units
    pub fn is_projected(&self) -> bool {
        !self.is_geographic()
    }

    /// Short human-readable identifier
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{code}");
        }
        if let Some(proj) = &self.proj {
            return proj.clone();
        }
        if let Some(wkt) = &self.wkt {
            return format!("WKT:{}", &wkt[..wkt.len().min(50)]);
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

/// Extract an EPSG code from a PROJ string or WKT text
fn parse_epsg(text: &str) -> Option<u32> {
    if let Some(suffix) = text.strip_prefix("EPSG:") {
        return suffix.trim().parse().ok();
    }
    if let Some(pos) = text.find("AUTHORITY[\"EPSG\",\"") {
        let start = pos + 18;
        if let Some(end) = text[start..].find("\"]") {
            return text[start..start + end].parse().ok();
        }
    }
    if let Some(pos) = text.find("ID[\"EPSG\",") {
        let start = pos + 10;
        if let Some(end) = text[start..].find(']') {
            return text[start..start + end].trim().parse().ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_epsg() {
        let crs = Crs::from_epsg(4326);
        assert_eq!(crs.epsg(), Some(4326));
        assert_eq!(crs.identifier(), "EPSG:4326");
    }

    #[test]
    fn test_crs_equivalence() {
        assert!(Crs::from_epsg(4326).is_equivalent(&Crs::wgs84()));
        assert!(!Crs::wgs84().is_equivalent(&Crs::web_mercator()));
    }

    #[test]
    fn test_geographic_classification() {
        assert!(Crs::wgs84().is_geographic());
        assert!(Crs::web_mercator().is_projected());
        assert!(Crs::utm(18, true).is_projected());
        assert!(Crs::from_proj("+proj=longlat +datum=WGS84").is_geographic());
    }

    #[test]
    fn test_utm_codes() {
        assert_eq!(Crs::utm(50, true).epsg(), Some(32650));
        assert_eq!(Crs::utm(50, false).epsg(), Some(32750));
    }

    #[test]
    fn test_auto_utm() {
        // Miami is around 80.2W, 25.8N -> UTM zone 17 north
        assert_eq!(Crs::auto_utm(-80.19, 25.76).epsg(), Some(32617));
        // Southern hemisphere
        assert_eq!(Crs::auto_utm(151.2, -33.9).epsg(), Some(32756));
    }

    #[test]
    fn test_parse_wkt_epsg() {
        let wkt = r#"GEOGCS["WGS 84",AUTHORITY["EPSG","4326"]]"#;
        assert_eq!(Crs::from_wkt(wkt).epsg(), Some(4326));
    }
}
