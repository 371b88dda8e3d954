//! Vector features with typed attributes

use crate::crs::Crs;
use geo_types::{Coord, Geometry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attribute key carrying the OSM-style amenity classification
pub const AMENITY_KEY: &str = "amenity";
/// Attribute key carrying the precomputed critical-infrastructure flag
pub const IS_CRITICAL_KEY: &str = "is_critical";

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// Boolean content, if this value is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String content, if this value is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A geographic feature: geometry plus attributes.
///
/// The optional `crs` overrides the owning collection's CRS for features
/// that arrived in different coordinates and still await reprojection.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Feature geometry
    pub geometry: Geometry<f64>,
    /// Per-feature CRS override; `None` means the collection CRS applies
    pub crs: Option<Crs>,
    /// Feature attributes
    pub properties: HashMap<String, AttributeValue>,
    /// Optional feature ID
    pub id: Option<String>,
}

impl Feature {
    /// Create a feature with the given geometry and no attributes
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry,
            crs: None,
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Attach a per-feature CRS override
    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = Some(crs);
        self
    }

    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.properties.insert(key.into(), value);
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }

    /// The amenity classification, if present
    pub fn amenity(&self) -> Option<&str> {
        self.get_property(AMENITY_KEY).and_then(AttributeValue::as_str)
    }

    /// Whether the feature is flagged as critical infrastructure.
    ///
    /// The flag is populated by the classification step upstream; a missing
    /// or non-boolean attribute reads as `false`.
    pub fn is_critical(&self) -> bool {
        self.get_property(IS_CRITICAL_KEY)
            .and_then(AttributeValue::as_bool)
            .unwrap_or(false)
    }

    /// Set the critical-infrastructure flag
    pub fn set_critical(&mut self, critical: bool) {
        self.set_property(IS_CRITICAL_KEY, AttributeValue::Bool(critical));
    }
}

/// An ordered collection of features sharing one nominal CRS
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    /// Nominal CRS of the collection
    pub crs: Crs,
    /// Features, in insertion order
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create an empty collection
    pub fn new(crs: Crs) -> Self {
        Self {
            crs,
            features: Vec::new(),
        }
    }

    /// Create a collection from existing features
    pub fn with_features(crs: Crs, features: Vec<Feature>) -> Self {
        Self { crs, features }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// The CRS a feature's coordinates are actually in
    pub fn feature_crs<'a>(&'a self, feature: &'a Feature) -> &'a Crs {
        feature.crs.as_ref().unwrap_or(&self.crs)
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

/// A protective barrier: polyline plus crest height.
///
/// Fewer than two points is a valid no-op wall (an interactive caller may
/// cancel drawing), not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeaWall {
    /// Polyline vertices in grid CRS coordinates
    pub points: Vec<Coord<f64>>,
    /// Crest elevation the wall raises the surface to
    pub height: f64,
}

impl SeaWall {
    /// Create a wall from polyline vertices
    pub fn new(points: Vec<Coord<f64>>, height: f64) -> Self {
        Self { points, height }
    }

    /// Create a wall from (x, y) pairs
    pub fn from_xy(points: &[(f64, f64)], height: f64) -> Self {
        Self {
            points: points.iter().map(|&(x, y)| Coord { x, y }).collect(),
            height,
        }
    }

    /// Whether the wall is too short to rasterize
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }
}
