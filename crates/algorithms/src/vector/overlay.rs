//! Overlay analysis
//!
//! Point-in-mask tests, geometric intersection between feature collections
//! and flooded-subset selection for the impact pipeline.

use crate::maybe_rayon::*;
use crate::vector::{reproject_feature, reproject_geometry, vectorize_mask, VectorizeParams};
use coastrisk_core::{Crs, Feature, FeatureCollection, FloodMask, Result};
use geo::{BooleanOps, Centroid, Intersects};
use geo_types::{Geometry, MultiLineString, MultiPolygon, Point};
use tracing::debug;

/// How a feature counts as flooded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MembershipPolicy {
    /// A feature floods iff its centroid falls in a flooded cell.
    ///
    /// Deliberately approximate: a footprint overlapping flooded area
    /// whose centroid stays dry is not counted.
    #[default]
    Centroid,
    /// A feature floods iff its footprint overlaps any flooded polygon
    Overlap,
}

/// Test whether a map coordinate falls in a flooded cell.
///
/// The point is pushed through the inverse affine transform and floored to
/// cell indices; anything outside the grid is dry, never an error.
pub fn contains_point(mask: &FloodMask, point: &Point<f64>) -> bool {
    let (col, row) = mask.geo_to_pixel(point.x(), point.y());
    if !col.is_finite() || !row.is_finite() {
        return false;
    }

    let (row, col) = (row.floor(), col.floor());
    if row < 0.0 || col < 0.0 {
        return false;
    }

    let (rows, cols) = mask.shape();
    let (row, col) = (row as usize, col as usize);
    if row >= rows || col >= cols {
        return false;
    }

    mask.get(row, col).unwrap_or(false)
}

/// Intersect two feature collections.
///
/// Either collection being empty yields an empty result. `b` (and any
/// feature-level CRS override on either side) is reprojected into `a`'s
/// nominal CRS before comparison. Every pair with a non-empty geometric
/// intersection contributes one feature carrying the intersection geometry
/// and the union of both attribute maps, `a`'s values winning collisions.
pub fn intersect(a: &FeatureCollection, b: &FeatureCollection) -> Result<FeatureCollection> {
    if a.is_empty() || b.is_empty() {
        return Ok(FeatureCollection::new(a.crs.clone()));
    }

    let target = a.crs.clone();
    let left = normalize(a, &target)?;
    let right = normalize(b, &target)?;

    let matches: Vec<Vec<Feature>> = left
        .par_iter()
        .map(|fa| {
            right
                .iter()
                .filter_map(|fb| {
                    geometry_intersection(&fa.geometry, &fb.geometry).map(|geometry| {
                        let mut properties = fb.properties.clone();
                        properties.extend(fa.properties.clone());
                        Feature {
                            geometry,
                            crs: None,
                            properties,
                            id: fa.id.clone(),
                        }
                    })
                })
                .collect()
        })
        .collect();

    Ok(FeatureCollection::with_features(
        target,
        matches.into_iter().flatten().collect(),
    ))
}

/// Select the subset of a collection that counts as flooded.
///
/// With `Centroid` membership each feature's centroid (reprojected into the
/// mask CRS when needed) is tested against the mask; with `Overlap` the
/// footprint is tested against the vectorized flood polygons. The returned
/// collection keeps the input's CRS and feature order.
pub fn flooded_features(
    collection: &FeatureCollection,
    mask: &FloodMask,
    policy: MembershipPolicy,
) -> Result<FeatureCollection> {
    let mut out = FeatureCollection::new(collection.crs.clone());
    if collection.is_empty() {
        return Ok(out);
    }

    let flood_polygons = match policy {
        MembershipPolicy::Centroid => None,
        MembershipPolicy::Overlap => Some(vectorize_mask(mask, &VectorizeParams::default())),
    };

    for feature in collection.iter() {
        let crs = collection.feature_crs(feature);

        let is_flooded = match policy {
            MembershipPolicy::Centroid => match feature.geometry.centroid() {
                Some(centroid) => {
                    let centroid = if crs.is_equivalent(mask.crs()) {
                        centroid
                    } else {
                        match reproject_geometry(
                            &Geometry::Point(centroid),
                            crs,
                            mask.crs(),
                        )? {
                            Geometry::Point(p) => p,
                            _ => unreachable!("point reprojects to point"),
                        }
                    };
                    contains_point(mask, &centroid)
                }
                None => false,
            },
            MembershipPolicy::Overlap => {
                let geometry = if crs.is_equivalent(mask.crs()) {
                    feature.geometry.clone()
                } else {
                    reproject_geometry(&feature.geometry, crs, mask.crs())?
                };
                flood_polygons
                    .as_ref()
                    .map(|polys| polys.iter().any(|p| p.geometry.intersects(&geometry)))
                    .unwrap_or(false)
            }
        };

        if is_flooded {
            out.push(feature.clone());
        }
    }

    Ok(out)
}

/// Bring every feature of a collection into the target CRS
fn normalize(collection: &FeatureCollection, target: &Crs) -> Result<Vec<Feature>> {
    collection
        .iter()
        .map(|feature| {
            let from = collection.feature_crs(feature);
            if from.is_equivalent(target) {
                Ok(feature.clone())
            } else {
                reproject_feature(feature, from, target)
            }
        })
        .collect()
}

/// Geometric intersection of the pairs the impact pipeline meets:
/// areas against areas, lines against areas and points against areas.
fn geometry_intersection(a: &Geometry<f64>, b: &Geometry<f64>) -> Option<Geometry<f64>> {
    if let (Some(pa), Some(pb)) = (as_multi_polygon(a), as_multi_polygon(b)) {
        let overlap = pa.intersection(&pb);
        if overlap.0.is_empty() {
            return None;
        }
        return Some(Geometry::MultiPolygon(overlap));
    }

    if let (Some(lines), Some(polys)) = (as_multi_line(a), as_multi_polygon(b)) {
        let clipped = polys.clip(&lines, false);
        if clipped.0.iter().all(|ls| ls.0.len() < 2) {
            return None;
        }
        return Some(Geometry::MultiLineString(clipped));
    }
    if let (Some(polys), Some(lines)) = (as_multi_polygon(a), as_multi_line(b)) {
        let clipped = polys.clip(&lines, false);
        if clipped.0.iter().all(|ls| ls.0.len() < 2) {
            return None;
        }
        return Some(Geometry::MultiLineString(clipped));
    }

    if let (Geometry::Point(p), Some(polys)) = (a, as_multi_polygon(b)) {
        return polys.intersects(p).then(|| Geometry::Point(*p));
    }
    if let (Some(polys), Geometry::Point(p)) = (as_multi_polygon(a), b) {
        return polys.intersects(p).then(|| Geometry::Point(*p));
    }

    debug!("unsupported geometry pair in overlay, skipping");
    None
}

fn as_multi_polygon(geom: &Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geom {
        Geometry::Polygon(p) => Some(MultiPolygon::new(vec![p.clone()])),
        Geometry::MultiPolygon(mp) => Some(mp.clone()),
        Geometry::Rect(r) => Some(MultiPolygon::new(vec![r.to_polygon()])),
        _ => None,
    }
}

fn as_multi_line(geom: &Geometry<f64>) -> Option<MultiLineString<f64>> {
    match geom {
        Geometry::LineString(ls) => Some(MultiLineString::new(vec![ls.clone()])),
        Geometry::MultiLineString(mls) => Some(mls.clone()),
        _ => None,
    }
}
