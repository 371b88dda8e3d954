//! Geometry and collection reprojection

use coastrisk_core::crs::{reproject_xy, ProjectionKind};
use coastrisk_core::{Crs, Feature, FeatureCollection, Result};
use geo::MapCoords;
use geo_types::{Coord, Geometry};

/// Reproject a geometry between two CRSs.
///
/// Equivalent CRSs short-circuit to a clone; otherwise both sides must
/// resolve to a supported projection (`MissingCrs` if not) and every
/// coordinate is mapped through the geographic pivot.
pub fn reproject_geometry(geom: &Geometry<f64>, from: &Crs, to: &Crs) -> Result<Geometry<f64>> {
    if from.is_equivalent(to) {
        return Ok(geom.clone());
    }

    let src = ProjectionKind::for_crs(from)?;
    let dst = ProjectionKind::for_crs(to)?;

    geom.try_map_coords(|c| reproject_xy(&src, &dst, c.x, c.y).map(|(x, y)| Coord { x, y }))
}

/// Reproject a feature, clearing any per-feature CRS override
pub fn reproject_feature(feature: &Feature, from: &Crs, to: &Crs) -> Result<Feature> {
    Ok(Feature {
        geometry: reproject_geometry(&feature.geometry, from, to)?,
        crs: None,
        properties: feature.properties.clone(),
        id: feature.id.clone(),
    })
}

/// Reproject a whole collection into a target CRS.
///
/// Each feature is taken from its effective CRS (its own override if it has
/// one, the collection CRS otherwise), so a mixed-CRS collection comes out
/// uniform.
pub fn reproject_collection(collection: &FeatureCollection, to: &Crs) -> Result<FeatureCollection> {
    let mut out = FeatureCollection::new(to.clone());
    for feature in collection.iter() {
        let from = collection.feature_crs(feature);
        out.push(reproject_feature(feature, from, to)?);
    }
    Ok(out)
}
