//! Impact aggregation
//!
//! Pure reduction of overlay results into the risk metrics reported to the
//! presentation layer, plus the driver that runs the whole
//! mask-to-report pipeline.

use crate::vector::{
    flooded_features, intersect, reproject_collection, vectorize_mask, MembershipPolicy,
    VectorizeParams,
};
use coastrisk_core::{Connectivity, Crs, FeatureCollection, FloodMask, Result};
use geo::{Centroid, Euclidean, Length};
use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Amenity value identifying hospitals
const HOSPITAL_AMENITY: &str = "hospital";

/// Risk metrics for one flood scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    /// Buildings counted as flooded
    pub flooded_building_count: usize,
    /// Flooded buildings flagged as critical infrastructure
    pub flooded_critical_count: usize,
    /// Flooded buildings with a hospital amenity
    pub flooded_hospitals: usize,
    /// All buildings with a hospital amenity
    pub total_hospitals: usize,
    /// Length of flooded road geometry in kilometres.
    ///
    /// When the road CRS is geographic and no local metric projection can
    /// be resolved, this falls back to the native map units of the input
    /// (with a logged warning) instead of silently reporting a wrong
    /// number.
    pub flooded_road_length_km: f64,
}

impl ImpactReport {
    /// Share of hospitals flooded; 0 when there are no hospitals at all
    pub fn hospital_impact(&self) -> f64 {
        if self.total_hospitals == 0 {
            0.0
        } else {
            self.flooded_hospitals as f64 / self.total_hospitals as f64
        }
    }
}

/// Parameters for the impact pipeline
#[derive(Debug, Clone, Default)]
pub struct ImpactParams {
    /// How a building counts as flooded
    pub membership: MembershipPolicy,
    /// Cell adjacency used when vectorizing the flood extent; keep it equal
    /// to the connectivity the flood fill ran with
    pub connectivity: Connectivity,
}

/// Run the full impact pipeline for one flood mask.
///
/// Buildings are reduced to their flooded subset by the configured
/// membership policy; roads are clipped against the vectorized flood
/// extent. Absent or empty inputs produce zeroed metrics, never an error.
pub fn assess_impact(
    mask: &FloodMask,
    buildings: Option<&FeatureCollection>,
    roads: Option<&FeatureCollection>,
    params: &ImpactParams,
) -> Result<ImpactReport> {
    let empty = FeatureCollection::new(mask.crs().clone());

    let buildings_total = buildings.unwrap_or(&empty);
    let flooded_buildings = if buildings_total.is_empty() {
        FeatureCollection::new(buildings_total.crs.clone())
    } else {
        flooded_features(buildings_total, mask, params.membership)?
    };

    let flooded_roads = match roads {
        Some(roads) if !roads.is_empty() => {
            let flood_polygons = vectorize_mask(
                mask,
                &VectorizeParams {
                    connectivity: params.connectivity,
                },
            );
            intersect(roads, &flood_polygons)?
        }
        _ => FeatureCollection::new(mask.crs().clone()),
    };

    Ok(aggregate_impact(
        buildings_total,
        &flooded_buildings,
        &flooded_roads,
    ))
}

/// Reduce flooded subsets into the final metrics.
///
/// Pure over its inputs: `buildings_total` is only consulted for the
/// hospital denominator, everything else comes from the flooded subsets.
pub fn aggregate_impact(
    buildings_total: &FeatureCollection,
    flooded_buildings: &FeatureCollection,
    flooded_roads: &FeatureCollection,
) -> ImpactReport {
    let is_hospital =
        |f: &&coastrisk_core::Feature| f.amenity() == Some(HOSPITAL_AMENITY);

    ImpactReport {
        flooded_building_count: flooded_buildings.len(),
        flooded_critical_count: flooded_buildings.iter().filter(|f| f.is_critical()).count(),
        flooded_hospitals: flooded_buildings.iter().filter(is_hospital).count(),
        total_hospitals: buildings_total.iter().filter(is_hospital).count(),
        flooded_road_length_km: road_length_km(flooded_roads),
    }
}

/// Measure flooded road geometry, preferring a distance-preserving local
/// projection.
///
/// Geographic inputs are reprojected into the UTM zone of the collection
/// centroid before measuring, so the result is metres regardless of how
/// small the angular extents are. When that projection cannot be resolved
/// the raw native-unit length is returned with a warning instead of a
/// silently wrong kilometre figure. Projected inputs are assumed to be in
/// metres already.
fn road_length_km(roads: &FeatureCollection) -> f64 {
    if roads.is_empty() {
        return 0.0;
    }

    if roads.crs.is_geographic() {
        let projected = collection_centroid(roads)
            .map(|(lon, lat)| Crs::auto_utm(lon, lat))
            .ok_or(())
            .and_then(|utm| reproject_collection(roads, &utm).map_err(|_| ()));

        match projected {
            Ok(metric) => total_length(&metric) / 1000.0,
            Err(()) => {
                warn!(
                    crs = %roads.crs,
                    "no metric projection for flooded roads; reporting length in native map units"
                );
                total_length(roads)
            }
        }
    } else {
        // Projected CRS: native units are metres
        total_length(roads) / 1000.0
    }
}

/// Mean of the feature centroids, as (x, y)
fn collection_centroid(collection: &FeatureCollection) -> Option<(f64, f64)> {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut count = 0usize;

    for feature in collection.iter() {
        if let Some(centroid) = feature.geometry.centroid() {
            sum_x += centroid.x();
            sum_y += centroid.y();
            count += 1;
        }
    }

    if count == 0 {
        None
    } else {
        Some((sum_x / count as f64, sum_y / count as f64))
    }
}

fn total_length(collection: &FeatureCollection) -> f64 {
    collection.iter().map(|f| geometry_length(&f.geometry)).sum()
}

/// Length of linear geometry in CRS units
fn geometry_length(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::LineString(ls) => ls.length::<Euclidean>(),
        Geometry::MultiLineString(mls) => mls.0.iter().map(|ls| ls.length::<Euclidean>()).sum(),
        Geometry::Line(l) => {
            let dx = l.end.x - l.start.x;
            let dy = l.end.y - l.start.y;
            (dx * dx + dy * dy).sqrt()
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coastrisk_core::{AttributeValue, Feature, GeoTransform, Grid};
    use coastrisk_core::vector::AMENITY_KEY;
    use geo_types::{LineString, Polygon};

    fn center_cell_mask(transform: GeoTransform, crs: Crs) -> FloodMask {
        let values = vec![
            false, false, false, //
            false, true, false, //
            false, false, false,
        ];
        Grid::from_vec(values, 3, 3, transform, crs).unwrap()
    }

    fn square(min_x: f64, min_y: f64, size: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (min_x, min_y),
                (min_x + size, min_y),
                (min_x + size, min_y + size),
                (min_x, min_y + size),
                (min_x, min_y),
            ]),
            vec![],
        )
    }

    fn hospital(min_x: f64, min_y: f64, size: f64, critical: bool) -> Feature {
        let mut feature = Feature::new(Geometry::Polygon(square(min_x, min_y, size)));
        feature.set_property(AMENITY_KEY, AttributeValue::String(HOSPITAL_AMENITY.into()));
        feature.set_critical(critical);
        feature
    }

    #[test]
    fn test_flooded_hospital_scenario() {
        let crs = Crs::utm(17, true);
        let mask = center_cell_mask(GeoTransform::new(0.0, 3.0, 1.0, -1.0), crs.clone());

        // Centroid (1.5, 1.5) sits in the single flooded cell
        let mut buildings = FeatureCollection::new(crs);
        buildings.push(hospital(1.2, 1.2, 0.6, true));

        let report =
            assess_impact(&mask, Some(&buildings), None, &ImpactParams::default()).unwrap();

        assert_eq!(report.flooded_building_count, 1);
        assert_eq!(report.flooded_critical_count, 1);
        assert_eq!(report.flooded_hospitals, 1);
        assert_eq!(report.total_hospitals, 1);
        assert_eq!(report.hospital_impact(), 1.0);
        assert_eq!(report.flooded_road_length_km, 0.0);
    }

    #[test]
    fn test_zero_hospitals_reports_zero_ratio() {
        let crs = Crs::utm(17, true);
        let mask = center_cell_mask(GeoTransform::new(0.0, 3.0, 1.0, -1.0), crs.clone());

        let mut buildings = FeatureCollection::new(crs);
        let mut office = Feature::new(Geometry::Polygon(square(1.2, 1.2, 0.6)));
        office.set_property(AMENITY_KEY, AttributeValue::String("office".into()));
        buildings.push(office);

        let report =
            assess_impact(&mask, Some(&buildings), None, &ImpactParams::default()).unwrap();

        assert_eq!(report.flooded_building_count, 1);
        assert_eq!(report.total_hospitals, 0);
        assert_eq!(report.hospital_impact(), 0.0);
    }

    #[test]
    fn test_absent_inputs_report_zeros() {
        let crs = Crs::utm(17, true);
        let mask = center_cell_mask(GeoTransform::new(0.0, 3.0, 1.0, -1.0), crs);

        let report = assess_impact(&mask, None, None, &ImpactParams::default()).unwrap();

        assert_eq!(report.flooded_building_count, 0);
        assert_eq!(report.flooded_critical_count, 0);
        assert_eq!(report.total_hospitals, 0);
        assert_eq!(report.hospital_impact(), 0.0);
        assert_eq!(report.flooded_road_length_km, 0.0);
    }

    #[test]
    fn test_road_length_in_projected_crs() {
        // 100 m cells in UTM 17N; the flooded cell spans x,y in [100, 200]
        let crs = Crs::utm(17, true);
        let mask = center_cell_mask(GeoTransform::new(0.0, 300.0, 100.0, -100.0), crs.clone());

        let mut roads = FeatureCollection::new(crs);
        roads.push(Feature::new(Geometry::LineString(LineString::from(vec![
            (-500.0, 150.0),
            (500.0, 150.0),
        ]))));

        let report =
            assess_impact(&mask, None, Some(&roads), &ImpactParams::default()).unwrap();

        // 100 m of road crosses the flooded cell
        assert!((report.flooded_road_length_km - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_road_length_geographic_uses_local_utm() {
        // 0.01 degree cells near Miami; the flooded cell spans one cell of
        // longitude at latitude ~25.785
        let crs = Crs::wgs84();
        let mask = center_cell_mask(
            GeoTransform::new(-80.20, 25.80, 0.01, -0.01),
            crs.clone(),
        );

        let mut roads = FeatureCollection::new(crs);
        roads.push(Feature::new(Geometry::LineString(LineString::from(vec![
            (-80.25, 25.785),
            (-80.15, 25.785),
        ]))));

        let report =
            assess_impact(&mask, None, Some(&roads), &ImpactParams::default()).unwrap();

        // One cell of longitude is about a kilometre at this latitude
        assert!(
            report.flooded_road_length_km > 0.95 && report.flooded_road_length_km < 1.05,
            "length {}",
            report.flooded_road_length_km
        );
    }

    #[test]
    fn test_road_length_fallback_to_native_units() {
        // NAD83 reads as geographic but has no supported projection, so the
        // length comes back in degrees with a warning
        let crs = Crs::from_epsg(4269);
        let mut roads = FeatureCollection::new(crs);
        roads.push(Feature::new(Geometry::LineString(LineString::from(vec![
            (-80.19, 25.785),
            (-80.18, 25.785),
        ]))));

        let length = road_length_km(&roads);
        assert!((length - 0.01).abs() < 1e-9, "native-unit length {length}");
    }

    #[test]
    fn test_aggregate_counts_mixed_buildings() {
        let crs = Crs::utm(17, true);
        let mut total = FeatureCollection::new(crs.clone());
        total.push(hospital(0.0, 0.0, 1.0, true));
        total.push(hospital(10.0, 10.0, 1.0, true));
        let mut school = Feature::new(Geometry::Polygon(square(20.0, 20.0, 1.0)));
        school.set_property(AMENITY_KEY, AttributeValue::String("school".into()));
        school.set_critical(true);
        total.push(school.clone());

        let mut flooded = FeatureCollection::new(crs.clone());
        flooded.push(total.features[0].clone());
        flooded.push(school);

        let report = aggregate_impact(&total, &flooded, &FeatureCollection::new(crs));

        assert_eq!(report.flooded_building_count, 2);
        assert_eq!(report.flooded_critical_count, 2);
        assert_eq!(report.flooded_hospitals, 1);
        assert_eq!(report.total_hospitals, 2);
        assert_eq!(report.hospital_impact(), 0.5);
    }
}
