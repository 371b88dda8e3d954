//! Critical-infrastructure classification
//!
//! A preprocessing step over fetched building data: the impact aggregation
//! itself never inspects amenities to decide criticality, it only reads the
//! flag this step wrote.

use coastrisk_core::FeatureCollection;

/// Amenity classes counted as critical infrastructure
pub const CRITICAL_AMENITIES: [&str; 5] =
    ["hospital", "school", "fire_station", "police", "emergency"];

/// Set the critical-infrastructure flag on every feature from its amenity.
///
/// Features without an amenity, or with one outside
/// [`CRITICAL_AMENITIES`], are flagged `false`. Returns a new collection;
/// the input is untouched.
pub fn mark_critical(collection: &FeatureCollection) -> FeatureCollection {
    let mut out = collection.clone();
    for feature in &mut out.features {
        let critical = feature
            .amenity()
            .map(|amenity| CRITICAL_AMENITIES.contains(&amenity))
            .unwrap_or(false);
        feature.set_critical(critical);
    }
    out
}
