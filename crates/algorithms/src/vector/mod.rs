//! Vector-side analysis
//!
//! - Vectorize: flood mask to geographic polygons
//! - Reproject: move geometries and collections between CRSs
//! - Overlay: point-in-mask tests, feature intersection, flooded-subset
//!   selection

mod overlay;
mod reproject;
mod vectorize;

pub use overlay::{contains_point, flooded_features, intersect, MembershipPolicy};
pub use reproject::{reproject_collection, reproject_feature, reproject_geometry};
pub use vectorize::{vectorize_mask, VectorizeFlood, VectorizeParams};
