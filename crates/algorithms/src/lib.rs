//! # CoastRisk Algorithms
//!
//! Flood modelling and impact assessment over georeferenced grids.
//!
//! ## Pipeline
//!
//! An [`ElevationGrid`](coastrisk_core::ElevationGrid), optionally modified
//! by a sea wall, is turned into a flood mask, vectorized into polygons and
//! overlaid against infrastructure to produce an impact report:
//!
//! - **flood**: edge seeding, bathtub and connectivity-constrained
//!   inundation, sea-wall application
//! - **vector**: flood-mask vectorization, reprojection, overlay analysis
//! - **impact**: impact aggregation and the critical-infrastructure
//!   classifier

pub mod flood;
pub mod impact;
pub mod vector;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::flood::{
        apply_sea_wall, bathtub, coastal_edge_mask, connected, rasterize_polyline, ApplySeaWall,
        Bathtub, BathtubParams, ConnectedFlood, ConnectedParams, SeaWallParams,
    };
    pub use crate::impact::{
        assess_impact, mark_critical, ImpactParams, ImpactReport, CRITICAL_AMENITIES,
    };
    pub use crate::vector::{
        contains_point, flooded_features, intersect, reproject_collection, reproject_geometry,
        vectorize_mask, MembershipPolicy, VectorizeFlood, VectorizeParams,
    };
    pub use coastrisk_core::prelude::*;
}
