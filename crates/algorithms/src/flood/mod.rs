//! Flood modelling over elevation grids
//!
//! - Edge seeding: which cells count as ocean contact points
//! - Bathtub: pure elevation-threshold inundation
//! - Connected: inundation restricted to cells reachable from open water
//! - Sea wall: rasterize a barrier line and raise the surface along it

mod bathtub;
mod connected;
mod edge;
mod wall;

pub use bathtub::{bathtub, Bathtub, BathtubParams};
pub use connected::{connected, ConnectedFlood, ConnectedParams};
pub use edge::coastal_edge_mask;
pub use wall::{apply_sea_wall, rasterize_polyline, ApplySeaWall, SeaWallParams};
