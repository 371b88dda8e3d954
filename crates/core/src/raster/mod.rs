//! Georeferenced grid types

mod connectivity;
mod geotransform;
mod grid;

pub use connectivity::Connectivity;
pub use geotransform::GeoTransform;
pub use grid::{Grid, GridElement};

/// Elevation surface: real-valued samples over a georeferenced grid
pub type ElevationGrid = Grid<f64>;

/// Boolean flood extent with the same shape as its source [`ElevationGrid`]
pub type FloodMask = Grid<bool>;
