//! # CoastRisk Core
//!
//! Core types for coastal flood-risk analysis.
//!
//! This crate provides:
//! - `Grid<T>`: georeferenced 2D grid, with the `ElevationGrid` and
//!   `FloodMask` aliases used throughout the workspace
//! - `GeoTransform`: affine mapping between grid indices and map coordinates
//! - `Crs`: coordinate reference system identification and point reprojection
//! - `Feature` / `FeatureCollection`: vector geometry with typed attributes
//! - The `Algorithm` trait implemented by every analysis step

pub mod crs;
pub mod error;
pub mod raster;
pub mod vector;

pub use crs::Crs;
pub use error::{Error, Result};
pub use raster::{Connectivity, ElevationGrid, FloodMask, GeoTransform, Grid, GridElement};
pub use vector::{AttributeValue, Feature, FeatureCollection, SeaWall};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{
        Connectivity, ElevationGrid, FloodMask, GeoTransform, Grid, GridElement,
    };
    pub use crate::vector::{AttributeValue, Feature, FeatureCollection, SeaWall};
    pub use crate::Algorithm;
}

/// Core trait for all analysis steps in the workspace.
///
/// Algorithms are pure functions of their input and parameters; they never
/// mutate the input or hold state between calls.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
