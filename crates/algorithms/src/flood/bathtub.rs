//! Threshold ("bathtub") inundation

use coastrisk_core::{Algorithm, ElevationGrid, Error, FloodMask, Result};

/// Parameters for bathtub inundation
#[derive(Debug, Clone, Default)]
pub struct BathtubParams {
    /// Target water level in grid elevation units
    pub sea_level: f64,
}

/// Bathtub inundation algorithm
#[derive(Debug, Clone, Default)]
pub struct Bathtub;

impl Algorithm for Bathtub {
    type Input = ElevationGrid;
    type Output = FloodMask;
    type Params = BathtubParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Bathtub Inundation"
    }

    fn description(&self) -> &'static str {
        "Flood mask from a pure elevation threshold, ignoring connectivity"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        bathtub(&input, params.sea_level)
    }
}

/// Compute the threshold flood mask: a cell floods iff elevation <= level.
///
/// Connectivity to open water is ignored, so any enclosed area below the
/// water level is marked flooded regardless of barriers; use
/// [`connected`](crate::flood::connected) when that over-prediction matters.
/// O(cells).
pub fn bathtub(dem: &ElevationGrid, sea_level: f64) -> Result<FloodMask> {
    if !sea_level.is_finite() {
        return Err(Error::NonFiniteInput {
            name: "sea_level",
            value: sea_level,
        });
    }

    Ok(dem.map(|z| z <= sea_level))
}
