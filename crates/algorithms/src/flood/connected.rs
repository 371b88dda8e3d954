//! Connectivity-constrained inundation

use crate::flood::coastal_edge_mask;
use coastrisk_core::{Algorithm, Connectivity, ElevationGrid, Error, FloodMask, Result};
use ndarray::Array2;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How many worklist pops between cancellation checks
const CANCEL_CHECK_INTERVAL: usize = 4096;

/// Parameters for the connected flood fill
#[derive(Debug, Clone, Default)]
pub struct ConnectedParams {
    /// Target water level in grid elevation units
    pub sea_level: f64,
    /// Cell adjacency the fill grows through
    pub connectivity: Connectivity,
    /// Cooperative cancellation flag, checked between worklist batches
    pub cancel: Option<Arc<AtomicBool>>,
}

impl ConnectedParams {
    /// Parameters for a given water level, defaults otherwise
    pub fn at_level(sea_level: f64) -> Self {
        Self {
            sea_level,
            ..Self::default()
        }
    }
}

/// Connected flood algorithm
#[derive(Debug, Clone, Default)]
pub struct ConnectedFlood;

impl Algorithm for ConnectedFlood {
    type Input = ElevationGrid;
    type Output = FloodMask;
    type Params = ConnectedParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Connected Flood"
    }

    fn description(&self) -> &'static str {
        "Flood mask restricted to regions reachable from the open-water boundary"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        connected(&input, &params)
    }
}

/// Compute the hydrologically connected flood mask.
///
/// A cell floods iff its elevation is at or below the water level *and*
/// there is a path of such cells to the grid boundary. Interior depressions
/// below the water level that are walled off from the boundary stay dry,
/// which is the difference from [`bathtub`](crate::flood::bathtub): the
/// connected mask is always a subset of the bathtub mask.
///
/// Seeds are the boundary cells at or below the level
/// ([`coastal_edge_mask`]); the fill grows through the configured
/// adjacency using a worklist, enqueueing each cell at most once, so the
/// whole pass is O(cells). If no boundary cell qualifies the result is
/// all-false; if the level exceeds the maximum elevation the result is the
/// full threshold mask.
///
/// A cancellation flag in `params` is honoured between worklist batches and
/// surfaces as `Error::Cancelled`.
pub fn connected(dem: &ElevationGrid, params: &ConnectedParams) -> Result<FloodMask> {
    let level = params.sea_level;
    if !level.is_finite() {
        return Err(Error::NonFiniteInput {
            name: "sea_level",
            value: level,
        });
    }

    let (rows, cols) = dem.shape();
    let elevation = dem.view();
    let offsets = params.connectivity.offsets();

    let mut visited = Array2::from_elem((rows, cols), false);
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    // Seed from boundary cells at or below the water level
    let edge = coastal_edge_mask(dem);
    for ((row, col), &is_edge) in edge.data().indexed_iter() {
        if is_edge && elevation[(row, col)] <= level {
            visited[(row, col)] = true;
            queue.push_back((row, col));
        }
    }

    let mut pops: usize = 0;
    while let Some((row, col)) = queue.pop_front() {
        pops += 1;
        if pops % CANCEL_CHECK_INTERVAL == 0 {
            if let Some(flag) = &params.cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(Error::Cancelled);
                }
            }
        }

        for &(dr, dc) in offsets {
            let nr = row as isize + dr;
            let nc = col as isize + dc;

            if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                continue;
            }

            let nr = nr as usize;
            let nc = nc as usize;

            if visited[(nr, nc)] || elevation[(nr, nc)] > level {
                continue;
            }

            visited[(nr, nc)] = true;
            queue.push_back((nr, nc));
        }
    }

    let mut mask = dem.map(|_| false);
    *mask.data_mut() = visited;
    Ok(mask)
}
