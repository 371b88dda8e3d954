//! Grid-boundary seeding for connectivity analysis

use coastrisk_core::{ElevationGrid, FloodMask};

/// Mark every cell on the grid boundary as a candidate ocean contact point.
///
/// The first and last row and the first and last column are true, everything
/// else false; a grid with a single row or column is entirely true. This
/// approximates "cells in contact with open water" without any knowledge of
/// the actual coastline position, which is what seeds the connected flood
/// fill.
pub fn coastal_edge_mask(grid: &ElevationGrid) -> FloodMask {
    let mut mask = grid.map(|_| false);
    let (rows, cols) = mask.shape();

    let data = mask.data_mut();
    for col in 0..cols {
        data[(0, col)] = true;
        data[(rows - 1, col)] = true;
    }
    for row in 0..rows {
        data[(row, 0)] = true;
        data[(row, cols - 1)] = true;
    }

    mask
}
