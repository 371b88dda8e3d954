//! Sea-wall application
//!
//! Rasterizes a protective-barrier polyline onto the grid and raises the
//! surface along it, producing the modified copy consumed by a what-if
//! inundation run.

use coastrisk_core::{Algorithm, ElevationGrid, Error, GeoTransform, Result, SeaWall};
use geo_types::Coord;
use std::collections::BTreeSet;
use tracing::debug;

/// Parameters for sea-wall application
#[derive(Debug, Clone, Default)]
pub struct SeaWallParams {
    /// The barrier to apply; a degenerate wall is a valid no-op
    pub wall: SeaWall,
}

/// Sea-wall application algorithm
#[derive(Debug, Clone, Default)]
pub struct ApplySeaWall;

impl Algorithm for ApplySeaWall {
    type Input = ElevationGrid;
    type Output = ElevationGrid;
    type Params = SeaWallParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Apply Sea Wall"
    }

    fn description(&self) -> &'static str {
        "Raise the elevation surface along a barrier line"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        apply_sea_wall(&input, &params.wall)
    }
}

/// Apply a sea wall to an elevation grid, returning a modified copy.
///
/// Every cell the wall line passes through is raised to
/// `max(current elevation, wall height)`; no cell is ever lowered and cells
/// off the line are untouched. A wall with fewer than two points, or one
/// that rasterizes to no cells (entirely outside the grid), yields an
/// unmodified copy — an interactive caller cancelling a drawing is not an
/// error.
pub fn apply_sea_wall(dem: &ElevationGrid, wall: &SeaWall) -> Result<ElevationGrid> {
    if !wall.height.is_finite() {
        return Err(Error::NonFiniteInput {
            name: "wall_height",
            value: wall.height,
        });
    }

    if wall.is_degenerate() {
        debug!(points = wall.points.len(), "degenerate sea wall, returning unmodified copy");
        return Ok(dem.clone());
    }

    let cells = rasterize_polyline(dem.transform(), dem.shape(), &wall.points);
    if cells.is_empty() {
        debug!("sea wall rasterized to no cells, returning unmodified copy");
        return Ok(dem.clone());
    }

    let mut out = dem.clone();
    let data = out.data_mut();
    for &(row, col) in &cells {
        if wall.height > data[(row, col)] {
            data[(row, col)] = wall.height;
        }
    }

    Ok(out)
}

/// Rasterize a polyline into the set of grid cells it passes through.
///
/// Each segment is mapped into fractional pixel space and traversed with a
/// supercover walk that visits every cell whose interior the segment
/// crosses; a segment passing exactly through a cell corner steps
/// diagonally, skipping the two cells it merely touches at a point. Segment
/// endpoints are put in a canonical order before traversal, so reversing
/// the polyline yields the identical cell set.
///
/// Cells are returned sorted by (row, col) with duplicates removed;
/// out-of-grid cells are dropped.
pub fn rasterize_polyline(
    transform: &GeoTransform,
    shape: (usize, usize),
    points: &[Coord<f64>],
) -> Vec<(usize, usize)> {
    let (rows, cols) = shape;
    let mut cells: BTreeSet<(usize, usize)> = BTreeSet::new();

    for pair in points.windows(2) {
        let a = transform.geo_to_pixel(pair[0].x, pair[0].y);
        let b = transform.geo_to_pixel(pair[1].x, pair[1].y);

        if !a.0.is_finite() || !a.1.is_finite() || !b.0.is_finite() || !b.1.is_finite() {
            continue;
        }

        // Canonical segment direction: reversal-invariant rasterization
        let (start, end) = if (b.0, b.1) < (a.0, a.1) { (b, a) } else { (a, b) };

        let Some((start, end)) = clip_segment(start, end, cols as f64, rows as f64) else {
            continue;
        };

        supercover(start, end, rows, cols, &mut cells);
    }

    cells.into_iter().collect()
}

/// Liang-Barsky clip of a segment to the pixel-space rectangle
/// `[0, max_x] x [0, max_y]`. Returns None for a segment entirely outside.
fn clip_segment(
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    max_x: f64,
    max_y: f64,
) -> Option<((f64, f64), (f64, f64))> {
    let dx = x1 - x0;
    let dy = y1 - y0;

    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    for (p, q) in [
        (-dx, x0),
        (dx, max_x - x0),
        (-dy, y0),
        (dy, max_y - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }

    if t0 > t1 {
        return None;
    }

    Some((
        (x0 + t0 * dx, y0 + t0 * dy),
        (x0 + t1 * dx, y0 + t1 * dy),
    ))
}

/// Grid traversal visiting every cell the segment passes through
/// (Amanatides-Woo stepping on x/y gridline crossings).
fn supercover(
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    rows: usize,
    cols: usize,
    out: &mut BTreeSet<(usize, usize)>,
) {
    let dx = x1 - x0;
    let dy = y1 - y0;

    let mut cx = x0.floor() as i64;
    let mut cy = y0.floor() as i64;
    let end_cx = x1.floor() as i64;
    let end_cy = y1.floor() as i64;

    let step_x: i64 = if dx > 0.0 {
        1
    } else if dx < 0.0 {
        -1
    } else {
        0
    };
    let step_y: i64 = if dy > 0.0 {
        1
    } else if dy < 0.0 {
        -1
    } else {
        0
    };

    let mut t_max_x = if step_x != 0 {
        let next = if step_x > 0 { cx as f64 + 1.0 } else { cx as f64 };
        (next - x0) / dx
    } else {
        f64::INFINITY
    };
    let mut t_max_y = if step_y != 0 {
        let next = if step_y > 0 { cy as f64 + 1.0 } else { cy as f64 };
        (next - y0) / dy
    } else {
        f64::INFINITY
    };

    let t_delta_x = if step_x != 0 { (1.0 / dx).abs() } else { f64::INFINITY };
    let t_delta_y = if step_y != 0 { (1.0 / dy).abs() } else { f64::INFINITY };

    // Floating-point guard: never walk more cells than the segment spans
    let mut remaining = (end_cx - cx).abs() + (end_cy - cy).abs() + 1;

    loop {
        if cy >= 0 && cx >= 0 && (cy as usize) < rows && (cx as usize) < cols {
            out.insert((cy as usize, cx as usize));
        }

        if (cx == end_cx && cy == end_cy) || remaining <= 0 {
            break;
        }

        if t_max_x < t_max_y {
            cx += step_x;
            t_max_x += t_delta_x;
            remaining -= 1;
        } else if t_max_y < t_max_x {
            cy += step_y;
            t_max_y += t_delta_y;
            remaining -= 1;
        } else {
            // Exact corner crossing: step diagonally, the two side cells
            // are touched only at a point
            cx += step_x;
            cy += step_y;
            t_max_x += t_delta_x;
            t_max_y += t_delta_y;
            remaining -= 2;
        }
    }
}
