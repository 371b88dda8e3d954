//! Flood-mask vectorization
//!
//! Converts a boolean flood mask into geographic polygons by tracing the
//! boundary of every connected region along the cell-corner lattice. The
//! result is a pure function of the mask: regions are discovered in
//! row-major order and boundaries walked with a fixed turn rule, so the
//! output never depends on traversal accidents.

use crate::maybe_rayon::*;
use coastrisk_core::{
    Algorithm, AttributeValue, Connectivity, Error, Feature, FeatureCollection, FloodMask, Result,
};
use geo_types::{Geometry, LineString, Polygon};
use std::collections::{HashMap, VecDeque};

/// Parameters for flood-mask vectorization
#[derive(Debug, Clone, Default)]
pub struct VectorizeParams {
    /// Cell adjacency defining a connected region; keep it equal to the
    /// connectivity the flood fill ran with
    pub connectivity: Connectivity,
}

/// Flood-mask vectorization algorithm
#[derive(Debug, Clone, Default)]
pub struct VectorizeFlood;

impl Algorithm for VectorizeFlood {
    type Input = FloodMask;
    type Output = FeatureCollection;
    type Params = VectorizeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Vectorize Flood Mask"
    }

    fn description(&self) -> &'static str {
        "Convert a boolean flood mask into geographic polygons"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        Ok(vectorize_mask(&input, &params))
    }
}

/// Edge walk directions on the corner lattice
const EAST: u8 = 0;
const SOUTH: u8 = 1;
const WEST: u8 = 2;
const NORTH: u8 = 3;

/// A directed boundary edge starting at a lattice vertex
#[derive(Debug, Clone, Copy)]
struct BoundaryEdge {
    start: (i64, i64),
    dir: u8,
}

impl BoundaryEdge {
    fn end(&self) -> (i64, i64) {
        let (r, c) = self.start;
        match self.dir {
            EAST => (r, c + 1),
            SOUTH => (r + 1, c),
            WEST => (r, c - 1),
            _ => (r - 1, c),
        }
    }

    /// Cell on the dry side of the edge (may be outside the grid)
    fn dry_cell(&self) -> (i64, i64) {
        let (r, c) = self.start;
        match self.dir {
            EAST => (r - 1, c),
            SOUTH => (r, c),
            WEST => (r, c - 1),
            _ => (r - 1, c - 1),
        }
    }
}

/// Convert a flood mask into one polygon feature per connected region.
///
/// Flooded cells are grouped by the configured connectivity; each group's
/// boundary is traced into an exterior ring plus any interior rings (dry
/// enclaves inside the flooded area become polygon holes). Cell corners are
/// mapped through the mask's affine transform, and the output collection
/// carries the mask's CRS. An all-false mask yields an empty collection.
pub fn vectorize_mask(mask: &FloodMask, params: &VectorizeParams) -> FeatureCollection {
    let (rows, cols) = mask.shape();
    let data = mask.view();
    let offsets = params.connectivity.offsets();

    // Group flooded cells into regions, row-major discovery order
    let mut region_of = vec![0u32; rows * cols];
    let mut regions: Vec<Vec<(usize, usize)>> = Vec::new();

    for row in 0..rows {
        for col in 0..cols {
            if !data[(row, col)] || region_of[row * cols + col] != 0 {
                continue;
            }

            let id = regions.len() as u32 + 1;
            let mut cells = Vec::new();
            let mut queue = VecDeque::new();

            region_of[row * cols + col] = id;
            queue.push_back((row, col));

            while let Some((r, c)) = queue.pop_front() {
                cells.push((r, c));
                for &(dr, dc) in offsets {
                    let nr = r as isize + dr;
                    let nc = c as isize + dc;
                    if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                        continue;
                    }
                    let (nr, nc) = (nr as usize, nc as usize);
                    if data[(nr, nc)] && region_of[nr * cols + nc] == 0 {
                        region_of[nr * cols + nc] = id;
                        queue.push_back((nr, nc));
                    }
                }
            }

            cells.sort_unstable();
            regions.push(cells);
        }
    }

    let transform = *mask.transform();
    let polygons: Vec<Vec<Polygon<f64>>> = regions
        .par_iter()
        .map(|cells| region_polygons(cells, &data, &transform))
        .collect();

    let mut collection = FeatureCollection::new(mask.crs().clone());
    for polys in polygons {
        for poly in polys {
            let mut feature = Feature::new(Geometry::Polygon(poly));
            feature.set_property("value", AttributeValue::Int(1));
            collection.push(feature);
        }
    }
    collection
}

/// Trace the boundary of one region into polygons with holes
fn region_polygons(
    cells: &[(usize, usize)],
    data: &ndarray::ArrayView2<'_, bool>,
    transform: &coastrisk_core::GeoTransform,
) -> Vec<Polygon<f64>> {
    let (rows, cols) = data.dim();
    let wet = |r: i64, c: i64| -> bool {
        r >= 0 && c >= 0 && (r as usize) < rows && (c as usize) < cols && data[(r as usize, c as usize)]
    };

    // Boundary edges in deterministic order (cells sorted, fixed N/E/S/W
    // probe order). Interior is kept on the right of the walk direction.
    let mut edges: Vec<BoundaryEdge> = Vec::new();
    for &(r, c) in cells {
        let (r, c) = (r as i64, c as i64);
        if !wet(r - 1, c) {
            edges.push(BoundaryEdge { start: (r, c), dir: EAST });
        }
        if !wet(r, c + 1) {
            edges.push(BoundaryEdge { start: (r, c + 1), dir: SOUTH });
        }
        if !wet(r + 1, c) {
            edges.push(BoundaryEdge { start: (r + 1, c + 1), dir: WEST });
        }
        if !wet(r, c - 1) {
            edges.push(BoundaryEdge { start: (r + 1, c), dir: NORTH });
        }
    }

    let mut by_start: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (idx, edge) in edges.iter().enumerate() {
        by_start.entry(edge.start).or_default().push(idx);
    }

    // Chain edges into closed rings; at a pinch vertex prefer the sharpest
    // right turn, which keeps each ring simple instead of a figure eight
    let mut used = vec![false; edges.len()];
    let mut shells: Vec<(Vec<(i64, i64)>, f64)> = Vec::new();
    let mut holes: Vec<(Vec<(i64, i64)>, (i64, i64))> = Vec::new();

    for first in 0..edges.len() {
        if used[first] {
            continue;
        }

        let origin = edges[first].start;
        let dry = edges[first].dry_cell();
        let mut ring = vec![origin];
        let mut current = first;

        loop {
            used[current] = true;
            let vertex = edges[current].end();
            ring.push(vertex);

            if vertex == origin {
                break;
            }

            let incoming = edges[current].dir;
            let candidates = by_start.get(&vertex).map(Vec::as_slice).unwrap_or(&[]);
            let mut next = None;
            for turn in [1u8, 0, 3] {
                let want = (incoming + turn) % 4;
                if let Some(&idx) = candidates
                    .iter()
                    .find(|&&idx| !used[idx] && edges[idx].dir == want)
                {
                    next = Some(idx);
                    break;
                }
            }

            match next {
                Some(idx) => current = idx,
                // Boundary edge sets always close; bail defensively
                None => break,
            }
        }

        let area = ring_area(&ring);
        if area >= 0.0 {
            shells.push((ring, area));
        } else {
            holes.push((ring, dry));
        }
    }

    // Attach each hole to the shell containing its dry-side cell
    let shell_rings: Vec<Vec<(f64, f64)>> = shells
        .iter()
        .map(|(ring, _)| ring.iter().map(|&(r, c)| (c as f64, r as f64)).collect())
        .collect();

    let mut shell_holes: Vec<Vec<Vec<(i64, i64)>>> = vec![Vec::new(); shells.len()];
    for (ring, dry) in holes {
        let probe = (dry.1 as f64 + 0.5, dry.0 as f64 + 0.5);
        let owner = shell_rings
            .iter()
            .position(|shell| point_in_ring(probe.0, probe.1, shell));
        if let Some(idx) = owner {
            shell_holes[idx].push(ring);
        }
    }

    shells
        .into_iter()
        .zip(shell_holes)
        .map(|((shell, _), hole_rings)| {
            let exterior = lattice_to_geo(&shell, transform);
            let interiors = hole_rings
                .iter()
                .map(|ring| lattice_to_geo(ring, transform))
                .collect();
            Polygon::new(exterior, interiors)
        })
        .collect()
}

/// Signed shoelace area of a lattice ring in pixel space (x=col, y=row).
/// Positive for the exterior orientation produced by the edge walk.
fn ring_area(ring: &[(i64, i64)]) -> f64 {
    let mut sum = 0i64;
    for w in ring.windows(2) {
        let (r1, c1) = w[0];
        let (r2, c2) = w[1];
        sum += c1 * r2 - c2 * r1;
    }
    sum as f64 / 2.0
}

/// Even-odd point-in-ring test in pixel space
fn point_in_ring(x: f64, y: f64, ring: &[(f64, f64)]) -> bool {
    let mut inside = false;
    for w in ring.windows(2) {
        let (x1, y1) = w[0];
        let (x2, y2) = w[1];
        if (y1 > y) != (y2 > y) {
            let t = (y - y1) / (y2 - y1);
            if x < x1 + t * (x2 - x1) {
                inside = !inside;
            }
        }
    }
    inside
}

/// Map a lattice ring through the affine transform
fn lattice_to_geo(
    ring: &[(i64, i64)],
    transform: &coastrisk_core::GeoTransform,
) -> LineString<f64> {
    LineString::from(
        ring.iter()
            .map(|&(r, c)| transform.pixel_to_geo_corner(c as usize, r as usize))
            .collect::<Vec<_>>(),
    )
}
