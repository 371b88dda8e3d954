//! Georeferenced grid type

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::raster::GeoTransform;
use ndarray::{Array2, ArrayView2};
use std::fmt::Debug;

/// Trait for types that can be stored in a grid cell.
///
/// Unlike a general raster library the flood pipeline stores booleans as
/// well as elevations, so no numeric bounds are required here.
pub trait GridElement: Copy + Clone + Debug + PartialEq + Send + Sync + 'static {}

impl GridElement for bool {}
impl GridElement for u8 {}
impl GridElement for u32 {}
impl GridElement for i32 {}
impl GridElement for f32 {}
impl GridElement for f64 {}

/// A georeferenced 2D grid.
///
/// Stores values of type `T` in row-major order together with the affine
/// transform and the coordinate reference system the grid lives in. Both are
/// mandatory: every grid can answer "where is cell (row, col)" without
/// consulting ambient state.
///
/// Construction enforces the grid invariants: at least one row and one
/// column, and an invertible transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T: GridElement> {
    data: Array2<T>,
    transform: GeoTransform,
    crs: Crs,
}

impl<T: GridElement> Grid<T> {
    /// Create a grid filled with a single value
    pub fn from_elem(
        rows: usize,
        cols: usize,
        value: T,
        transform: GeoTransform,
        crs: Crs,
    ) -> Result<Self> {
        Self::from_array(Array2::from_elem((rows, cols), value), transform, crs)
    }

    /// Create a grid from row-major data
    pub fn from_vec(
        data: Vec<T>,
        rows: usize,
        cols: usize,
        transform: GeoTransform,
        crs: Crs,
    ) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions { rows, cols });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|_| Error::InvalidDimensions { rows, cols })?;

        Self::from_array(array, transform, crs)
    }

    /// Create a grid from an existing array
    pub fn from_array(data: Array2<T>, transform: GeoTransform, crs: Crs) -> Result<Self> {
        let (rows, cols) = data.dim();
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        if !transform.is_invertible() {
            return Err(Error::InvalidGeometry(
                "affine transform is not invertible".to_string(),
            ));
        }

        Ok(Self {
            data,
            transform,
            crs,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid has no cells (never true for a validly constructed grid)
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set the value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let (rows, cols) = self.shape();
        match self.data.get_mut((row, col)) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds {
                row,
                col,
                rows,
                cols,
            }),
        }
    }

    /// View of the underlying data
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    /// Reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    /// Consume the grid and return the underlying array
    pub fn into_array(self) -> Array2<T> {
        self.data
    }

    /// The affine transform
    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// The coordinate reference system
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    /// Cell size (assumes square cells)
    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }

    /// Geographic bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols(), self.rows())
    }

    /// Map coordinates of the center of cell (row, col)
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.transform.pixel_to_geo(col, row)
    }

    /// Fractional pixel coordinates (col, row) of a map coordinate
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        self.transform.geo_to_pixel(x, y)
    }

    /// Elementwise map to a new grid with the same georeferencing.
    ///
    /// Infallible: the shape and transform are inherited from a grid that
    /// already satisfies the construction invariants.
    pub fn map<U: GridElement>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            data: self.data.map(|&v| f(v)),
            transform: self.transform,
            crs: self.crs.clone(),
        }
    }

    /// Check that another grid has the same shape
    pub fn ensure_same_shape<U: GridElement>(&self, other: &Grid<U>) -> Result<()> {
        if self.shape() != other.shape() {
            let (er, ec) = self.shape();
            let (ar, ac) = other.shape();
            return Err(Error::ShapeMismatch { er, ec, ar, ac });
        }
        Ok(())
    }
}

impl Grid<bool> {
    /// Number of true cells
    pub fn count_true(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Whether any cell is true
    pub fn any(&self) -> bool {
        self.data.iter().any(|&v| v)
    }
}

impl Grid<f64> {
    /// Maximum finite cell value, if any
    pub fn max_value(&self) -> Option<f64> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }
}
