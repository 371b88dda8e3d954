//! Error types shared across the workspace

use thiserror::Error;

/// Main error type for coastal-risk operations.
///
/// Inputs are validated before any computation starts; a returned error
/// implies no partial mutation of any output.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid grid dimensions: {rows} rows x {cols} cols")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("index out of bounds: ({row}, {col}) in grid of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("grid shape mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    ShapeMismatch {
        er: usize,
        ec: usize,
        ar: usize,
        ac: usize,
    },

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("missing or unresolvable CRS: {0}")]
    MissingCrs(String),

    #[error("CRS mismatch: {0} vs {1}")]
    CrsMismatch(String, String),

    #[error("non-finite input: {name} = {value}")]
    NonFiniteInput { name: &'static str, value: f64 },

    #[error("operation cancelled")]
    Cancelled,
}

/// Result type alias for coastal-risk operations
pub type Result<T> = std::result::Result<T, Error>;
