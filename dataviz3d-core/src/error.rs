//! Error types for dataviz3d

use thiserror::Error;

/// Main error type for dataviz3d operations
///
/// Every variant is a caller contract violation: the mesh builder and the
/// scene never clamp bad input into something renderable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Sample grid is empty")]
    EmptyGrid,

    #[error("Sample grid row {row} has {found} columns, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Window {window} lies outside the {columns}x{rows} sample grid")]
    WindowOutsideGrid {
        window: String,
        columns: usize,
        rows: usize,
    },

    #[error("Invalid value range: min {min}, max {max}")]
    InvalidValueRange { min: f32, max: f32 },

    #[error("Grid coordinate ({column}, {row}) is outside the built window")]
    OutOfRange { column: usize, row: usize },

    #[error("No mesh has been built yet")]
    NotBuilt,

    #[error("Rows {start}..={end} are outside the built window")]
    RowsOutsideWindow { start: usize, end: usize },

    #[error("Full rebuild required: {0}")]
    RebuildRequired(String),
}

/// Result type alias for dataviz3d operations
pub type Result<T> = std::result::Result<T, Error>;
