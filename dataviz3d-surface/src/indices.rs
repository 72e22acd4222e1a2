//! Index buffer generation
//!
//! All functions here are pure: they depend only on the span and the
//! stride of the vertex grid they index into. Spans use inclusive vertex
//! coordinates relative to the built window, so a span from `(0, 0)` to
//! `(columns - 1, rows - 1)` covers every cell.
//!
//! Triangles are wound counter-clockwise when seen from the +Y side:
//! `(p00, p10, p01)` and `(p01, p10, p11)`.

use dataviz3d_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Inclusive span of vertex-grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexSpan {
    pub start_column: usize,
    pub start_row: usize,
    pub end_column: usize,
    pub end_row: usize,
}

impl IndexSpan {
    pub const fn new(start_column: usize, start_row: usize, end_column: usize, end_row: usize) -> Self {
        Self {
            start_column,
            start_row,
            end_column,
            end_row,
        }
    }

    /// Span covering a whole `columns` x `rows` vertex grid
    pub const fn full(columns: usize, rows: usize) -> Self {
        Self::new(0, 0, columns.saturating_sub(1), rows.saturating_sub(1))
    }

    /// Number of cells along the columns
    pub fn cell_columns(&self) -> usize {
        self.end_column - self.start_column
    }

    /// Number of cells along the rows
    pub fn cell_rows(&self) -> usize {
        self.end_row - self.start_row
    }

    fn validate(&self, columns: usize, rows: usize) -> Result<()> {
        if self.start_column > self.end_column || self.start_row > self.end_row {
            return Err(Error::InvalidWindow(format!("inverted index span {:?}", self)));
        }
        if self.end_column >= columns || self.end_row >= rows {
            return Err(Error::InvalidWindow(format!(
                "index span {:?} exceeds {}x{} vertex grid",
                self, columns, rows
            )));
        }
        Ok(())
    }
}

/// Triangle list for a shared-vertex grid with `columns` x `rows` vertices
pub fn smooth_indices(columns: usize, rows: usize, span: IndexSpan) -> Result<Vec<u32>> {
    span.validate(columns, rows)?;

    let mut indices = Vec::with_capacity(span.cell_columns() * span.cell_rows() * 6);
    for row in span.start_row..span.end_row {
        for column in span.start_column..span.end_column {
            let i0 = (row * columns + column) as u32;
            let i1 = i0 + 1;
            let i2 = i0 + columns as u32;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }
    Ok(indices)
}

/// Line list for a shared-vertex grid: every row and column segment once
pub fn smooth_gridline_indices(columns: usize, rows: usize, span: IndexSpan) -> Result<Vec<u32>> {
    span.validate(columns, rows)?;

    let horizontal = (span.cell_rows() + 1) * span.cell_columns();
    let vertical = (span.cell_columns() + 1) * span.cell_rows();
    let mut indices = Vec::with_capacity((horizontal + vertical) * 2);

    for row in span.start_row..=span.end_row {
        for column in span.start_column..span.end_column {
            let i = (row * columns + column) as u32;
            indices.extend_from_slice(&[i, i + 1]);
        }
    }
    for column in span.start_column..=span.end_column {
        for row in span.start_row..span.end_row {
            let i = (row * columns + column) as u32;
            indices.extend_from_slice(&[i, i + columns as u32]);
        }
    }
    Ok(indices)
}

/// Base vertex of a cell in a flat mesh, whose cells store
/// `p00, p01, p10, p11` consecutively
#[inline]
pub fn flat_cell_base(cell_columns: usize, cell_column: usize, cell_row: usize) -> usize {
    4 * (cell_row * cell_columns + cell_column)
}

/// Triangle list for a flat mesh built from a `columns` x `rows` vertex grid
pub fn flat_indices(columns: usize, rows: usize, span: IndexSpan) -> Result<Vec<u32>> {
    span.validate(columns, rows)?;

    let cell_columns = columns - 1;
    let mut indices = Vec::with_capacity(span.cell_columns() * span.cell_rows() * 6);
    for row in span.start_row..span.end_row {
        for column in span.start_column..span.end_column {
            let b = flat_cell_base(cell_columns, column, row) as u32;
            indices.extend_from_slice(&[b, b + 2, b + 1, b + 1, b + 2, b + 3]);
        }
    }
    Ok(indices)
}

/// Line list for a flat mesh. Interior edges are emitted once, by the
/// cell above or to the left of them.
pub fn flat_gridline_indices(columns: usize, rows: usize, span: IndexSpan) -> Result<Vec<u32>> {
    span.validate(columns, rows)?;

    let cell_columns = columns - 1;
    let mut indices = Vec::new();
    for row in span.start_row..span.end_row {
        for column in span.start_column..span.end_column {
            let b = flat_cell_base(cell_columns, column, row) as u32;
            // top and left edge
            indices.extend_from_slice(&[b, b + 1, b, b + 2]);
            if column + 1 == span.end_column {
                indices.extend_from_slice(&[b + 1, b + 3]);
            }
            if row + 1 == span.end_row {
                indices.extend_from_slice(&[b + 2, b + 3]);
            }
        }
    }
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_indices_single_cell() {
        let indices = smooth_indices(2, 2, IndexSpan::full(2, 2)).unwrap();
        assert_eq!(indices, vec![0, 2, 1, 1, 2, 3]);
    }

    #[test]
    fn test_smooth_indices_sub_span_uses_stride() {
        // 4x3 grid, only the cell at column 2, row 1
        let indices = smooth_indices(4, 3, IndexSpan::new(2, 1, 3, 2)).unwrap();
        assert_eq!(indices, vec![6, 10, 7, 7, 10, 11]);
    }

    #[test]
    fn test_smooth_indices_counts_and_bounds() {
        let (columns, rows) = (5, 4);
        let indices = smooth_indices(columns, rows, IndexSpan::full(columns, rows)).unwrap();
        assert_eq!(indices.len(), 4 * 3 * 6);
        assert!(indices.iter().all(|&i| (i as usize) < columns * rows));
    }

    #[test]
    fn test_smooth_gridlines() {
        let lines = smooth_gridline_indices(3, 2, IndexSpan::full(3, 2)).unwrap();
        // 2 rows x 2 segments + 3 columns x 1 segment
        assert_eq!(lines.len(), (4 + 3) * 2);
        assert_eq!(&lines[..4], &[0, 1, 1, 2]);
        assert_eq!(&lines[8..10], &[0, 3]);
    }

    #[test]
    fn test_flat_indices() {
        let indices = flat_indices(3, 2, IndexSpan::full(3, 2)).unwrap();
        assert_eq!(indices, vec![0, 2, 1, 1, 2, 3, 4, 6, 5, 5, 6, 7]);
    }

    #[test]
    fn test_flat_gridlines_close_the_border() {
        // 2x2 cells: 12 unique edges
        let lines = flat_gridline_indices(3, 3, IndexSpan::full(3, 3)).unwrap();
        assert_eq!(lines.len(), 12 * 2);
        assert!(lines.iter().all(|&i| (i as usize) < 4 * 4));
    }

    #[test]
    fn test_invalid_spans() {
        assert!(smooth_indices(3, 3, IndexSpan::new(2, 0, 1, 2)).is_err());
        assert!(smooth_indices(3, 3, IndexSpan::new(0, 0, 3, 2)).is_err());
        assert!(flat_gridline_indices(3, 3, IndexSpan::new(0, 0, 2, 3)).is_err());
    }

    #[test]
    fn test_degenerate_span_is_empty() {
        let indices = smooth_indices(3, 3, IndexSpan::new(1, 1, 1, 2)).unwrap();
        assert!(indices.is_empty());
    }
}
