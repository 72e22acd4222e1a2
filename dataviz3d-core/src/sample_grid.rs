//! Sample grids, visible windows and value ranges
//!
//! A [`SampleGrid`] is the immutable snapshot a data proxy hands to the
//! surface mesh builder. Samples are `(x, y, z)` points where `y` is the
//! plotted height; columns advance along `x` and rows along `z`.

use crate::{Error, Point3f, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row-major grid of 3D samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleGrid {
    columns: usize,
    rows: usize,
    samples: Vec<Point3f>,
}

impl SampleGrid {
    /// Create a grid from nested rows, validating that it is rectangular and non-empty
    pub fn from_rows(rows: Vec<Vec<Point3f>>) -> Result<Self> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || columns == 0 {
            return Err(Error::EmptyGrid);
        }

        let mut samples = Vec::with_capacity(columns * rows.len());
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(Error::RaggedGrid {
                    row: index,
                    expected: columns,
                    found: row.len(),
                });
            }
            samples.extend_from_slice(row);
        }

        Ok(Self {
            columns,
            rows: rows.len(),
            samples,
        })
    }

    /// Create a grid by evaluating `f(column, row)` for every sample
    pub fn from_fn<F>(columns: usize, rows: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> Point3f,
    {
        if columns == 0 || rows == 0 {
            return Err(Error::EmptyGrid);
        }

        let mut samples = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            for column in 0..columns {
                samples.push(f(column, row));
            }
        }

        Ok(Self {
            columns,
            rows,
            samples,
        })
    }

    /// Number of samples per row
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Sample at grid coordinates (with bounds checking)
    pub fn get(&self, column: usize, row: usize) -> Option<&Point3f> {
        if column < self.columns && row < self.rows {
            self.samples.get(row * self.columns + column)
        } else {
            None
        }
    }

    /// Sample at grid coordinates.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the grid.
    #[inline]
    pub fn at(&self, column: usize, row: usize) -> Point3f {
        assert!(
            column < self.columns && row < self.rows,
            "sample ({}, {}) outside {}x{} grid",
            column,
            row,
            self.columns,
            self.rows
        );
        self.samples[row * self.columns + column]
    }

    /// All samples of one row
    pub fn row(&self, row: usize) -> Option<&[Point3f]> {
        if row < self.rows {
            let start = row * self.columns;
            Some(&self.samples[start..start + self.columns])
        } else {
            None
        }
    }

    /// Mutable access to one row, used by data proxies that stream new values
    pub fn row_mut(&mut self, row: usize) -> Option<&mut [Point3f]> {
        if row < self.rows {
            let start = row * self.columns;
            Some(&mut self.samples[start..start + self.columns])
        } else {
            None
        }
    }

    /// Window covering the whole grid
    pub fn full_window(&self) -> VisibleWindow {
        VisibleWindow::new(0, 0, self.columns, self.rows)
    }

    /// Smallest and largest finite height in the grid
    pub fn height_range(&self) -> Option<ValueRange> {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for sample in &self.samples {
            if sample.y.is_finite() {
                min = min.min(sample.y);
                max = max.max(sample.y);
            }
        }
        (min <= max).then(|| ValueRange::new(min, max))
    }
}

/// Sub-rectangle of a [`SampleGrid`] selected for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisibleWindow {
    pub start_column: usize,
    pub start_row: usize,
    pub column_span: usize,
    pub row_span: usize,
}

impl VisibleWindow {
    pub const fn new(start_column: usize, start_row: usize, column_span: usize, row_span: usize) -> Self {
        Self {
            start_column,
            start_row,
            column_span,
            row_span,
        }
    }

    /// Last column inside the window (inclusive)
    pub fn last_column(&self) -> usize {
        self.start_column + self.column_span.saturating_sub(1)
    }

    /// Last row inside the window (inclusive)
    pub fn last_row(&self) -> usize {
        self.start_row + self.row_span.saturating_sub(1)
    }

    /// Number of grid cells along the columns
    pub fn cell_columns(&self) -> usize {
        self.column_span.saturating_sub(1)
    }

    /// Number of grid cells along the rows
    pub fn cell_rows(&self) -> usize {
        self.row_span.saturating_sub(1)
    }

    /// Number of samples inside the window
    pub fn sample_count(&self) -> usize {
        self.column_span * self.row_span
    }

    /// Whether the grid coordinate lies inside the window
    pub fn contains(&self, column: usize, row: usize) -> bool {
        column >= self.start_column
            && row >= self.start_row
            && column < self.start_column + self.column_span
            && row < self.start_row + self.row_span
    }

    /// Check that the window is non-empty and fits inside `grid`
    pub fn validate(&self, grid: &SampleGrid) -> Result<()> {
        if self.column_span == 0 || self.row_span == 0 {
            return Err(Error::InvalidWindow(format!("{} has zero size", self)));
        }
        if self.start_column + self.column_span > grid.columns()
            || self.start_row + self.row_span > grid.rows()
        {
            return Err(Error::WindowOutsideGrid {
                window: self.to_string(),
                columns: grid.columns(),
                rows: grid.rows(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for VisibleWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "window(col {}, row {}, {}x{})",
            self.start_column, self.start_row, self.column_span, self.row_span
        )
    }
}

/// Range of the plotted height axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Distance between `min` and `max`
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Reject ranges that would divide by zero or propagate NaN
    pub fn validate(&self) -> Result<()> {
        let span = self.span();
        if !self.min.is_finite() || !self.max.is_finite() || span == 0.0 || !span.is_finite() {
            return Err(Error::InvalidValueRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Position of `value` inside the range, clamped to `[0, 1]`
    #[inline]
    pub fn normalized(&self, value: f32) -> f32 {
        ((value - self.min) / self.span()).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(columns: usize, rows: usize) -> SampleGrid {
        SampleGrid::from_fn(columns, rows, |c, r| {
            Point3f::new(c as f32, (c + r) as f32, r as f32)
        })
        .unwrap()
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![
            vec![Point3f::origin(), Point3f::origin()],
            vec![Point3f::origin()],
        ];
        assert_eq!(
            SampleGrid::from_rows(rows),
            Err(Error::RaggedGrid {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_from_rows_rejects_empty() {
        assert_eq!(SampleGrid::from_rows(vec![]), Err(Error::EmptyGrid));
        assert_eq!(SampleGrid::from_rows(vec![vec![]]), Err(Error::EmptyGrid));
    }

    #[test]
    fn test_grid_access() {
        let grid = ramp(4, 3);
        assert_eq!(grid.columns(), 4);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.at(2, 1), Point3f::new(2.0, 3.0, 1.0));
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.row(2).map(<[Point3f]>::len), Some(4));
    }

    #[test]
    fn test_window_validation() {
        let grid = ramp(4, 3);
        assert!(grid.full_window().validate(&grid).is_ok());
        assert!(VisibleWindow::new(1, 1, 3, 2).validate(&grid).is_ok());
        assert!(matches!(
            VisibleWindow::new(0, 0, 0, 2).validate(&grid),
            Err(Error::InvalidWindow(_))
        ));
        assert!(matches!(
            VisibleWindow::new(2, 0, 3, 2).validate(&grid),
            Err(Error::WindowOutsideGrid { .. })
        ));
    }

    #[test]
    fn test_window_bounds() {
        let window = VisibleWindow::new(2, 3, 4, 5);
        assert_eq!(window.last_column(), 5);
        assert_eq!(window.last_row(), 7);
        assert_eq!(window.cell_columns(), 3);
        assert_eq!(window.cell_rows(), 4);
        assert!(window.contains(5, 7));
        assert!(!window.contains(6, 7));
        assert!(!window.contains(1, 3));
    }

    #[test]
    fn test_value_range() {
        let range = ValueRange::new(-2.0, 2.0);
        assert!(range.validate().is_ok());
        assert_relative_eq!(range.normalized(0.0), 0.5);
        assert_relative_eq!(range.normalized(10.0), 1.0);
        assert_relative_eq!(range.normalized(-10.0), 0.0);
        assert!(ValueRange::new(1.0, 1.0).validate().is_err());
        assert!(ValueRange::new(f32::NAN, 1.0).validate().is_err());
    }

    #[test]
    fn test_height_range() {
        let grid = ramp(3, 3);
        assert_eq!(grid.height_range(), Some(ValueRange::new(0.0, 4.0)));
    }
}
