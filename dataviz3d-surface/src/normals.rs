//! Cell and vertex normal computation
//!
//! A cell is the quad spanned by four neighbouring samples:
//!
//! ```text
//! p00 ---- p01      column + 1 →
//!  |        |
//! p10 ---- p11      row + 1 ↓
//! ```
//!
//! Its normal is the cross product of the two diagonals, oriented towards
//! the +Y side of a height field whose columns grow along +X and rows along +Z.

use dataviz3d_core::{is_finite_point, Point3f, Vector3f};
use rayon::prelude::*;
use std::ops::Range;

/// Squared length below which a cross product counts as zero area
const DEGENERATE_EPSILON: f32 = 1e-12;

/// Unit normal of a cell, `None` for non-finite or zero-area cells
#[inline]
pub fn cell_normal(p00: &Point3f, p01: &Point3f, p10: &Point3f, p11: &Point3f) -> Option<Vector3f> {
    if !(is_finite_point(p00) && is_finite_point(p01) && is_finite_point(p10) && is_finite_point(p11)) {
        return None;
    }

    let normal = (p10 - p01).cross(&(p11 - p00));
    let length_squared = normal.norm_squared();
    if length_squared.is_finite() && length_squared > DEGENERATE_EPSILON {
        Some(normal / length_squared.sqrt())
    } else {
        None
    }
}

/// Average of the unit normals of the cells around vertex `(column, row)`.
///
/// Boundary vertices only see the cells that exist. A vertex without any
/// valid neighbouring cell, or whose neighbours cancel out, points up.
pub fn vertex_normal(
    cell_normals: &[Option<Vector3f>],
    cell_columns: usize,
    cell_rows: usize,
    column: usize,
    row: usize,
) -> Vector3f {
    let mut sum = Vector3f::zeros();

    let rows = row.saturating_sub(1)..(row + 1).min(cell_rows);
    for cell_row in rows {
        let columns = column.saturating_sub(1)..(column + 1).min(cell_columns);
        for cell_column in columns {
            if let Some(normal) = cell_normals[cell_row * cell_columns + cell_column] {
                sum += normal;
            }
        }
    }

    let length_squared = sum.norm_squared();
    if length_squared > DEGENERATE_EPSILON {
        sum / length_squared.sqrt()
    } else {
        Vector3f::y()
    }
}

/// Recompute cell normals for the cell rows in `cell_row_range` of a
/// shared-vertex grid with `columns` vertices per row
pub fn fill_cell_normals(
    cell_normals: &mut [Option<Vector3f>],
    positions: &[Point3f],
    columns: usize,
    cell_row_range: Range<usize>,
    parallel: bool,
) {
    let cell_columns = columns - 1;
    let start = cell_row_range.start * cell_columns;
    let end = cell_row_range.end * cell_columns;
    let first_row = cell_row_range.start;

    let fill_row = |(offset, out): (usize, &mut [Option<Vector3f>])| {
        let row = first_row + offset;
        let top = row * columns;
        let bottom = top + columns;
        for (column, normal) in out.iter_mut().enumerate() {
            *normal = cell_normal(
                &positions[top + column],
                &positions[top + column + 1],
                &positions[bottom + column],
                &positions[bottom + column + 1],
            );
        }
    };

    let target = &mut cell_normals[start..end];
    if parallel {
        target.par_chunks_mut(cell_columns).enumerate().for_each(fill_row);
    } else {
        target.chunks_mut(cell_columns).enumerate().for_each(fill_row);
    }
}

/// Recompute vertex normals for the vertex rows in `row_range`
pub fn fill_vertex_normals(
    normals: &mut [Vector3f],
    cell_normals: &[Option<Vector3f>],
    columns: usize,
    rows: usize,
    row_range: Range<usize>,
    parallel: bool,
) {
    let cell_columns = columns - 1;
    let cell_rows = rows - 1;
    let first_row = row_range.start;

    let fill_row = |(offset, out): (usize, &mut [Vector3f])| {
        let row = first_row + offset;
        for (column, normal) in out.iter_mut().enumerate() {
            *normal = vertex_normal(cell_normals, cell_columns, cell_rows, column, row);
        }
    };

    let target = &mut normals[row_range.start * columns..row_range.end * columns];
    if parallel {
        target.par_chunks_mut(columns).enumerate().for_each(fill_row);
    } else {
        target.chunks_mut(columns).enumerate().for_each(fill_row);
    }
}
