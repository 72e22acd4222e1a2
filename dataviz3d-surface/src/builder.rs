//! Surface mesh builder
//!
//! [`MeshBuilder`] owns a [`SurfaceMesh`] and keeps it in sync with a
//! [`SampleGrid`]. A full build lays out the buffers for a window of the
//! grid; afterwards [`MeshBuilder::update_rows`] patches only the rows that
//! changed, which lets streaming height data skip full rebuilds.
//!
//! Positions are normalized into the plotting cube: on the column (x) and
//! row (z) axes the first sample of the window maps to `-1` and the last to
//! `+1`, and the value range maps onto `[-1, 1]` in y.

use crate::indices::{
    flat_cell_base, flat_gridline_indices, flat_indices, smooth_gridline_indices, smooth_indices,
    IndexSpan,
};
use crate::normals::{cell_normal, fill_cell_normals, fill_vertex_normals};
use crate::{SurfaceConfig, SurfaceMesh, SurfaceVertex, Topology};
use dataviz3d_core::{
    is_finite_point, Error, Point3f, Result, SampleGrid, ValueRange, Vector2f, Vector3f,
    VisibleWindow,
};
use std::ops::Range;

/// Maps sample coordinates into the plotting cube
#[derive(Debug, Clone, Copy)]
struct Normalizer {
    x_origin: f32,
    x_half_extent: f32,
    z_origin: f32,
    z_half_extent: f32,
    value_range: ValueRange,
}

impl Normalizer {
    /// Extents come from the first finite x of the window's first and last
    /// columns and the first finite z of its first and last rows, so a single
    /// bad corner sample only loses the cells around it.
    fn new(grid: &SampleGrid, window: &VisibleWindow, value_range: ValueRange) -> Result<Self> {
        let rows = window.start_row..=window.last_row();
        let columns = window.start_column..=window.last_column();

        let column_x = |column: usize| {
            rows.clone()
                .map(|row| grid.at(column, row).x)
                .find(|x| x.is_finite())
                .ok_or_else(|| {
                    Error::InvalidWindow(format!(
                        "column {} of {} has no finite x coordinate",
                        column, window
                    ))
                })
        };
        let row_z = |row: usize| {
            columns
                .clone()
                .map(|column| grid.at(column, row).z)
                .find(|z| z.is_finite())
                .ok_or_else(|| {
                    Error::InvalidWindow(format!("row {} of {} has no finite z coordinate", row, window))
                })
        };

        let x_origin = column_x(window.start_column)?;
        let x_last = column_x(window.last_column())?;
        let z_origin = row_z(window.start_row)?;
        let z_last = row_z(window.last_row())?;

        Ok(Self {
            x_origin,
            x_half_extent: (x_last - x_origin) / 2.0,
            z_origin,
            z_half_extent: (z_last - z_origin) / 2.0,
            value_range,
        })
    }

    #[inline]
    fn axis(value: f32, origin: f32, half_extent: f32) -> f32 {
        if half_extent == 0.0 {
            0.0
        } else {
            (value - origin) / half_extent - 1.0
        }
    }

    #[inline]
    fn position(&self, sample: &Point3f) -> Point3f {
        Point3f::new(
            Self::axis(sample.x, self.x_origin, self.x_half_extent),
            Self::axis(sample.y, self.value_range.min, self.value_range.span() / 2.0),
            Self::axis(sample.z, self.z_origin, self.z_half_extent),
        )
    }

    /// Gradient coordinate: only the height selects a texel
    #[inline]
    fn uv(&self, sample: &Point3f) -> Vector2f {
        let v = if sample.y.is_finite() {
            self.value_range.normalized(sample.y)
        } else {
            0.0
        };
        Vector2f::new(0.0, v)
    }
}

impl PartialEq for Normalizer {
    fn eq(&self, other: &Self) -> bool {
        let bits = |n: &Normalizer| {
            [
                n.x_origin.to_bits(),
                n.x_half_extent.to_bits(),
                n.z_origin.to_bits(),
                n.z_half_extent.to_bits(),
                n.value_range.min.to_bits(),
                n.value_range.max.to_bits(),
            ]
        };
        bits(self) == bits(other)
    }
}

/// What the current mesh was built from
#[derive(Debug, Clone, Copy, PartialEq)]
struct Layout {
    window: VisibleWindow,
    topology: Topology,
    normalizer: Normalizer,
}

/// Builds and incrementally updates surface meshes
#[derive(Debug, Default)]
pub struct MeshBuilder {
    config: SurfaceConfig,
    mesh: SurfaceMesh,
    /// Per-cell normals of the smooth topology, kept for row updates
    cell_normals: Vec<Option<Vector3f>>,
    layout: Option<Layout>,
}

impl MeshBuilder {
    /// Create a builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the given configuration
    pub fn with_config(config: SurfaceConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// The current mesh. Its contents are replaced by the next build or update.
    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    /// Window of the last full build
    pub fn window(&self) -> Option<VisibleWindow> {
        self.layout.map(|layout| layout.window)
    }

    /// Topology of the last full build
    pub fn topology(&self) -> Option<Topology> {
        self.layout.map(|layout| layout.topology)
    }

    /// Build with the configured default topology
    pub fn build(
        &mut self,
        grid: &SampleGrid,
        window: VisibleWindow,
        value_range: ValueRange,
    ) -> Result<&SurfaceMesh> {
        let topology = self.config.topology;
        self.build_full(grid, window, value_range, topology)
    }

    /// Rebuild every buffer for `window` of `grid`.
    ///
    /// Degenerate cells rasterize nothing: in flat topology their quads
    /// collapse to a point, but they still occupy their index slots so the
    /// index buffers stay a pure function of the window.
    pub fn build_full(
        &mut self,
        grid: &SampleGrid,
        window: VisibleWindow,
        value_range: ValueRange,
        topology: Topology,
    ) -> Result<&SurfaceMesh> {
        window.validate(grid)?;
        value_range.validate()?;
        if window.column_span < 2 || window.row_span < 2 {
            return Err(Error::InvalidWindow(format!(
                "{} has no cells, a surface needs at least 2x2 samples",
                window
            )));
        }

        let layout = Layout {
            window,
            topology,
            normalizer: Normalizer::new(grid, &window, value_range)?,
        };
        // A failed build below must not leave a half-valid layout behind
        self.layout = None;
        self.mesh.clear();
        self.mesh.topology = topology;

        match topology {
            Topology::Smooth => self.build_smooth(grid, &layout),
            Topology::Flat => self.build_flat(grid, &layout),
        }

        let span = IndexSpan::full(window.column_span, window.row_span);
        self.mesh.indices = self.index_buffer(topology, &window, span)?;
        self.mesh.grid_indices = if self.config.build_gridlines {
            self.gridline_buffer(topology, &window, span)?
        } else {
            Vec::new()
        };
        self.layout = Some(layout);

        log::debug!(
            "built {:?} surface for {}: {} vertices, {} triangles",
            topology,
            window,
            self.mesh.vertex_count(),
            self.mesh.triangle_count()
        );
        Ok(&self.mesh)
    }

    /// Recompute the grid rows `start_row..=end_row` in place.
    ///
    /// Positions and UVs of those rows are refreshed; in smooth topology the
    /// normals of the neighbouring rows are refreshed too since they average
    /// over the changed cells. Index buffers stay untouched.
    ///
    /// Returns the range of vertex indices whose contents changed.
    pub fn update_rows(
        &mut self,
        grid: &SampleGrid,
        start_row: usize,
        end_row: usize,
        value_range: ValueRange,
        topology: Topology,
    ) -> Result<Range<usize>> {
        let layout = self.layout.ok_or(Error::NotBuilt)?;
        let window = layout.window;

        if topology != layout.topology {
            return Err(Error::RebuildRequired(format!(
                "topology changed from {:?} to {:?}",
                layout.topology, topology
            )));
        }
        if value_range != layout.normalizer.value_range {
            return Err(Error::RebuildRequired(format!(
                "value range changed from {:?} to {:?}",
                layout.normalizer.value_range, value_range
            )));
        }
        window.validate(grid)?;
        if start_row > end_row || start_row < window.start_row || end_row > window.last_row() {
            return Err(Error::RowsOutsideWindow {
                start: start_row,
                end: end_row,
            });
        }
        if Normalizer::new(grid, &window, value_range)? != layout.normalizer {
            return Err(Error::RebuildRequired(
                "the x/z extent of the window changed".to_string(),
            ));
        }

        let first = start_row - window.start_row;
        let last = end_row - window.start_row;
        let dirty = match topology {
            Topology::Smooth => self.update_smooth_rows(grid, &layout, first, last),
            Topology::Flat => self.update_flat_rows(grid, &layout, first, last),
        };

        log::trace!(
            "updated rows {}..={} of {}, vertices {:?} dirty",
            start_row,
            end_row,
            window,
            dirty
        );
        Ok(dirty)
    }

    /// Re-derive the triangle index buffer for a sub-span of the built
    /// window without touching vertex data
    pub fn create_indices(&mut self, span: IndexSpan) -> Result<&[u32]> {
        let layout = self.layout.ok_or(Error::NotBuilt)?;
        self.mesh.indices = self.index_buffer(layout.topology, &layout.window, span)?;
        Ok(&self.mesh.indices)
    }

    /// Re-derive the gridline index buffer for a sub-span of the built window
    pub fn create_gridline_indices(&mut self, span: IndexSpan) -> Result<&[u32]> {
        let layout = self.layout.ok_or(Error::NotBuilt)?;
        self.mesh.grid_indices = self.gridline_buffer(layout.topology, &layout.window, span)?;
        Ok(&self.mesh.grid_indices)
    }

    /// Number of indices in the gridline buffer
    pub fn grid_index_count(&self) -> usize {
        self.mesh.grid_indices.len()
    }

    /// Interleaved vertices of the current mesh, ready for upload
    pub fn interleaved_vertices(&self) -> Vec<SurfaceVertex> {
        self.mesh.interleaved()
    }

    /// Rendered position of the sample at grid coordinates `(column, row)`
    pub fn vertex_at(&self, column: usize, row: usize) -> Result<Point3f> {
        let layout = self.layout.ok_or(Error::NotBuilt)?;
        let window = layout.window;
        if !window.contains(column, row) {
            return Err(Error::OutOfRange { column, row });
        }

        let local_column = column - window.start_column;
        let local_row = row - window.start_row;
        let index = match layout.topology {
            Topology::Smooth => local_row * window.column_span + local_column,
            Topology::Flat => {
                // Samples on the far edges belong to the last cell
                let cell_column = local_column.min(window.cell_columns() - 1);
                let cell_row = local_row.min(window.cell_rows() - 1);
                let corner = (local_column - cell_column) + 2 * (local_row - cell_row);
                flat_cell_base(window.cell_columns(), cell_column, cell_row) + corner
            }
        };
        Ok(self.mesh.positions[index])
    }

    fn index_buffer(&self, topology: Topology, window: &VisibleWindow, span: IndexSpan) -> Result<Vec<u32>> {
        match topology {
            Topology::Smooth => smooth_indices(window.column_span, window.row_span, span),
            Topology::Flat => flat_indices(window.column_span, window.row_span, span),
        }
    }

    fn gridline_buffer(&self, topology: Topology, window: &VisibleWindow, span: IndexSpan) -> Result<Vec<u32>> {
        match topology {
            Topology::Smooth => smooth_gridline_indices(window.column_span, window.row_span, span),
            Topology::Flat => flat_gridline_indices(window.column_span, window.row_span, span),
        }
    }

    fn parallel(&self, rows: usize) -> bool {
        rows >= self.config.parallel_row_threshold
    }

    fn build_smooth(&mut self, grid: &SampleGrid, layout: &Layout) {
        let window = layout.window;
        let total = window.sample_count();

        self.mesh.positions.resize(total, Point3f::origin());
        self.mesh.uvs.resize(total, Vector2f::zeros());
        self.mesh.normals.resize(total, Vector3f::y());
        self.cell_normals.clear();
        self.cell_normals.resize(window.cell_columns() * window.cell_rows(), None);

        self.fill_smooth_positions(grid, layout, 0..window.row_span);
        self.refresh_smooth_normals(&window, 0..window.cell_rows(), 0..window.row_span);

        let skipped = self.cell_normals.iter().filter(|n| n.is_none()).count();
        if skipped > 0 {
            log::warn!(
                "{} of {} surface cells in {} are degenerate and excluded from normals",
                skipped,
                self.cell_normals.len(),
                window
            );
        }
    }

    fn update_smooth_rows(&mut self, grid: &SampleGrid, layout: &Layout, first: usize, last: usize) -> Range<usize> {
        let window = layout.window;
        self.fill_smooth_positions(grid, layout, first..last + 1);

        // Cells touching the changed rows, then every vertex touching those cells
        let cell_rows = first.saturating_sub(1)..(last + 1).min(window.cell_rows());
        let vertex_rows = first.saturating_sub(1)..(last + 2).min(window.row_span);
        self.refresh_smooth_normals(&window, cell_rows, vertex_rows.clone());

        vertex_rows.start * window.column_span..vertex_rows.end * window.column_span
    }

    fn fill_smooth_positions(&mut self, grid: &SampleGrid, layout: &Layout, rows: Range<usize>) {
        let window = layout.window;
        for row in rows {
            for column in 0..window.column_span {
                let sample = grid.at(window.start_column + column, window.start_row + row);
                let index = row * window.column_span + column;
                self.mesh.positions[index] = layout.normalizer.position(&sample);
                self.mesh.uvs[index] = layout.normalizer.uv(&sample);
            }
        }
    }

    fn refresh_smooth_normals(&mut self, window: &VisibleWindow, cell_rows: Range<usize>, vertex_rows: Range<usize>) {
        let parallel = self.parallel(vertex_rows.len());
        fill_cell_normals(
            &mut self.cell_normals,
            &self.mesh.positions,
            window.column_span,
            cell_rows,
            parallel,
        );
        fill_vertex_normals(
            &mut self.mesh.normals,
            &self.cell_normals,
            window.column_span,
            window.row_span,
            vertex_rows,
            parallel,
        );
    }

    fn build_flat(&mut self, grid: &SampleGrid, layout: &Layout) {
        let window = layout.window;
        let total = 4 * window.cell_columns() * window.cell_rows();

        self.mesh.positions.resize(total, Point3f::origin());
        self.mesh.uvs.resize(total, Vector2f::zeros());
        self.mesh.normals.resize(total, Vector3f::zeros());
        self.cell_normals.clear();

        let skipped = self.fill_flat_cells(grid, layout, 0..window.cell_rows());
        if skipped > 0 {
            log::warn!(
                "skipped {} of {} degenerate surface cells in {}",
                skipped,
                window.cell_columns() * window.cell_rows(),
                window
            );
        }
    }

    fn update_flat_rows(&mut self, grid: &SampleGrid, layout: &Layout, first: usize, last: usize) -> Range<usize> {
        let window = layout.window;
        let cell_rows = first.saturating_sub(1)..(last + 1).min(window.cell_rows());
        let skipped = self.fill_flat_cells(grid, layout, cell_rows.clone());
        if skipped > 0 {
            log::debug!("skipped {} degenerate cells in rows {}..={}", skipped, first, last);
        }

        let stride = 4 * window.cell_columns();
        cell_rows.start * stride..cell_rows.end * stride
    }

    /// Lay out the quads of `cell_rows`; returns how many cells were skipped
    fn fill_flat_cells(&mut self, grid: &SampleGrid, layout: &Layout, cell_rows: Range<usize>) -> usize {
        let window = layout.window;
        let cell_columns = window.cell_columns();
        let mut skipped = 0;

        for cell_row in cell_rows {
            for cell_column in 0..cell_columns {
                let column = window.start_column + cell_column;
                let row = window.start_row + cell_row;
                let samples = [
                    grid.at(column, row),
                    grid.at(column + 1, row),
                    grid.at(column, row + 1),
                    grid.at(column + 1, row + 1),
                ];
                let corners = samples.map(|sample| layout.normalizer.position(&sample));
                let base = flat_cell_base(cell_columns, cell_column, cell_row);

                match cell_normal(&corners[0], &corners[1], &corners[2], &corners[3]) {
                    Some(normal) => {
                        for corner in 0..4 {
                            self.mesh.positions[base + corner] = corners[corner];
                            self.mesh.normals[base + corner] = normal;
                            self.mesh.uvs[base + corner] = layout.normalizer.uv(&samples[corner]);
                        }
                    }
                    None => {
                        // Collapse the quad to one point: zero-area triangles rasterize nothing
                        let anchor = corners
                            .iter()
                            .copied()
                            .find(is_finite_point)
                            .unwrap_or_else(Point3f::origin);
                        for corner in 0..4 {
                            self.mesh.positions[base + corner] = anchor;
                            self.mesh.normals[base + corner] = Vector3f::zeros();
                            self.mesh.uvs[base + corner] = Vector2f::zeros();
                        }
                        skipped += 1;
                    }
                }
            }
        }
        skipped
    }
}
