//! Surface builder configuration

use serde::{Deserialize, Serialize};

/// Vertex layout of a surface mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Topology {
    /// One shared vertex per sample, normals averaged over neighbouring cells
    #[default]
    Smooth,
    /// Four unique vertices per cell sharing the cell normal
    Flat,
}

/// Configuration for [`MeshBuilder`](crate::MeshBuilder)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Topology used by [`MeshBuilder::build`](crate::MeshBuilder::build)
    pub topology: Topology,
    /// Row count from which normals are computed on the rayon thread pool
    pub parallel_row_threshold: usize,
    /// Generate the gridline index buffer together with the triangles
    pub build_gridlines: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            topology: Topology::Smooth,
            parallel_row_threshold: 128,
            build_gridlines: true,
        }
    }
}

impl SurfaceConfig {
    /// Set the default topology
    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    /// Set the row count from which normal computation goes parallel.
    /// `usize::MAX` keeps everything on the calling thread.
    pub fn with_parallel_row_threshold(mut self, rows: usize) -> Self {
        self.parallel_row_threshold = rows;
        self
    }

    /// Enable or disable gridline generation
    pub fn with_gridlines(mut self, enabled: bool) -> Self {
        self.build_gridlines = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_config_default() {
        let config = SurfaceConfig::default();
        assert_eq!(config.topology, Topology::Smooth);
        assert_eq!(config.parallel_row_threshold, 128);
        assert!(config.build_gridlines);
    }

    #[test]
    fn test_surface_config_builders() {
        let config = SurfaceConfig::default()
            .with_topology(Topology::Flat)
            .with_parallel_row_threshold(usize::MAX)
            .with_gridlines(false);
        assert_eq!(config.topology, Topology::Flat);
        assert_eq!(config.parallel_row_threshold, usize::MAX);
        assert!(!config.build_gridlines);
    }
}
