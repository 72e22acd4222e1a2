//! Surface mesh buffers

use crate::{SurfaceVertex, Topology};
use dataviz3d_core::{Point3f, Vector2f, Vector3f};
use std::ops::Range;

/// GPU-ready buffers of a surface plot.
///
/// Owned by [`MeshBuilder`](crate::MeshBuilder) and reused across builds.
/// Renderers borrow it between two builder calls.
#[derive(Debug, Clone, Default)]
pub struct SurfaceMesh {
    pub topology: Topology,
    pub positions: Vec<Point3f>,
    pub normals: Vec<Vector3f>,
    /// Gradient texture coordinates, `u` is always 0
    pub uvs: Vec<Vector2f>,
    /// Triangle list
    pub indices: Vec<u32>,
    /// Line list over the same vertices
    pub grid_indices: Vec<u32>,
}

impl SurfaceMesh {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// Interleave the vertex attributes for upload
    pub fn interleaved(&self) -> Vec<SurfaceVertex> {
        self.interleaved_range(0..self.positions.len())
    }

    /// Interleave a sub-range of vertices, typically the dirty range of a row update
    pub fn interleaved_range(&self, range: Range<usize>) -> Vec<SurfaceVertex> {
        range
            .map(|i| SurfaceVertex::new(&self.positions[i], &self.normals[i], &self.uvs[i]))
            .collect()
    }

    /// Triangle indices as raw bytes
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Gridline indices as raw bytes
    pub fn grid_index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.grid_indices)
    }

    /// Verify the buffer invariants: equal attribute lengths, complete
    /// primitives and in-range indices
    pub fn is_consistent(&self) -> bool {
        let count = self.positions.len();
        self.normals.len() == count
            && self.uvs.len() == count
            && self.indices.len() % 3 == 0
            && self.grid_indices.len() % 2 == 0
            && self
                .indices
                .iter()
                .chain(self.grid_indices.iter())
                .all(|&i| (i as usize) < count)
    }

    /// Clear the mesh, keeping allocations
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.indices.clear();
        self.grid_indices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> SurfaceMesh {
        SurfaceMesh {
            topology: Topology::Flat,
            positions: vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 0.0, 1.0),
                Point3f::new(1.0, 0.0, 1.0),
            ],
            normals: vec![Vector3f::y(); 4],
            uvs: vec![Vector2f::zeros(); 4],
            indices: vec![0, 2, 1, 1, 2, 3],
            grid_indices: vec![0, 1, 0, 2, 1, 3, 2, 3],
        }
    }

    #[test]
    fn test_mesh_counts() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(!mesh.is_empty());
        assert!(mesh.is_consistent());
    }

    #[test]
    fn test_out_of_range_index_is_inconsistent() {
        let mut mesh = quad();
        mesh.indices[5] = 4;
        assert!(!mesh.is_consistent());
    }

    #[test]
    fn test_interleaved_range() {
        let mesh = quad();
        let vertices = mesh.interleaved_range(2..4);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[1].position, [1.0, 0.0, 1.0]);
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut mesh = quad();
        let capacity = mesh.positions.capacity();
        mesh.clear();
        assert!(mesh.is_empty());
        assert_eq!(mesh.positions.capacity(), capacity);
    }
}
