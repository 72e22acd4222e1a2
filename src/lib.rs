//! # dataviz3d
//!
//! Core engines of a 3D data visualization toolkit.
//!
//! This is the umbrella crate that provides convenient access to all dataviz3d functionality.
//! You can use this crate to get everything in one place, or use individual crates for
//! more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Sample grids, visible windows, value ranges, screen rectangles and errors
//! - **Surface**: Smooth and flat surface meshes with partial row updates
//! - **Scene**: Camera, light and viewport state with dirty-flag synchronization
//!
//! ## Quick Start
//!
//! ```rust
//! use dataviz3d::prelude::*;
//!
//! let grid = SampleGrid::from_fn(8, 8, |column, row| {
//!     Point3f::new(column as f32, (column + row) as f32 * 0.1, row as f32)
//! })
//! .unwrap();
//!
//! let mut builder = MeshBuilder::new();
//! let mesh = builder
//!     .build(&grid, grid.full_window(), ValueRange::new(0.0, 1.4))
//!     .unwrap();
//! assert_eq!(mesh.vertex_count(), 64);
//!
//! let mut ui = Scene::new();
//! let mut render = Scene::new();
//! ui.set_viewport(Rect::new(0, 0, 800, 600));
//! ui.sync(&mut render);
//! assert_eq!(render.viewport(), Rect::new(0, 0, 800, 600));
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables surface and scene
//! - `surface`: Surface mesh construction
//! - `scene`: Scene synchronization
//! - `gpu`: wgpu vertex layouts for surface vertices
//! - `all`: Enables all features

// Re-export core functionality
pub use dataviz3d_core::*;

// Re-export sub-crates
#[cfg(feature = "surface")]
pub use dataviz3d_surface as surface;

#[cfg(feature = "scene")]
pub use dataviz3d_scene as scene;

/// Convenient imports for common use cases
pub mod prelude {
    pub use dataviz3d_core::{
        Error, Point3f, Rect, Result, SampleGrid, ScreenPoint, Size, ValueRange, Vector2f,
        Vector3f, VisibleWindow,
    };

    #[cfg(feature = "surface")]
    pub use dataviz3d_surface::{
        IndexSpan, MeshBuilder, SurfaceConfig, SurfaceMesh, SurfaceVertex, Topology,
    };

    #[cfg(feature = "scene")]
    pub use dataviz3d_scene::{
        Camera, Light, ObjectId, Scene, SceneConfig, SceneEvent, SceneSnapshot,
        NO_SELECTION_QUERY,
    };
}
