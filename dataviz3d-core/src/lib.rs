//! Core data structures and error types for dataviz3d
//!
//! This crate provides the vocabulary shared by the surface mesh builder and
//! the scene synchronization engine: sample grids, visible windows, value
//! ranges, integer screen-space rectangles and the common error type.

pub mod error;
pub mod geometry;
pub mod point;
pub mod sample_grid;

pub use error::*;
pub use geometry::*;
pub use point::*;
pub use sample_grid::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector2, Vector3};
