//! Surface mesh construction for 3D surface plots
//!
//! This crate turns a [`SampleGrid`](dataviz3d_core::SampleGrid) of height
//! samples into GPU-ready buffers:
//! - Smooth topology with shared vertices and averaged normals
//! - Flat topology with one independent quad per grid cell
//! - Triangle and gridline index buffers for any sub-span of the grid
//! - Partial row updates for streaming data

pub mod builder;
pub mod config;
pub mod indices;
pub mod mesh;
pub mod normals;
pub mod vertex;

pub use builder::*;
pub use config::*;
pub use indices::*;
pub use mesh::*;
pub use vertex::*;
