//! Scene description and render-mirror synchronization
//!
//! This crate provides the retained 3D scene a visualization host mutates
//! and the renderer reads:
//! - Active camera and light with their own change tracking
//! - Viewport and primary/secondary sub-viewport layout
//! - Derived render-space (GL) rectangles
//! - Dirty-flag driven `sync` from a UI-owned scene into a render-owned mirror

pub mod camera;
pub mod config;
pub mod events;
pub mod light;
pub mod object;
pub mod scene;
pub mod viewport;

pub use camera::*;
pub use config::*;
pub use events::*;
pub use light::*;
pub use object::*;
pub use scene::*;
pub use viewport::*;
