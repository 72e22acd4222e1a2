//! Scene configuration

use serde::{Deserialize, Serialize};

/// Configuration for [`Scene`](crate::Scene)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Size of the primary sub-viewport relative to the viewport while slicing
    pub slice_viewport_ratio: f32,
    /// Distance of the camera orbit from the plotting cube centre
    pub camera_distance: f32,
    /// Device pixel ratio of a new scene
    pub device_pixel_ratio: f32,
    /// Whether a new scene draws the secondary sub-view on top
    pub secondary_subview_on_top: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            slice_viewport_ratio: 0.2,
            camera_distance: 6.0,
            device_pixel_ratio: 1.0,
            secondary_subview_on_top: true,
        }
    }
}

impl SceneConfig {
    /// Set the sliced primary sub-viewport ratio
    pub fn with_slice_viewport_ratio(mut self, ratio: f32) -> Self {
        self.slice_viewport_ratio = ratio;
        self
    }

    /// Set the camera orbit distance
    pub fn with_camera_distance(mut self, distance: f32) -> Self {
        self.camera_distance = distance;
        self
    }

    /// Set the initial device pixel ratio
    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// Set the initial sub-view draw order
    pub fn with_secondary_subview_on_top(mut self, on_top: bool) -> Self {
        self.secondary_subview_on_top = on_top;
        self
    }
}
