//! Viewport layout and the UI to render-space transform

use dataviz3d_core::{clamp_i32, Rect, Size};
use serde::Serialize;

/// Map a UI-space rectangle (top-left origin, logical pixels) into render
/// space (bottom-left origin, physical pixels).
///
/// `window_height` is the logical height of the host window the rectangle
/// is relative to. Results are truncated toward zero and saturate at the
/// `i32` range.
pub fn to_gl_rect(rect: &Rect, window_height: i32, device_pixel_ratio: f32) -> Rect {
    let flipped_y = clamp_i32(window_height as i64 - (rect.y as i64 + rect.height as i64));
    Rect::new(
        (rect.x as f32 * device_pixel_ratio) as i32,
        (flipped_y as f32 * device_pixel_ratio) as i32,
        (rect.width as f32 * device_pixel_ratio) as i32,
        (rect.height as f32 * device_pixel_ratio) as i32,
    )
}

/// Default `(primary, secondary)` sub-viewports for a viewport.
///
/// While slicing, the primary view shrinks to `ratio` of the viewport in the
/// top-left corner and the secondary view takes the full viewport. Otherwise
/// the primary view is full size and the secondary view is empty.
pub fn default_sub_viewports(viewport: &Rect, slicing_active: bool, ratio: f32) -> (Rect, Rect) {
    let full = Rect::new(0, 0, viewport.width, viewport.height);
    if slicing_active {
        let primary = Rect::new(
            0,
            0,
            (viewport.width as f32 * ratio) as i32,
            (viewport.height as f32 * ratio) as i32,
        );
        (primary, full)
    } else {
        (full, Rect::default())
    }
}

/// Viewport rectangles in UI space with their derived render-space forms.
///
/// Sub-viewports are relative to the viewport origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ViewportSet {
    pub viewport: Rect,
    pub primary_sub_viewport: Rect,
    pub secondary_sub_viewport: Rect,
    pub gl_viewport: Rect,
    pub gl_primary_sub_viewport: Rect,
    pub gl_secondary_sub_viewport: Rect,
}

impl ViewportSet {
    /// Area sub-viewports are clipped to
    pub fn sub_viewport_bounds(&self) -> Rect {
        Rect::new(0, 0, self.viewport.width, self.viewport.height)
    }

    /// Primary sub-viewport in window coordinates
    pub fn primary_in_window(&self) -> Rect {
        self.primary_sub_viewport
            .translated(self.viewport.x, self.viewport.y)
    }

    /// Secondary sub-viewport in window coordinates
    pub fn secondary_in_window(&self) -> Rect {
        self.secondary_sub_viewport
            .translated(self.viewport.x, self.viewport.y)
    }

    pub fn update_gl_viewport(&mut self, window: Size, device_pixel_ratio: f32) {
        self.gl_viewport = to_gl_rect(&self.viewport, window.height, device_pixel_ratio);
    }

    pub fn update_gl_sub_viewports(&mut self, window: Size, device_pixel_ratio: f32) {
        self.gl_primary_sub_viewport =
            to_gl_rect(&self.primary_in_window(), window.height, device_pixel_ratio);
        self.gl_secondary_sub_viewport =
            to_gl_rect(&self.secondary_in_window(), window.height, device_pixel_ratio);
    }

    /// Recompute every render-space rectangle
    pub fn update_gl(&mut self, window: Size, device_pixel_ratio: f32) {
        self.update_gl_viewport(window, device_pixel_ratio);
        self.update_gl_sub_viewports(window, device_pixel_ratio);
    }
}
