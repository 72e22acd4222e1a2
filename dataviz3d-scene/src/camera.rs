//! Orbiting camera with change tracking

use crate::ObjectId;
use dataviz3d_core::{Point3f, Vector3f};
use serde::Serialize;

/// Camera orbiting the plotting cube.
///
/// Rotations are in degrees and zoom in percent. Every setter that changes a
/// value marks the camera dirty; [`Camera::sync`] copies a dirty camera into
/// its render-side counterpart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Camera {
    id: ObjectId,
    position: Point3f,
    x_rotation: f32,
    y_rotation: f32,
    zoom_level: f32,
    min_x_rotation: f32,
    max_x_rotation: f32,
    min_y_rotation: f32,
    max_y_rotation: f32,
    wrap_x_rotation: bool,
    wrap_y_rotation: bool,
    dirty: bool,
    #[serde(skip)]
    revision: u64,
}

impl Camera {
    /// Create a camera with a fresh identity
    pub fn new() -> Self {
        Self {
            id: ObjectId::next(),
            position: Point3f::origin(),
            x_rotation: 0.0,
            y_rotation: 0.0,
            zoom_level: 100.0,
            min_x_rotation: -180.0,
            max_x_rotation: 180.0,
            min_y_rotation: 0.0,
            max_y_rotation: 90.0,
            wrap_x_rotation: true,
            wrap_y_rotation: false,
            dirty: false,
            revision: 0,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn position(&self) -> Point3f {
        self.position
    }

    pub fn x_rotation(&self) -> f32 {
        self.x_rotation
    }

    pub fn y_rotation(&self) -> f32 {
        self.y_rotation
    }

    pub fn zoom_level(&self) -> f32 {
        self.zoom_level
    }

    pub fn x_rotation_limits(&self) -> (f32, f32) {
        (self.min_x_rotation, self.max_x_rotation)
    }

    pub fn y_rotation_limits(&self) -> (f32, f32) {
        (self.min_y_rotation, self.max_y_rotation)
    }

    pub fn wrap_x_rotation(&self) -> bool {
        self.wrap_x_rotation
    }

    pub fn wrap_y_rotation(&self) -> bool {
        self.wrap_y_rotation
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force the dirty state, e.g. after the camera became the active one
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Counter bumped on every effective change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_position(&mut self, position: Point3f) {
        if self.position != position {
            self.position = position;
            self.touch();
        }
    }

    /// Set the horizontal rotation, wrapped or clamped into the x limits
    pub fn set_x_rotation(&mut self, rotation: f32) {
        let rotation = fit_rotation(
            rotation,
            self.min_x_rotation,
            self.max_x_rotation,
            self.wrap_x_rotation,
        );
        if self.x_rotation != rotation {
            self.x_rotation = rotation;
            self.touch();
        }
    }

    /// Set the vertical rotation, wrapped or clamped into the y limits
    pub fn set_y_rotation(&mut self, rotation: f32) {
        let rotation = fit_rotation(
            rotation,
            self.min_y_rotation,
            self.max_y_rotation,
            self.wrap_y_rotation,
        );
        if self.y_rotation != rotation {
            self.y_rotation = rotation;
            self.touch();
        }
    }

    pub fn set_zoom_level(&mut self, zoom_level: f32) {
        if self.zoom_level != zoom_level {
            self.zoom_level = zoom_level;
            self.touch();
        }
    }

    /// Set the x rotation limits and refit the current rotation
    pub fn set_x_rotation_limits(&mut self, min: f32, max: f32) {
        if (self.min_x_rotation, self.max_x_rotation) != (min, max) {
            self.min_x_rotation = min;
            self.max_x_rotation = max;
            self.touch();
            self.set_x_rotation(self.x_rotation);
        }
    }

    /// Set the y rotation limits and refit the current rotation
    pub fn set_y_rotation_limits(&mut self, min: f32, max: f32) {
        if (self.min_y_rotation, self.max_y_rotation) != (min, max) {
            self.min_y_rotation = min;
            self.max_y_rotation = max;
            self.touch();
            self.set_y_rotation(self.y_rotation);
        }
    }

    pub fn set_wrap_x_rotation(&mut self, wrap: bool) {
        if self.wrap_x_rotation != wrap {
            self.wrap_x_rotation = wrap;
            self.touch();
        }
    }

    pub fn set_wrap_y_rotation(&mut self, wrap: bool) {
        if self.wrap_y_rotation != wrap {
            self.wrap_y_rotation = wrap;
            self.touch();
        }
    }

    /// Position on the camera orbit relative to the current rotation.
    ///
    /// `relative` offsets the result, its y component also extends the orbit
    /// radius. A non-zero `fixed_rotation` (degrees) replaces the camera's
    /// horizontal rotation and flattens the vertical one. `distance_modifier`
    /// scales the radius on top of the base `1.5 * camera_distance`.
    pub fn calculate_position_relative_to_camera(
        &self,
        relative: &Vector3f,
        fixed_rotation: f32,
        distance_modifier: f32,
        camera_distance: f32,
    ) -> Point3f {
        let radius_factor = camera_distance * (1.5 + distance_modifier);
        let (x_angle, y_angle) = if fixed_rotation == 0.0 {
            (self.x_rotation.to_radians(), self.y_rotation.to_radians())
        } else {
            (fixed_rotation.to_radians(), 0.0)
        };

        let radius = radius_factor + relative.y;
        let x = radius * x_angle.sin() * y_angle.cos();
        let y = radius * y_angle.sin();
        let z = radius * x_angle.cos() * y_angle.cos();

        Point3f::new(-x + relative.x, y + relative.y, z + relative.z)
    }

    /// Copy this camera's values into `other` if this camera is dirty, then
    /// clear both dirty flags. Identities are left alone.
    pub fn sync(&mut self, other: &mut Camera) {
        if !self.dirty {
            return;
        }
        other.copy_values_from(self);
        self.dirty = false;
        other.dirty = false;
    }

    fn copy_values_from(&mut self, source: &Camera) {
        self.position = source.position;
        self.x_rotation = source.x_rotation;
        self.y_rotation = source.y_rotation;
        self.zoom_level = source.zoom_level;
        self.min_x_rotation = source.min_x_rotation;
        self.max_x_rotation = source.max_x_rotation;
        self.min_y_rotation = source.min_y_rotation;
        self.max_y_rotation = source.max_y_rotation;
        self.wrap_x_rotation = source.wrap_x_rotation;
        self.wrap_y_rotation = source.wrap_y_rotation;
        self.revision += 1;
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap `value` around `[min, max]` once, jumping to the opposite end if a
/// single wrap is not enough, or clamp it when wrapping is off
fn fit_rotation(value: f32, min: f32, max: f32, wrap: bool) -> f32 {
    if !wrap {
        return value.clamp(min, max);
    }

    let mut value = value;
    if value > max {
        value = min + (value - max);
        if value > max {
            value = min;
        }
    }
    if value < min {
        value = max + (value - min);
        if value < min {
            value = max;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::new();
        assert_eq!(camera.x_rotation(), 0.0);
        assert_eq!(camera.y_rotation(), 0.0);
        assert_eq!(camera.zoom_level(), 100.0);
        assert_eq!(camera.x_rotation_limits(), (-180.0, 180.0));
        assert_eq!(camera.y_rotation_limits(), (0.0, 90.0));
        assert!(camera.wrap_x_rotation());
        assert!(!camera.wrap_y_rotation());
        assert!(!camera.is_dirty());
    }

    #[test]
    fn test_no_op_write_stays_clean() {
        let mut camera = Camera::new();
        camera.set_zoom_level(100.0);
        camera.set_x_rotation(0.0);
        assert!(!camera.is_dirty());
        assert_eq!(camera.revision(), 0);

        camera.set_zoom_level(150.0);
        assert!(camera.is_dirty());
        assert_eq!(camera.revision(), 1);
    }

    #[test]
    fn test_x_rotation_wraps() {
        let mut camera = Camera::new();
        camera.set_x_rotation(200.0);
        assert_relative_eq!(camera.x_rotation(), -160.0);
        camera.set_x_rotation(-190.0);
        assert_relative_eq!(camera.x_rotation(), 170.0);
        // more than one full turn jumps to the opposite end
        camera.set_x_rotation(600.0);
        assert_relative_eq!(camera.x_rotation(), -180.0);
    }

    #[test]
    fn test_y_rotation_clamps() {
        let mut camera = Camera::new();
        camera.set_y_rotation(120.0);
        assert_eq!(camera.y_rotation(), 90.0);
        camera.set_y_rotation(-10.0);
        assert_eq!(camera.y_rotation(), 0.0);
    }

    #[test]
    fn test_limits_refit_rotation() {
        let mut camera = Camera::new();
        camera.set_y_rotation(80.0);
        camera.set_y_rotation_limits(0.0, 45.0);
        assert_eq!(camera.y_rotation(), 45.0);
    }

    #[test]
    fn test_position_relative_to_camera() {
        let camera = Camera::new();
        // no rotation: straight out along +z at 1.5 * distance
        let position = camera.calculate_position_relative_to_camera(&Vector3f::zeros(), 0.0, 0.0, 6.0);
        assert_relative_eq!(position, Point3f::new(0.0, 0.0, 9.0), epsilon = 1e-5);

        // fixed rotation of 90 degrees swings the position to -x
        let position = camera.calculate_position_relative_to_camera(&Vector3f::zeros(), 90.0, 0.0, 6.0);
        assert_relative_eq!(position, Point3f::new(-9.0, 0.0, 0.0), epsilon = 1e-5);

        // offset y lifts and extends the radius
        let position =
            camera.calculate_position_relative_to_camera(&Vector3f::new(0.0, 1.0, 0.0), 0.0, 0.5, 6.0);
        assert_relative_eq!(position, Point3f::new(0.0, 1.0, 13.0), epsilon = 1e-5);
    }

    #[test]
    fn test_sync_copies_values_and_clears() {
        let mut ui = Camera::new();
        let mut render = Camera::new();
        ui.set_x_rotation(45.0);
        ui.set_zoom_level(200.0);

        ui.sync(&mut render);
        assert!(!ui.is_dirty());
        assert!(!render.is_dirty());
        assert_eq!(render.x_rotation(), 45.0);
        assert_eq!(render.zoom_level(), 200.0);
        assert_ne!(render.id(), ui.id());
    }

    #[test]
    fn test_clean_sync_is_noop() {
        let mut ui = Camera::new();
        let mut render = Camera::new();
        render.set_zoom_level(50.0);
        ui.sync(&mut render);
        assert_eq!(render.zoom_level(), 50.0);
        assert!(render.is_dirty());
    }
}
