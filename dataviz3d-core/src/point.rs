//! Point and vector aliases used across the workspace

use nalgebra::{Point3, Vector2, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 2D vector with floating point components, used for texture coordinates
pub type Vector2f = Vector2<f32>;

/// Returns `true` when every coordinate of `point` is finite
#[inline]
pub fn is_finite_point(point: &Point3f) -> bool {
    point.x.is_finite() && point.y.is_finite() && point.z.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_finite_point() {
        assert!(is_finite_point(&Point3f::new(1.0, -2.0, 3.0)));
        assert!(!is_finite_point(&Point3f::new(f32::NAN, 0.0, 0.0)));
        assert!(!is_finite_point(&Point3f::new(0.0, f32::INFINITY, 0.0)));
    }
}
