//! Integer screen-space geometry
//!
//! UI-space rectangles have their origin in the top-left corner with Y
//! growing downwards. Render-space rectangles use the same type but are
//! interpreted with a bottom-left origin.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An integer point in screen space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An integer size in screen space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// An integer rectangle given by its origin and extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin with the given size
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Exclusive right edge, saturated to the `i32` range
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturated to the `i32` range
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// `(left, top, right, bottom)` without overflow
    fn edges(&self) -> (i64, i64, i64, i64) {
        let (x, y) = (self.x as i64, self.y as i64);
        (x, y, x + self.width as i64, y + self.height as i64)
    }

    /// A rectangle without any area
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Overlapping part of `self` and `other`.
    ///
    /// Rectangles that do not overlap, or that have no area, produce the
    /// null rectangle `(0, 0, 0, 0)`.
    pub fn intersected(&self, other: &Rect) -> Rect {
        if self.is_empty() || other.is_empty() {
            return Rect::default();
        }

        let (self_left, self_top, self_right, self_bottom) = self.edges();
        let (other_left, other_top, other_right, other_bottom) = other.edges();
        let left = self_left.max(other_left);
        let top = self_top.max(other_top);
        let right = self_right.min(other_right);
        let bottom = self_bottom.min(other_bottom);

        if left >= right || top >= bottom {
            return Rect::default();
        }

        Rect::new(
            clamp_i32(left),
            clamp_i32(top),
            clamp_i32(right - left),
            clamp_i32(bottom - top),
        )
    }

    /// Whether `other` lies completely inside `self`
    pub fn contains_rect(&self, other: &Rect) -> bool {
        if other.is_empty() {
            return true;
        }
        let (left, top, right, bottom) = self.edges();
        let (other_left, other_top, other_right, other_bottom) = other.edges();
        other_left >= left && other_top >= top && other_right <= right && other_bottom <= bottom
    }

    /// Strict containment, points on the border are outside
    pub fn contains_point_strict(&self, point: ScreenPoint) -> bool {
        let (left, top, right, bottom) = self.edges();
        let (x, y) = (point.x as i64, point.y as i64);
        x > left && x < right && y > top && y < bottom
    }

    /// Same rectangle moved by `(dx, dy)`, the origin saturates
    pub const fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }
}

/// Saturating conversion back into screen coordinates
pub fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}x{})", self.x, self.y, self.width, self.height)
    }
}
