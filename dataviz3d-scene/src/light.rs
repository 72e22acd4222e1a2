//! Scene light

use crate::ObjectId;
use dataviz3d_core::Point3f;
use serde::Serialize;

/// Point light of the scene, positioned in plotting-cube space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Light {
    id: ObjectId,
    position: Point3f,
    dirty: bool,
    #[serde(skip)]
    revision: u64,
}

impl Light {
    pub fn new() -> Self {
        Self {
            id: ObjectId::next(),
            position: Point3f::origin(),
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

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_position(&mut self, position: Point3f) {
        if self.position != position {
            self.position = position;
            self.dirty = true;
            self.revision += 1;
        }
    }

    /// Copy the position into `other` if this light is dirty and clear both
    /// dirty flags
    pub fn sync(&mut self, other: &mut Light) {
        if !self.dirty {
            return;
        }
        other.position = self.position;
        other.revision += 1;
        self.dirty = false;
        other.dirty = false;
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_position_marks_dirty() {
        let mut light = Light::new();
        light.set_position(Point3f::origin());
        assert!(!light.is_dirty());

        light.set_position(Point3f::new(0.0, 5.0, 2.0));
        assert!(light.is_dirty());
        assert_eq!(light.revision(), 1);
    }

    #[test]
    fn test_light_sync() {
        let mut ui = Light::new();
        let mut render = Light::new();
        ui.set_position(Point3f::new(1.0, 2.0, 3.0));

        ui.sync(&mut render);
        assert_eq!(render.position(), Point3f::new(1.0, 2.0, 3.0));
        assert!(!ui.is_dirty());
        assert!(!render.is_dirty());

        // a second sync has nothing to push
        render.set_position(Point3f::origin());
        ui.sync(&mut render);
        assert_eq!(render.position(), Point3f::origin());
    }
}
