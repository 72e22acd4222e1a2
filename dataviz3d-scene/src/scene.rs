//! Retained scene state and its dirty-flag synchronization
//!
//! A visualization keeps two [`Scene`] instances: the one the host mutates
//! and a mirror the renderer reads. Every effective mutation marks a field in
//! the scene's [`ChangeTracker`]; [`Scene::sync`] pushes exactly those fields
//! into the mirror through the mirror's own setters and clears the marks on
//! both sides.

use crate::events::{Listeners, SceneEvent, SceneListener, SubscriptionId};
use crate::viewport::{default_sub_viewports, ViewportSet};
use crate::{Camera, Light, SceneConfig};
use dataviz3d_core::{Point3f, Rect, ScreenPoint, Size, Vector3f};
use log::{debug, trace};
use serde::Serialize;

/// Selection query sentinel meaning "no query pending"
pub const NO_SELECTION_QUERY: ScreenPoint = ScreenPoint::new(-1, -1);

/// A synchronized scene field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SceneField {
    WindowSize,
    DevicePixelRatio,
    Viewport,
    SlicingActive,
    SubViewportOrder,
    PrimarySubViewport,
    SecondarySubViewport,
    SelectionQueryPosition,
    Camera,
    Light,
}

impl SceneField {
    /// Fields in the order [`Scene::sync`] pushes them.
    ///
    /// The slicing flag goes before the sub-viewports so that explicitly
    /// assigned sub-viewports win over the default layout it applies.
    pub const SYNC_ORDER: [SceneField; 10] = [
        SceneField::WindowSize,
        SceneField::DevicePixelRatio,
        SceneField::Viewport,
        SceneField::SlicingActive,
        SceneField::SubViewportOrder,
        SceneField::PrimarySubViewport,
        SceneField::SecondarySubViewport,
        SceneField::SelectionQueryPosition,
        SceneField::Camera,
        SceneField::Light,
    ];
}

/// Per-field dirty flags.
///
/// `camera` and `light` track identity changes of the active object; value
/// changes are tracked by the objects themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeTracker {
    pub window_size: bool,
    pub device_pixel_ratio: bool,
    pub viewport: bool,
    pub slicing_active: bool,
    pub sub_viewport_order: bool,
    pub primary_sub_viewport: bool,
    pub secondary_sub_viewport: bool,
    pub selection_query_position: bool,
    pub camera: bool,
    pub light: bool,
}

impl ChangeTracker {
    fn flag_mut(&mut self, field: SceneField) -> &mut bool {
        match field {
            SceneField::WindowSize => &mut self.window_size,
            SceneField::DevicePixelRatio => &mut self.device_pixel_ratio,
            SceneField::Viewport => &mut self.viewport,
            SceneField::SlicingActive => &mut self.slicing_active,
            SceneField::SubViewportOrder => &mut self.sub_viewport_order,
            SceneField::PrimarySubViewport => &mut self.primary_sub_viewport,
            SceneField::SecondarySubViewport => &mut self.secondary_sub_viewport,
            SceneField::SelectionQueryPosition => &mut self.selection_query_position,
            SceneField::Camera => &mut self.camera,
            SceneField::Light => &mut self.light,
        }
    }

    pub fn is_dirty(&self, field: SceneField) -> bool {
        match field {
            SceneField::WindowSize => self.window_size,
            SceneField::DevicePixelRatio => self.device_pixel_ratio,
            SceneField::Viewport => self.viewport,
            SceneField::SlicingActive => self.slicing_active,
            SceneField::SubViewportOrder => self.sub_viewport_order,
            SceneField::PrimarySubViewport => self.primary_sub_viewport,
            SceneField::SecondarySubViewport => self.secondary_sub_viewport,
            SceneField::SelectionQueryPosition => self.selection_query_position,
            SceneField::Camera => self.camera,
            SceneField::Light => self.light,
        }
    }

    pub fn mark(&mut self, field: SceneField) {
        *self.flag_mut(field) = true;
    }

    pub fn clear(&mut self, field: SceneField) {
        *self.flag_mut(field) = false;
    }

    /// Whether any field is dirty
    pub fn any(&self) -> bool {
        SceneField::SYNC_ORDER
            .iter()
            .any(|field| self.is_dirty(*field))
    }

    /// Dirty fields in sync order
    pub fn dirty_fields(&self) -> Vec<SceneField> {
        SceneField::SYNC_ORDER
            .iter()
            .copied()
            .filter(|field| self.is_dirty(*field))
            .collect()
    }
}

/// Comparable copy of every scene value and flag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnapshot {
    pub viewports: ViewportSet,
    pub window_size: Size,
    pub device_pixel_ratio: f32,
    pub slicing_active: bool,
    pub secondary_subview_on_top: bool,
    pub selection_query_position: ScreenPoint,
    pub camera: Camera,
    pub light: Light,
    pub changes: ChangeTracker,
    pub scene_dirty: bool,
}

/// Scene description shared between the host and the renderer
pub struct Scene {
    config: SceneConfig,
    viewports: ViewportSet,
    window_size: Size,
    device_pixel_ratio: f32,
    slicing_active: bool,
    secondary_subview_on_top: bool,
    selection_query_position: ScreenPoint,
    camera: Camera,
    light: Light,
    changes: ChangeTracker,
    scene_dirty: bool,
    listeners: Listeners,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create a scene with a fresh camera and light.
    ///
    /// Both objects count as newly activated, so the first [`Scene::sync`]
    /// pushes them into the mirror.
    pub fn with_config(config: SceneConfig) -> Self {
        let mut changes = ChangeTracker::default();
        changes.mark(SceneField::Camera);
        changes.mark(SceneField::Light);

        Self {
            viewports: ViewportSet::default(),
            window_size: Size::default(),
            device_pixel_ratio: config.device_pixel_ratio,
            slicing_active: false,
            secondary_subview_on_top: config.secondary_subview_on_top,
            selection_query_position: NO_SELECTION_QUERY,
            camera: Camera::new(),
            light: Light::new(),
            changes,
            scene_dirty: true,
            listeners: Listeners::default(),
            config,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn viewport(&self) -> Rect {
        self.viewports.viewport
    }

    pub fn primary_sub_viewport(&self) -> Rect {
        self.viewports.primary_sub_viewport
    }

    pub fn secondary_sub_viewport(&self) -> Rect {
        self.viewports.secondary_sub_viewport
    }

    pub fn gl_viewport(&self) -> Rect {
        self.viewports.gl_viewport
    }

    pub fn gl_primary_sub_viewport(&self) -> Rect {
        self.viewports.gl_primary_sub_viewport
    }

    pub fn gl_secondary_sub_viewport(&self) -> Rect {
        self.viewports.gl_secondary_sub_viewport
    }

    pub fn viewports(&self) -> &ViewportSet {
        &self.viewports
    }

    pub fn window_size(&self) -> Size {
        self.window_size
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    pub fn is_slicing_active(&self) -> bool {
        self.slicing_active
    }

    pub fn is_secondary_subview_on_top(&self) -> bool {
        self.secondary_subview_on_top
    }

    pub fn selection_query_position(&self) -> ScreenPoint {
        self.selection_query_position
    }

    pub fn active_camera(&self) -> &Camera {
        &self.camera
    }

    pub fn active_light(&self) -> &Light {
        &self.light
    }

    pub fn changes(&self) -> &ChangeTracker {
        &self.changes
    }

    /// Whether anything would be pushed by the next [`Scene::sync`]
    pub fn is_dirty(&self) -> bool {
        self.scene_dirty || self.changes.any() || self.camera.is_dirty() || self.light.is_dirty()
    }

    /// Register a listener for change events
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&SceneEvent) + Send + 'static,
    {
        let boxed: SceneListener = Box::new(listener);
        self.listeners.add(boxed)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Remove a listener, returning whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    /// Set the viewport and apply the default sub-viewport layout to it
    pub fn set_viewport(&mut self, viewport: Rect) {
        if self.viewports.viewport == viewport {
            return;
        }
        trace!("viewport {} -> {}", self.viewports.viewport, viewport);

        self.viewports.viewport = viewport;
        self.changes.mark(SceneField::Viewport);
        self.scene_dirty = true;
        self.calculate_sub_viewports();
        self.viewports.update_gl(self.window_size, self.device_pixel_ratio);

        self.emit(SceneEvent::ViewportChanged(viewport));
        self.emit(SceneEvent::NeedRender);
    }

    /// Resize the viewport keeping its origin
    pub fn set_viewport_size(&mut self, width: i32, height: i32) {
        let viewport = self.viewports.viewport;
        self.set_viewport(Rect::new(viewport.x, viewport.y, width, height));
    }

    /// Set the primary sub-viewport, clipped to the viewport
    pub fn set_primary_sub_viewport(&mut self, rect: Rect) {
        let clipped = rect.intersected(&self.viewports.sub_viewport_bounds());
        if self.viewports.primary_sub_viewport == clipped {
            return;
        }

        self.viewports.primary_sub_viewport = clipped;
        self.viewports
            .update_gl_sub_viewports(self.window_size, self.device_pixel_ratio);
        self.changes.mark(SceneField::PrimarySubViewport);
        self.scene_dirty = true;

        self.emit(SceneEvent::PrimarySubViewportChanged(clipped));
        self.emit(SceneEvent::NeedRender);
    }

    /// Set the secondary sub-viewport, clipped to the viewport
    pub fn set_secondary_sub_viewport(&mut self, rect: Rect) {
        let clipped = rect.intersected(&self.viewports.sub_viewport_bounds());
        if self.viewports.secondary_sub_viewport == clipped {
            return;
        }

        self.viewports.secondary_sub_viewport = clipped;
        self.viewports
            .update_gl_sub_viewports(self.window_size, self.device_pixel_ratio);
        self.changes.mark(SceneField::SecondarySubViewport);
        self.scene_dirty = true;

        self.emit(SceneEvent::SecondarySubViewportChanged(clipped));
        self.emit(SceneEvent::NeedRender);
    }

    /// Set the host window size the render-space Y flip is relative to
    pub fn set_window_size(&mut self, size: Size) {
        if self.window_size == size {
            return;
        }

        self.window_size = size;
        self.viewports.update_gl(size, self.device_pixel_ratio);
        self.changes.mark(SceneField::WindowSize);
        self.scene_dirty = true;

        self.emit(SceneEvent::WindowSizeChanged(size));
        self.emit(SceneEvent::NeedRender);
    }

    pub fn set_device_pixel_ratio(&mut self, ratio: f32) {
        if self.device_pixel_ratio == ratio {
            return;
        }

        self.device_pixel_ratio = ratio;
        self.viewports.update_gl(self.window_size, ratio);
        self.changes.mark(SceneField::DevicePixelRatio);
        self.scene_dirty = true;

        self.emit(SceneEvent::DevicePixelRatioChanged(ratio));
        self.emit(SceneEvent::NeedRender);
    }

    /// Toggle slicing and apply the matching default sub-viewport layout
    pub fn set_slicing_active(&mut self, active: bool) {
        if self.slicing_active == active {
            return;
        }

        self.slicing_active = active;
        self.changes.mark(SceneField::SlicingActive);
        self.scene_dirty = true;
        self.calculate_sub_viewports();

        self.emit(SceneEvent::SlicingActiveChanged(active));
        self.emit(SceneEvent::NeedRender);
    }

    pub fn set_secondary_subview_on_top(&mut self, on_top: bool) {
        if self.secondary_subview_on_top == on_top {
            return;
        }

        self.secondary_subview_on_top = on_top;
        self.changes.mark(SceneField::SubViewportOrder);
        self.scene_dirty = true;

        self.emit(SceneEvent::SecondarySubviewOnTopChanged(on_top));
        self.emit(SceneEvent::NeedRender);
    }

    /// Post a selection query; a pending one is overwritten
    pub fn set_selection_query_position(&mut self, point: ScreenPoint) {
        if self.selection_query_position == point {
            return;
        }

        self.selection_query_position = point;
        self.changes.mark(SceneField::SelectionQueryPosition);
        self.scene_dirty = true;

        self.emit(SceneEvent::SelectionQueryPositionChanged(point));
        self.emit(SceneEvent::NeedRender);
    }

    /// Reset the selection query to [`NO_SELECTION_QUERY`]
    pub fn clear_selection_query(&mut self) {
        self.set_selection_query_position(NO_SELECTION_QUERY);
    }

    /// Whether `point` lies strictly inside the primary sub-view
    pub fn is_point_in_primary_sub_view(&self, point: ScreenPoint) -> bool {
        self.viewports
            .primary_in_window()
            .contains_point_strict(point)
    }

    /// Whether `point` lies strictly inside the secondary sub-view
    pub fn is_point_in_secondary_sub_view(&self, point: ScreenPoint) -> bool {
        self.viewports
            .secondary_in_window()
            .contains_point_strict(point)
    }

    /// Make `camera` the active camera and hand back the previous one.
    ///
    /// A camera with a different identity is pushed as a whole on the next
    /// sync. Passing a clone of the active camera only replaces its values.
    pub fn set_active_camera(&mut self, camera: Camera) -> Camera {
        let identity_changed = camera.id() != self.camera.id();
        let values_changed = camera != self.camera;
        let previous = std::mem::replace(&mut self.camera, camera);

        if identity_changed {
            debug!("active camera {:?} -> {:?}", previous.id(), self.camera.id());
            self.changes.mark(SceneField::Camera);
            self.scene_dirty = true;
            self.emit(SceneEvent::ActiveCameraChanged(self.camera.id()));
        }
        if identity_changed || values_changed {
            self.emit(SceneEvent::NeedRender);
        }
        previous
    }

    /// Make `light` the active light and hand back the previous one
    pub fn set_active_light(&mut self, light: Light) -> Light {
        let identity_changed = light.id() != self.light.id();
        let values_changed = light != self.light;
        let previous = std::mem::replace(&mut self.light, light);

        if identity_changed {
            debug!("active light {:?} -> {:?}", previous.id(), self.light.id());
            self.changes.mark(SceneField::Light);
            self.scene_dirty = true;
            self.emit(SceneEvent::ActiveLightChanged(self.light.id()));
        }
        if identity_changed || values_changed {
            self.emit(SceneEvent::NeedRender);
        }
        previous
    }

    /// Mutate the active camera in place
    pub fn update_camera<R>(&mut self, f: impl FnOnce(&mut Camera) -> R) -> R {
        let revision = self.camera.revision();
        let result = f(&mut self.camera);
        if self.camera.revision() != revision {
            self.emit(SceneEvent::NeedRender);
        }
        result
    }

    /// Mutate the active light in place
    pub fn update_light<R>(&mut self, f: impl FnOnce(&mut Light) -> R) -> R {
        let revision = self.light.revision();
        let result = f(&mut self.light);
        if self.light.revision() != revision {
            self.emit(SceneEvent::NeedRender);
        }
        result
    }

    /// Place the light on the camera orbit, see
    /// [`Camera::calculate_position_relative_to_camera`]
    pub fn set_light_position_relative_to_camera(
        &mut self,
        relative: &Vector3f,
        fixed_rotation: f32,
        distance_modifier: f32,
    ) {
        let position: Point3f = self.camera.calculate_position_relative_to_camera(
            relative,
            fixed_rotation,
            distance_modifier,
            self.config.camera_distance,
        );
        self.update_light(|light| light.set_position(position));
    }

    /// Push every dirty field of `self` into `other` and clear the pushed
    /// flags on both scenes.
    ///
    /// Values go through `other`'s setters, so its derived rectangles and
    /// events follow. A scene with nothing dirty leaves `other` untouched.
    pub fn sync(&mut self, other: &mut Scene) {
        if !self.is_dirty() {
            return;
        }

        let dirty = self.changes.dirty_fields();
        debug!("scene sync: {:?}", dirty);

        for field in SceneField::SYNC_ORDER {
            match field {
                SceneField::WindowSize if self.changes.window_size => {
                    other.set_window_size(self.window_size);
                }
                SceneField::DevicePixelRatio if self.changes.device_pixel_ratio => {
                    other.set_device_pixel_ratio(self.device_pixel_ratio);
                }
                SceneField::Viewport if self.changes.viewport => {
                    other.set_viewport(self.viewports.viewport);
                }
                SceneField::SlicingActive if self.changes.slicing_active => {
                    other.set_slicing_active(self.slicing_active);
                }
                SceneField::SubViewportOrder if self.changes.sub_viewport_order => {
                    other.set_secondary_subview_on_top(self.secondary_subview_on_top);
                }
                SceneField::PrimarySubViewport if self.changes.primary_sub_viewport => {
                    other.set_primary_sub_viewport(self.viewports.primary_sub_viewport);
                }
                SceneField::SecondarySubViewport if self.changes.secondary_sub_viewport => {
                    other.set_secondary_sub_viewport(self.viewports.secondary_sub_viewport);
                }
                SceneField::SelectionQueryPosition if self.changes.selection_query_position => {
                    other.set_selection_query_position(self.selection_query_position);
                }
                SceneField::Camera => {
                    if self.changes.camera {
                        self.camera.set_dirty(true);
                    }
                    let revision = other.camera.revision();
                    self.camera.sync(&mut other.camera);
                    if other.camera.revision() != revision {
                        other.emit(SceneEvent::NeedRender);
                    }
                }
                SceneField::Light => {
                    if self.changes.light {
                        self.light.set_dirty(true);
                    }
                    let revision = other.light.revision();
                    self.light.sync(&mut other.light);
                    if other.light.revision() != revision {
                        other.emit(SceneEvent::NeedRender);
                    }
                }
                _ => {}
            }
        }

        for field in dirty {
            self.changes.clear(field);
            other.changes.clear(field);
        }
        self.scene_dirty = false;
        other.scene_dirty = false;
    }

    /// Copy of every value and flag
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            viewports: self.viewports,
            window_size: self.window_size,
            device_pixel_ratio: self.device_pixel_ratio,
            slicing_active: self.slicing_active,
            secondary_subview_on_top: self.secondary_subview_on_top,
            selection_query_position: self.selection_query_position,
            camera: self.camera.clone(),
            light: self.light.clone(),
            changes: self.changes,
            scene_dirty: self.scene_dirty,
        }
    }

    /// Apply the default sub-viewport layout through the public setters.
    /// The host overrides it by assigning sub-viewports after the call that
    /// triggered the layout returns.
    fn calculate_sub_viewports(&mut self) {
        let (primary, secondary) = default_sub_viewports(
            &self.viewports.viewport,
            self.slicing_active,
            self.config.slice_viewport_ratio,
        );
        self.set_primary_sub_viewport(primary);
        self.set_secondary_sub_viewport(secondary);
        self.viewports
            .update_gl(self.window_size, self.device_pixel_ratio);
    }

    fn emit(&mut self, event: SceneEvent) {
        self.listeners.emit(event);
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("snapshot", &self.snapshot())
            .field("listeners", &self.listeners)
            .finish()
    }
}
