//! Integration tests for scene synchronization between a host-owned scene
//! and its render mirror

use dataviz3d_core::{Rect, ScreenPoint, Size};
use dataviz3d_scene::{Camera, Light, Scene, SceneConfig, SceneEvent, NO_SELECTION_QUERY};
use std::sync::{Arc, Mutex};

fn synced_pair() -> (Scene, Scene) {
    let mut ui = Scene::new();
    let mut render = Scene::new();
    ui.sync(&mut render);
    (ui, render)
}

#[test]
fn test_sub_viewports_stay_inside_viewport() {
    let mut scene = Scene::new();
    let requests = [
        Rect::new(-100, -100, 50, 50),
        Rect::new(900, 700, 500, 500),
        Rect::new(10, 10, 5000, 20),
        Rect::new(0, 0, 1000, 800),
        Rect::new(10, 10, i32::MAX, 20),
        Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX),
        Rect::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX),
        Rect::new(-5, i32::MIN, 100, i32::MAX),
    ];

    for viewport in [
        Rect::new(0, 0, 1000, 800),
        Rect::new(40, 30, 320, 240),
        Rect::new(i32::MAX - 10, i32::MIN, 500, 400),
        Rect::new(i32::MIN, i32::MAX, i32::MAX, i32::MAX),
    ] {
        scene.set_viewport(viewport);
        let bounds = Rect::new(0, 0, viewport.width, viewport.height);
        for request in requests {
            scene.set_primary_sub_viewport(request);
            scene.set_secondary_sub_viewport(request);
            assert!(bounds.contains_rect(&scene.primary_sub_viewport()));
            assert!(bounds.contains_rect(&scene.secondary_sub_viewport()));
        }
    }

    scene.set_viewport(Rect::new(0, 0, 1000, 800));
    scene.set_primary_sub_viewport(Rect::new(10, 10, i32::MAX, 20));
    assert_eq!(scene.primary_sub_viewport(), Rect::new(10, 10, 990, 20));
}

#[test]
fn test_clean_sync_leaves_mirror_unchanged() {
    let (mut ui, mut render) = synced_pair();
    render.set_viewport(Rect::new(5, 5, 50, 50));
    let before = render.snapshot();

    ui.sync(&mut render);
    assert_eq!(render.snapshot(), before);
}

#[test]
fn test_sync_is_idempotent() {
    let (mut ui, mut render) = synced_pair();
    ui.set_window_size(Size::new(1280, 720));
    ui.set_viewport(Rect::new(0, 0, 1280, 720));
    ui.set_slicing_active(true);
    ui.set_selection_query_position(ScreenPoint::new(300, 200));
    ui.update_camera(|camera| camera.set_zoom_level(180.0));

    ui.sync(&mut render);
    let first = render.snapshot();
    assert!(!ui.is_dirty());

    ui.sync(&mut render);
    assert_eq!(render.snapshot(), first);
}

#[test]
fn test_slicing_layout_round_trip() {
    let mut scene = Scene::new();
    scene.set_viewport(Rect::new(0, 0, 1000, 800));

    scene.set_slicing_active(true);
    assert_eq!(scene.primary_sub_viewport(), Rect::new(0, 0, 200, 160));
    assert_eq!(scene.secondary_sub_viewport(), Rect::new(0, 0, 1000, 800));

    scene.set_slicing_active(false);
    assert_eq!(scene.primary_sub_viewport(), Rect::new(0, 0, 1000, 800));
    assert_eq!(scene.secondary_sub_viewport(), Rect::new(0, 0, 0, 0));
}

#[test]
fn test_slice_ratio_is_configurable() {
    let mut scene = Scene::with_config(SceneConfig::default().with_slice_viewport_ratio(0.5));
    scene.set_viewport(Rect::new(0, 0, 1000, 800));
    scene.set_slicing_active(true);
    assert_eq!(scene.primary_sub_viewport(), Rect::new(0, 0, 500, 400));
}

#[test]
fn test_selection_query_mailbox() {
    let (mut ui, mut render) = synced_pair();
    assert_eq!(ui.selection_query_position(), NO_SELECTION_QUERY);

    ui.set_selection_query_position(ScreenPoint::new(12, 34));
    assert_eq!(ui.selection_query_position(), ScreenPoint::new(12, 34));
    ui.sync(&mut render);
    assert_eq!(render.selection_query_position(), ScreenPoint::new(12, 34));

    // the consumer resets the mirror, the host side keeps its value
    render.clear_selection_query();
    assert_eq!(render.selection_query_position(), NO_SELECTION_QUERY);
    assert_eq!(ui.selection_query_position(), ScreenPoint::new(12, 34));
}

#[test]
fn test_gl_viewport_y_flip() {
    let mut scene = Scene::new();
    scene.set_window_size(Size::new(0, 600));
    scene.set_viewport(Rect::new(0, 50, 400, 300));
    assert_eq!(scene.gl_viewport().y, 600 - (50 + 300));
}

#[test]
fn test_gl_rects_follow_window_and_pixel_ratio() {
    let (mut ui, mut render) = synced_pair();
    ui.set_viewport(Rect::new(0, 0, 400, 300));
    ui.set_window_size(Size::new(400, 300));
    ui.set_device_pixel_ratio(2.0);
    ui.sync(&mut render);

    assert_eq!(render.gl_viewport(), Rect::new(0, 0, 800, 600));
    assert_eq!(render.gl_primary_sub_viewport(), Rect::new(0, 0, 800, 600));
    assert_eq!(render.viewports(), ui.viewports());
}

#[test]
fn test_host_override_after_slicing_event_reaches_mirror() {
    let (mut ui, mut render) = synced_pair();
    ui.set_viewport(Rect::new(0, 0, 1000, 800));

    // the host sees the slicing event, then moves the small view once the call returns
    let slicing = Arc::new(Mutex::new(false));
    let sink = Arc::clone(&slicing);
    ui.subscribe(move |event| {
        if let SceneEvent::SlicingActiveChanged(active) = event {
            *sink.lock().unwrap() = *active;
        }
    });
    ui.set_slicing_active(true);
    assert!(*slicing.lock().unwrap());
    ui.set_primary_sub_viewport(Rect::new(800, 640, 200, 160));

    ui.sync(&mut render);
    assert_eq!(render.primary_sub_viewport(), Rect::new(800, 640, 200, 160));
    assert_eq!(render.secondary_sub_viewport(), Rect::new(0, 0, 1000, 800));
}

#[test]
fn test_mirror_emits_events_during_sync() {
    let (mut ui, mut render) = synced_pair();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    render.subscribe(move |event| sink.lock().unwrap().push(*event));

    ui.set_device_pixel_ratio(1.25);
    ui.sync(&mut render);

    let events = events.lock().unwrap();
    assert!(events.contains(&SceneEvent::DevicePixelRatioChanged(1.25)));
    assert!(events.contains(&SceneEvent::NeedRender));
}

#[test]
fn test_camera_and_light_swap() {
    let (mut ui, mut render) = synced_pair();
    let mirror_camera = render.active_camera().id();

    let mut camera = Camera::new();
    camera.set_x_rotation(-45.0);
    let old_camera = ui.set_active_camera(camera);
    let mut light = Light::new();
    light.set_position(dataviz3d_core::Point3f::new(1.0, 4.0, 1.0));
    let old_light = ui.set_active_light(light);
    assert_ne!(old_camera.id(), ui.active_camera().id());
    assert_ne!(old_light.id(), ui.active_light().id());

    ui.sync(&mut render);
    assert_eq!(render.active_camera().x_rotation(), -45.0);
    assert_eq!(render.active_light().position().y, 4.0);
    assert_eq!(render.active_camera().id(), mirror_camera);
    assert!(!ui.is_dirty());
    assert!(!render.is_dirty());
}

#[test]
fn test_scene_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Scene>();
}
