//! Streaming surface demo
//!
//! Simulates a data proxy that rewrites one row of a height field per frame:
//! - Builds a smooth surface mesh once
//! - Patches only the changed rows every frame
//! - Drives a host-side scene and syncs it into the render mirror
//!
//! Run with `RUST_LOG=debug` to see the engines' own logging.

use anyhow::{anyhow, Context, Result};
use dataviz3d_core::{Point3f, Rect, SampleGrid, ScreenPoint, Size, ValueRange, Vector3f};
use dataviz3d_scene::{Scene, SceneEvent};
use dataviz3d_surface::{MeshBuilder, SurfaceConfig, Topology};
use log::info;
use std::sync::{Arc, Mutex};

const COLUMNS: usize = 96;
const ROWS: usize = 64;
const FRAMES: usize = 24;
const VALUE_RANGE: ValueRange = ValueRange::new(-1.5, 1.5);

fn height(column: usize, row: usize, phase: f32) -> f32 {
    let x = column as f32 / COLUMNS as f32 * std::f32::consts::TAU;
    let z = row as f32 / ROWS as f32 * std::f32::consts::TAU;
    (x + phase).sin() * (z * 0.5).cos()
}

fn main() -> Result<()> {
    env_logger::init();

    println!("dataviz3d streaming surface demo");
    println!("================================");

    let mut grid = SampleGrid::from_fn(COLUMNS, ROWS, |column, row| {
        Point3f::new(column as f32, height(column, row, 0.0), row as f32)
    })?;

    let mut builder = MeshBuilder::with_config(
        SurfaceConfig::default()
            .with_topology(Topology::Smooth)
            .with_parallel_row_threshold(32),
    );
    let window = grid.full_window();
    let mesh = builder.build(&grid, window, VALUE_RANGE)?;
    println!(
        "Built {:?} mesh: {} vertices, {} triangles, {} gridline indices",
        mesh.topology,
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.grid_indices.len()
    );

    let mut ui = Scene::new();
    let mut render = Scene::new();
    let redraws = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&redraws);
    render.subscribe(move |event| {
        if *event == SceneEvent::NeedRender {
            if let Ok(mut count) = counter.lock() {
                *count += 1;
            }
        }
    });

    ui.set_window_size(Size::new(1280, 800));
    ui.set_viewport(Rect::new(0, 0, 1280, 800));
    ui.sync(&mut render);

    let mut uploaded = 0usize;
    for frame in 0..FRAMES {
        let row = frame * ROWS / FRAMES;
        let phase = frame as f32 * 0.25;
        let samples = grid
            .row_mut(row)
            .ok_or_else(|| anyhow!("row {} is outside the grid", row))?;
        for (column, sample) in samples.iter_mut().enumerate() {
            sample.y = height(column, row, phase);
        }

        let dirty = builder
            .update_rows(&grid, row, row, VALUE_RANGE, Topology::Smooth)
            .with_context(|| format!("updating row {} in frame {}", row, frame))?;
        uploaded += builder.mesh().interleaved_range(dirty.clone()).len();

        ui.update_camera(|camera| camera.set_x_rotation(frame as f32 * 15.0));
        ui.set_light_position_relative_to_camera(&Vector3f::new(0.0, 1.0, 0.0), 0.0, 0.0);
        if frame == FRAMES / 2 {
            ui.set_slicing_active(true);
            ui.set_selection_query_position(ScreenPoint::new(640, 400));
        }

        ui.sync(&mut render);
        if render.selection_query_position() != dataviz3d_scene::NO_SELECTION_QUERY {
            info!(
                "frame {}: selection query at {:?}, primary view hit: {}",
                frame,
                render.selection_query_position(),
                render.is_point_in_primary_sub_view(render.selection_query_position())
            );
            render.clear_selection_query();
        }

        info!(
            "frame {}: row {} -> vertices {:?}, gl viewport {}, camera x {:.1}",
            frame,
            row,
            dirty,
            render.gl_viewport(),
            render.active_camera().x_rotation()
        );
    }

    let full = builder.mesh().vertex_count() * FRAMES;
    println!(
        "Uploaded {} vertices over {} frames instead of {} for full rebuilds",
        uploaded, FRAMES, full
    );
    println!(
        "Render mirror: slicing {}, primary {}, secondary {}",
        render.is_slicing_active(),
        render.gl_primary_sub_viewport(),
        render.gl_secondary_sub_viewport()
    );
    let redraws = redraws.lock().map(|count| *count).unwrap_or_default();
    println!("Render mirror requested {} redraws", redraws);
    println!("\nDemo completed successfully!");
    Ok(())
}
