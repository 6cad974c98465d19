use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use brush_geometry::{AxisConvention, ReconstructionSettings, World};
use brush_viz::{
    demo_solids, draw_solid_mesh, draw_wireframe, load_settings, solid_color, spawn_material_loader,
    translate_solid, MaterialLibrary, OrbitCamera, SolidCursor,
};
use log::warn;
use macroquad::prelude::*;
use nalgebra::Vector3;

fn settings_from_args() -> ReconstructionSettings {
    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        return ReconstructionSettings::default();
    };
    let settings = load_settings(&path).unwrap_or_else(|err| {
        warn!("could not load settings from {}: {err}", path.display());
        ReconstructionSettings::default()
    });

    // The camera works in map space.
    if settings.axis_convention != AxisConvention::ZUp {
        warn!("viewer draws map space, ignoring {:?}", settings.axis_convention);
    }
    ReconstructionSettings {
        axis_convention: AxisConvention::ZUp,
        ..settings
    }
}

#[macroquad::main("Brush Viewer")]
async fn main() {
    let mut world = match World::with_solids(demo_solids(), settings_from_args()) {
        Ok(world) => world,
        Err(err) => {
            warn!("{err}");
            return;
        }
    };

    let library: MaterialLibrary = Arc::new(RwLock::new(Default::default()));
    let _loader = spawn_material_loader(
        Arc::clone(&library),
        world.material_events(),
        vec![
            ("concrete/concretefloor001a".into(), Some((512, 512))),
            ("brick/brickwall001a".into(), Some((256, 256))),
            ("metal/metalfloor001a".into(), Some((256, 512))),
            ("wood/woodwall009a".into(), None),
        ],
        Duration::from_millis(750),
    );

    let mut camera = OrbitCamera::new(900.0, -2.2, 0.6);
    let mut cursor = SolidCursor::new();
    let mut wireframe = false;

    loop {
        camera.update();
        cursor.update(&world);

        if is_key_pressed(KeyCode::W) {
            wireframe = !wireframe;
        }
        if let Some(id) = cursor.selected() {
            let offset = if is_key_pressed(KeyCode::E) {
                Some(Vector3::new(0.0, 0.0, 16.0))
            } else if is_key_pressed(KeyCode::Q) {
                Some(Vector3::new(0.0, 0.0, -16.0))
            } else {
                None
            };
            if let Some(offset) = offset {
                if let Err(err) = world.edit_solid(id, |solid| translate_solid(solid, offset)) {
                    warn!("could not move solid: {err}");
                }
            }
            if is_key_pressed(KeyCode::H) {
                let toggled = world.edit_solid(id, |solid| {
                    solid.editor.visgroup_shown = !solid.editor.visgroup_shown;
                });
                if let Err(err) = toggled {
                    warn!("could not hide solid: {err}");
                }
            }
            if is_key_pressed(KeyCode::F) {
                if let Some(mesh) = world.mesh(id) {
                    camera.focus(mesh);
                }
            }
        }

        world.pump_material_events();
        {
            let materials = library.read().unwrap_or_else(PoisonError::into_inner);
            world.rebuild_if_dirty(&*materials);
        }
        cursor.validate(&world);

        clear_background(Color::from_rgba(25, 25, 30, 255));
        set_camera(&camera.to_camera3d());

        for mesh in world.meshes() {
            let Some(solid) = world.solid(mesh.solid_id) else {
                continue;
            };
            if !solid.editor.is_visible() {
                continue;
            }

            let selected = cursor.selected() == Some(solid.id);
            if wireframe {
                draw_wireframe(mesh, solid_color(solid, selected));
            } else {
                draw_solid_mesh(mesh, solid_color(solid, selected));
                if selected {
                    draw_wireframe(mesh, WHITE);
                }
            }
        }

        set_default_camera();
        draw_text("Brush Viewer", 10.0, 24.0, 28.0, WHITE);
        draw_text(
            &format!(
                "{} solids | [W]ireframe: {}",
                world.len(),
                if wireframe { "on" } else { "off" }
            ),
            10.0,
            46.0,
            18.0,
            LIGHTGRAY,
        );
        cursor.draw_ui(&world, 72.0);

        next_frame().await
    }
}
