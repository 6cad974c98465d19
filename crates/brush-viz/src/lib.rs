//! Shared visualization utilities for the brush viewer.

use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use brush_geometry::{
    normalize_material_name, FaceMesh, MaterialEvent, MaterialInfo, Plane, ReconstructionSettings,
    Side, Solid, SolidMesh,
};
use log::{debug, info};
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};

pub mod navigator;
pub use navigator::SolidCursor;

/// Material sizes shared between the loader thread and the render loop.
pub type MaterialLibrary = Arc<RwLock<std::collections::HashMap<String, MaterialInfo>>>;

/// Loads reconstruction settings from a JSON file. Missing keys keep their defaults.
pub fn load_settings(path: &Path) -> std::io::Result<ReconstructionSettings> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Pretends to stream textures from disk: each material becomes available
/// after a delay and is announced on `events`.
///
/// A size of `None` simulates a texture that fails to load.
pub fn spawn_material_loader(
    library: MaterialLibrary,
    events: Sender<MaterialEvent>,
    requests: Vec<(String, Option<(u32, u32)>)>,
    delay: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        for (name, size) in requests {
            thread::sleep(delay);

            let event = match size {
                Some((width, height)) => {
                    let info = MaterialInfo::loaded(width, height);
                    library
                        .write()
                        .unwrap_or_else(PoisonError::into_inner)
                        .insert(normalize_material_name(&name), info);
                    debug!("loaded `{name}` ({width}x{height})");
                    MaterialEvent::Loaded(name)
                }
                None => MaterialEvent::Failed {
                    name,
                    reason: "texture not found".to_owned(),
                },
            };

            if events.send(event).is_err() {
                info!("world dropped, stopping material loader");
                return;
            }
        }
    })
}

/// Color of a solid from its editor color, brightened when selected.
pub fn solid_color(solid: &Solid, selected: bool) -> Color {
    let [r, g, b] = solid.editor.color;
    let color = Color::from_rgba(r, g, b, 255);
    if selected {
        Color::new(
            (color.r + 0.4).min(1.0),
            (color.g + 0.4).min(1.0),
            (color.b + 0.4).min(1.0),
            1.0,
        )
    } else {
        color
    }
}

/// Darkens a color by how far the face turns away from a fixed light.
fn shade(color: Color, normal: &Vector3<f32>) -> Color {
    let light = Vector3::new(0.3, 0.5, 0.8).normalize();
    let factor = 0.45 + 0.55 * normal.dot(&light).abs();
    Color::new(color.r * factor, color.g * factor, color.b * factor, color.a)
}

fn to_vec3(p: &Point3<f32>) -> Vec3 {
    vec3(p.x, p.y, p.z)
}

/// Draws a single face mesh as flat-shaded triangles.
pub fn draw_face(face: &FaceMesh, color: Color) {
    let Ok(indices) = face
        .indices
        .iter()
        .map(|&i| u16::try_from(i))
        .collect::<Result<Vec<u16>, _>>()
    else {
        return;
    };

    let color = shade(color, &face.normal);
    let vertices: Vec<Vertex> = face
        .positions
        .iter()
        .zip(&face.uvs)
        .map(|(p, uv)| Vertex::new2(to_vec3(p), vec2(uv.x, uv.y), color))
        .collect();

    let mesh = Mesh {
        vertices,
        indices,
        texture: None,
    };

    draw_mesh(&mesh);
}

/// Draws every face of a solid.
pub fn draw_solid_mesh(mesh: &SolidMesh, color: Color) {
    for face in &mesh.faces {
        draw_face(face, color);
    }
}

/// Draws the outline of every face of a solid.
pub fn draw_wireframe(mesh: &SolidMesh, color: Color) {
    for face in &mesh.faces {
        for (a, b) in face.edges() {
            draw_line_3d(to_vec3(&a), to_vec3(&b), color);
        }
    }
}

/// Moves every plane of a solid by `offset`.
pub fn translate_solid(solid: &mut Solid, offset: Vector3<f32>) {
    for side in &mut solid.sides {
        let [a, b, c] = *side.plane.points();
        side.plane = Plane::from_three_points(a + offset, b + offset, c + offset);
    }
}

/// Builds the demo level: a floor, two walls, a ramp and a pillar carrying
/// a duplicated and a degenerate side.
pub fn demo_solids() -> Vec<Solid> {
    let mut floor = Solid::cuboid(
        1,
        Point3::new(-256.0, -256.0, -16.0),
        Point3::new(256.0, 256.0, 0.0),
        "concrete/concretefloor001a",
    );
    floor.editor.color = [140, 140, 150];

    let mut north = Solid::cuboid(
        2,
        Point3::new(-256.0, 240.0, 0.0),
        Point3::new(256.0, 256.0, 128.0),
        "brick/brickwall001a",
    );
    north.editor.color = [180, 90, 60];

    let mut west = Solid::cuboid(
        3,
        Point3::new(-256.0, -256.0, 0.0),
        Point3::new(-240.0, 240.0, 128.0),
        "brick/brickwall001a",
    );
    west.editor.color = [170, 100, 70];

    let mut ramp = ramp(4, Point3::new(0.0, -128.0, 0.0), 128.0, 64.0, "metal/metalfloor001a");
    ramp.editor.color = [90, 140, 200];

    let mut pillar = Solid::cuboid(
        5,
        Point3::new(-96.0, 64.0, 0.0),
        Point3::new(-64.0, 96.0, 160.0),
        "wood/woodwall009a",
    );
    let mut duplicate = pillar.sides[0].clone();
    duplicate.id = 7;
    pillar.sides.push(duplicate);
    pillar
        .sides
        .push(Side::new(8, Plane::parse_lenient("(0 0 0) (1 1 1) (2 2 2)"), "tools/toolsnodraw"));
    pillar.editor.color = [200, 170, 90];

    vec![floor, north, west, ramp, pillar]
}

/// A ramp rising along +X from `origin`, `length` long, `size` wide and high.
fn ramp(id: u32, origin: Point3<f32>, length: f32, size: f32, material: &str) -> Solid {
    let far = origin + Vector3::new(length, size, size);
    let slope = Vector3::new(size, 0.0, -length);

    let planes = [
        Plane::from_point_and_normal(origin, Vector3::z()),
        Plane::from_point_and_normal(far, -Vector3::x()),
        Plane::from_point_and_normal(origin, Vector3::y()),
        Plane::from_point_and_normal(far, -Vector3::y()),
        Plane::from_point_and_normal(origin, slope),
    ];

    let sides = planes
        .into_iter()
        .zip(1..)
        .map(|(plane, side_id)| Side::new(side_id, plane, material))
        .collect();

    Solid::new(id, sides)
}

/// Orbit camera in map space: Z is up, yaw turns around Z and pitch tilts
/// the eye above the target.
pub struct OrbitCamera {
    pub target: Point3<f32>,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Fraction of the distance covered by one scroll step
    pub zoom_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Creates a camera orbiting the map origin.
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            target: Point3::origin(),
            distance,
            yaw,
            pitch,
            zoom_step: 0.1,
            min_distance: 32.0,
            max_distance: 4096.0,
        }
    }

    /// Centers the orbit on a solid and backs off far enough to see all of it.
    ///
    /// Returns false if the solid has no faces.
    pub fn focus(&mut self, mesh: &SolidMesh) -> bool {
        let Some((min, max)) = mesh.bounds() else {
            return false;
        };
        self.target = nalgebra::center(&min, &max);
        self.distance = ((max - min).norm() * 1.5).clamp(self.min_distance, self.max_distance);
        true
    }

    /// Updates camera state from user input (mouse drag, scroll, arrow keys).
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw += delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }

        if is_key_down(KeyCode::Left) {
            self.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw += 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= 0.02;
        }

        self.zoom(mouse_wheel().1);
    }

    /// Moves toward the target by `steps` scroll steps, away for negative steps.
    pub fn zoom(&mut self, steps: f32) {
        let factor = (1.0 - self.zoom_step).powf(steps);
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    /// Returns the eye position in map space.
    pub fn eye(&self) -> Point3<f32> {
        // Stay just short of straight up or down, where `up` would be parallel to the view.
        let pitch = self.pitch.clamp(-1.5, 1.5);
        let offset = Vector3::new(
            pitch.cos() * self.yaw.cos(),
            pitch.cos() * self.yaw.sin(),
            pitch.sin(),
        );
        self.target + offset * self.distance
    }

    /// Converts to macroquad's Camera3D for rendering.
    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: to_vec3(&self.eye()),
            up: vec3(0.0, 0.0, 1.0),
            target: to_vec3(&self.target),
            ..Default::default()
        }
    }
}
