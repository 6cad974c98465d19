//! Solid selection for interactive inspection.

use brush_geometry::{SolidId, SolidState, World};
use macroquad::prelude::*;

/// Keyboard-driven cursor over the solids of a world, in id order.
#[derive(Debug, Default)]
pub struct SolidCursor {
    selected: Option<SolidId>,
}

impl SolidCursor {
    /// Creates a cursor with nothing selected.
    pub fn new() -> Self {
        Self { selected: None }
    }

    pub fn selected(&self) -> Option<SolidId> {
        self.selected
    }

    /// Selects the solid after the current one, wrapping around.
    pub fn select_next(&mut self, world: &World) -> bool {
        let ids: Vec<SolidId> = world.solids().map(|s| s.id).collect();
        let next = match self.selected {
            Some(current) => ids
                .iter()
                .copied()
                .find(|&id| id > current)
                .or_else(|| ids.first().copied()),
            None => ids.first().copied(),
        };
        self.select(next)
    }

    /// Selects the solid before the current one, wrapping around.
    pub fn select_previous(&mut self, world: &World) -> bool {
        let ids: Vec<SolidId> = world.solids().map(|s| s.id).collect();
        let previous = match self.selected {
            Some(current) => ids
                .iter()
                .rev()
                .copied()
                .find(|&id| id < current)
                .or_else(|| ids.last().copied()),
            None => ids.last().copied(),
        };
        self.select(previous)
    }

    /// Clears the selection. Returns true if something was selected.
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }

    fn select(&mut self, id: Option<SolidId>) -> bool {
        let changed = self.selected != id;
        self.selected = id;
        changed
    }

    /// Drops the selection if the solid no longer exists.
    pub fn validate(&mut self, world: &World) {
        if let Some(id) = self.selected {
            if world.solid(id).is_none() {
                self.selected = None;
            }
        }
    }

    /// Handles keyboard input for selection.
    /// Returns true if the selection changed.
    pub fn update(&mut self, world: &World) -> bool {
        let mut changed = false;

        if is_key_pressed(KeyCode::N) {
            changed = self.select_next(world);
        }
        if is_key_pressed(KeyCode::P) {
            changed = self.select_previous(world);
        }
        if is_key_pressed(KeyCode::Escape) {
            changed = self.clear();
        }

        changed
    }

    /// Draws the selection UI overlay.
    pub fn draw_ui(&self, world: &World, y_offset: f32) {
        let Some(id) = self.selected else {
            draw_text("No solid selected", 10.0, y_offset, 18.0, WHITE);
            draw_text("[N]ext | [P]revious", 10.0, y_offset + 20.0, 16.0, DARKGRAY);
            return;
        };

        let (faces, vertices, triangles) = world
            .mesh(id)
            .map(|mesh| (mesh.faces.len(), mesh.vertex_count(), mesh.triangle_count()))
            .unwrap_or_default();
        let sides = world.solid(id).map_or(0, |solid| solid.sides.len());
        let materials = world
            .solid(id)
            .map(|solid| solid.material_names().join(", "))
            .unwrap_or_default();
        let state = match world.state(id) {
            Some(SolidState::Clean) => "clean",
            Some(SolidState::Dirty) => "dirty",
            Some(SolidState::Rebuilding) => "rebuilding",
            None => "removed",
        };

        draw_text(
            &format!("Solid {id}: {sides} sides -> {faces} faces ({state})"),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );
        draw_text(
            &format!("{vertices} vertices, {triangles} triangles"),
            10.0,
            y_offset + 20.0,
            18.0,
            YELLOW,
        );
        draw_text(&materials, 10.0, y_offset + 40.0, 16.0, GREEN);
        draw_text(
            "[N]ext | [P]revious | [Esc] clear | [F]ocus | [E] raise | [Q] lower | [H]ide",
            10.0,
            y_offset + 60.0,
            16.0,
            DARKGRAY,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brush_geometry::{ReconstructionSettings, Solid};
    use nalgebra::Point3;

    fn world() -> World {
        let solids = [4, 1, 9].map(|id| {
            let min = Point3::new(id as f32 * 64.0, 0.0, 0.0);
            let max = min + nalgebra::Vector3::new(32.0, 32.0, 32.0);
            Solid::cuboid(id, min, max, "dev/dev_measuregeneric01")
        });
        World::with_solids(solids, ReconstructionSettings::default()).unwrap()
    }

    #[test]
    fn cycles_in_id_order() {
        let world = world();
        let mut cursor = SolidCursor::new();

        assert!(cursor.select_next(&world));
        assert_eq!(cursor.selected(), Some(1));
        cursor.select_next(&world);
        cursor.select_next(&world);
        assert_eq!(cursor.selected(), Some(9));
        cursor.select_next(&world);
        assert_eq!(cursor.selected(), Some(1));
        cursor.select_previous(&world);
        assert_eq!(cursor.selected(), Some(9));
    }

    #[test]
    fn drops_removed_selection() {
        let mut world = world();
        let mut cursor = SolidCursor::new();
        cursor.select_previous(&world);
        assert_eq!(cursor.selected(), Some(9));

        world.remove_solid(9).unwrap();
        cursor.validate(&world);
        assert_eq!(cursor.selected(), None);
        assert!(!cursor.clear());
    }
}
